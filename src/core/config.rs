use crate::core::dashboard::ReportOptions;
use crate::core::performance::MonthlyReturnsConfig;
use crate::core::risk::RiskThresholds;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Where portfolio data is read from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// The local fjall store under `data_path`, seeded with `folio import`.
    #[default]
    Store,
    /// A YAML or JSON snapshot document.
    File { path: String },
    /// A JSON API.
    Http {
        base_url: String,
        #[serde(default = "default_retries")]
        retries: usize,
        #[serde(default = "default_retry_delay_ms")]
        retry_delay_ms: u64,
    },
}

fn default_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    200
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Portfolio to report on; the first one in the source when unset.
    #[serde(default)]
    pub portfolio_id: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub reporting_year: Option<i32>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    pub data_path: Option<String>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub risk_thresholds: RiskThresholds,
    #[serde(default)]
    pub monthly_returns: MonthlyReturnsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "folio", "folio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "folio", "folio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Location of the fjall store.
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("store"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Report settings, with the reporting year and as-of date falling back
    /// to `today`.
    pub fn report_options(&self, today: NaiveDate) -> ReportOptions {
        let as_of = self.as_of.unwrap_or(today);
        ReportOptions {
            reporting_year: self.reporting_year.unwrap_or(as_of.year()),
            as_of,
            thresholds: self.risk_thresholds,
            monthly_returns: self.monthly_returns.clone(),
        }
    }
}
