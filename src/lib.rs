pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::{Report, ui};
use crate::core::config::AppConfig;
use crate::core::source::SNAPSHOT_FETCHES;
use crate::core::{Dashboard, load_snapshot};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Report(Report),
    Import(PathBuf),
}

/// Loads the configured portfolio and computes its dashboard.
pub async fn load_dashboard(config: &AppConfig) -> Result<Dashboard> {
    let source = store::open_source(config)?;

    let pb = ui::new_progress_bar(SNAPSHOT_FETCHES, true);
    pb.set_message("Loading portfolio...");
    let loaded = load_snapshot(
        source.as_ref(),
        config.portfolio_id.as_deref(),
        &|| pb.inc(1),
    )
    .await;
    pb.finish_and_clear();
    let (portfolio, snapshot) = loaded?;

    let options = config.report_options(chrono::Local::now().date_naive());
    debug!("Report options: {options:?}");
    Dashboard::build(&portfolio, &snapshot, &options)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>, json: bool) -> Result<()> {
    info!("folio starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let output = match command {
        AppCommand::Import(path) => cli::import::run(&config, &path)?,
        AppCommand::Report(report) => {
            let dashboard = load_dashboard(&config).await?;
            if json {
                cli::report_json(report, &dashboard)?
            } else {
                cli::render_report(report, &dashboard, &config.currency)
            }
        }
    };
    println!("{output}");
    Ok(())
}
