use super::util::RetryPolicy;
use crate::core::model::{
    AssetClass, DebtItem, Holding, MacroIndicator, PerformanceSnapshot, Portfolio,
};
use crate::core::source::SnapshotSource;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Reads portfolio data from a JSON HTTP API.
///
/// Every endpoint returns a JSON array of rows; portfolio-scoped rows live
/// under `/portfolios/<id>/`, with the id percent-encoded as one segment.
pub struct HttpSource {
    base_url: Url,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpSource {
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("Invalid base URL: {base_url}");
        }
        let client = reqwest::Client::builder().user_agent("folio/1.0").build()?;
        Ok(HttpSource {
            base_url,
            client,
            retry,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid base URL: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(name = "HttpSourceFetch", skip(self))]
    async fn get_rows<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>> {
        let path = format!("/{}", segments.join("/"));
        let url = self.endpoint(segments)?;
        debug!("Requesting {}", url);

        let response = self
            .retry
            .run(&path, || self.client.get(url.clone()).send())
            .await
            .map_err(|e| anyhow!("Request error: {} for {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), path));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", path, e))
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.get_rows(&["portfolios"]).await
    }

    async fn fetch_asset_classes(&self) -> Result<Vec<AssetClass>> {
        self.get_rows(&["asset-classes"]).await
    }

    async fn fetch_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        self.get_rows(&["portfolios", portfolio_id, "holdings"]).await
    }

    async fn fetch_debt_items(&self, portfolio_id: &str) -> Result<Vec<DebtItem>> {
        self.get_rows(&["portfolios", portfolio_id, "debt-items"])
            .await
    }

    async fn fetch_performance_snapshots(
        &self,
        portfolio_id: &str,
    ) -> Result<Vec<PerformanceSnapshot>> {
        self.get_rows(&["portfolios", portfolio_id, "performance-snapshots"])
            .await
    }

    async fn fetch_macro_indicators(&self) -> Result<Vec<MacroIndicator>> {
        self.get_rows(&["macro-indicators"]).await
    }
}
