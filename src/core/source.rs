//! Snapshot loading abstractions

use crate::core::model::{
    AssetClass, DebtItem, Holding, MacroIndicator, PerformanceSnapshot, Portfolio, Snapshot,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Read side of the persistence layer. Holdings, debt items and performance
/// snapshots are scoped to one portfolio; the rest is shared.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_portfolios(&self) -> Result<Vec<Portfolio>>;
    async fn fetch_asset_classes(&self) -> Result<Vec<AssetClass>>;
    async fn fetch_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    async fn fetch_debt_items(&self, portfolio_id: &str) -> Result<Vec<DebtItem>>;
    async fn fetch_performance_snapshots(
        &self,
        portfolio_id: &str,
    ) -> Result<Vec<PerformanceSnapshot>>;
    async fn fetch_macro_indicators(&self) -> Result<Vec<MacroIndicator>>;
}

/// Number of concurrent fetches [`load_snapshot`] issues after resolving the
/// portfolio, for sizing progress bars.
pub const SNAPSHOT_FETCHES: u64 = 5;

/// Resolves the portfolio to report on and loads its snapshot.
///
/// Without a `portfolio_id` the first portfolio of the source is used. The
/// entity fetches run concurrently and the first failure aborts the load.
/// `update_callback` is called once per completed fetch.
#[instrument(name = "LoadSnapshot", skip(source, update_callback))]
pub async fn load_snapshot(
    source: &dyn SnapshotSource,
    portfolio_id: Option<&str>,
    update_callback: &(dyn Fn() + Sync),
) -> Result<(Portfolio, Snapshot)> {
    let portfolios = source.fetch_portfolios().await?;
    let portfolio = match portfolio_id {
        Some(id) => portfolios
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("Portfolio not found: {}", id))?,
        None => portfolios
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("No portfolios found in data source"))?,
    };
    debug!("Loading snapshot for portfolio {}", portfolio.id);

    let fetched = |label: &str| {
        debug!("Fetched {label}");
        update_callback();
    };
    let (asset_classes, holdings, debt_items, performance_snapshots, macro_indicators) =
        futures::try_join!(
            async {
                source
                    .fetch_asset_classes()
                    .await
                    .inspect(|_| fetched("asset classes"))
            },
            async {
                source
                    .fetch_holdings(&portfolio.id)
                    .await
                    .inspect(|_| fetched("holdings"))
            },
            async {
                source
                    .fetch_debt_items(&portfolio.id)
                    .await
                    .inspect(|_| fetched("debt items"))
            },
            async {
                source
                    .fetch_performance_snapshots(&portfolio.id)
                    .await
                    .inspect(|_| fetched("performance snapshots"))
            },
            async {
                source
                    .fetch_macro_indicators()
                    .await
                    .inspect(|_| fetched("macro indicators"))
            },
        )?;

    let snapshot = Snapshot {
        portfolios,
        asset_classes,
        holdings,
        debt_items,
        performance_snapshots,
        macro_indicators,
    };
    for problem in snapshot.validate() {
        warn!("Data integrity: {problem}");
    }

    Ok((portfolio, snapshot))
}
