use crate::core::model::{
    AssetClass, DebtItem, Holding, MacroIndicator, PerformanceSnapshot, Portfolio, Snapshot,
};
use crate::core::source::SnapshotSource;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

/// Serves a snapshot that is already in memory, e.g. one read from a file.
pub struct MemorySource {
    snapshot: Snapshot,
}

impl MemorySource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn fetch_portfolios(&self) -> Result<Vec<Portfolio>> {
        Ok(self.snapshot.portfolios.clone())
    }

    async fn fetch_asset_classes(&self) -> Result<Vec<AssetClass>> {
        Ok(self.snapshot.asset_classes.clone())
    }

    async fn fetch_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let holdings: Vec<Holding> = self
            .snapshot
            .holdings
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        debug!("Memory source has {} holdings for {portfolio_id}", holdings.len());
        Ok(holdings)
    }

    async fn fetch_debt_items(&self, portfolio_id: &str) -> Result<Vec<DebtItem>> {
        Ok(self
            .snapshot
            .debt_items
            .iter()
            .filter(|d| d.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    async fn fetch_performance_snapshots(
        &self,
        portfolio_id: &str,
    ) -> Result<Vec<PerformanceSnapshot>> {
        let holding_ids: HashSet<&str> = self
            .snapshot
            .holdings
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id)
            .map(|h| h.id.as_str())
            .collect();
        Ok(self
            .snapshot
            .performance_snapshots
            .iter()
            .filter(|s| holding_ids.contains(s.holding_id.as_str()))
            .cloned()
            .collect())
    }

    async fn fetch_macro_indicators(&self) -> Result<Vec<MacroIndicator>> {
        Ok(self.snapshot.macro_indicators.clone())
    }
}
