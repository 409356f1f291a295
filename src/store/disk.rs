use crate::core::model::{
    AssetClass, DebtItem, Holding, MacroIndicator, PerformanceSnapshot, Portfolio, Snapshot,
};
use crate::core::source::SnapshotSource;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// On-disk portfolio store backed by fjall, one partition per entity.
///
/// Values are JSON. Portfolio-scoped rows are keyed `<portfolio_id>/<id>` and
/// performance snapshots `<holding_id>/<date>`, so scoped reads are prefix
/// scans. Ids used as key prefixes may not contain the separator.
pub struct DiskStore {
    keyspace: Keyspace,
    portfolios: PartitionHandle,
    asset_classes: PartitionHandle,
    holdings: PartitionHandle,
    debt_items: PartitionHandle,
    performance_snapshots: PartitionHandle,
    macro_indicators: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create store directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;

        let open = |name: &str| -> Result<PartitionHandle> {
            keyspace
                .open_partition(name, PartitionCreateOptions::default())
                .with_context(|| format!("Failed to open partition {name}"))
        };

        Ok(Self {
            portfolios: open("portfolios")?,
            asset_classes: open("asset_classes")?,
            holdings: open("holdings")?,
            debt_items: open("debt_items")?,
            performance_snapshots: open("performance_snapshots")?,
            macro_indicators: open("macro_indicators")?,
            keyspace,
        })
    }

    fn partitions(&self) -> [&PartitionHandle; 6] {
        [
            &self.portfolios,
            &self.asset_classes,
            &self.holdings,
            &self.debt_items,
            &self.performance_snapshots,
            &self.macro_indicators,
        ]
    }

    /// Replaces the stored data with `snapshot` in a single batch.
    pub fn import(&self, snapshot: &Snapshot) -> Result<()> {
        check_key_parts(snapshot)?;
        let mut batch = self.keyspace.batch();

        for partition in self.partitions() {
            for key in partition.keys() {
                batch.remove(partition, key?);
            }
        }

        for portfolio in &snapshot.portfolios {
            batch.insert(
                &self.portfolios,
                portfolio.id.as_str(),
                serde_json::to_vec(portfolio)?,
            );
        }
        for asset_class in &snapshot.asset_classes {
            batch.insert(
                &self.asset_classes,
                asset_class.id.as_str(),
                serde_json::to_vec(asset_class)?,
            );
        }
        for holding in &snapshot.holdings {
            batch.insert(
                &self.holdings,
                format!("{}{KEY_SEPARATOR}{}", holding.portfolio_id, holding.id),
                serde_json::to_vec(holding)?,
            );
        }
        for debt in &snapshot.debt_items {
            batch.insert(
                &self.debt_items,
                format!("{}{KEY_SEPARATOR}{}", debt.portfolio_id, debt.id),
                serde_json::to_vec(debt)?,
            );
        }
        for perf in &snapshot.performance_snapshots {
            batch.insert(
                &self.performance_snapshots,
                format!("{}{KEY_SEPARATOR}{}", perf.holding_id, perf.snapshot_date),
                serde_json::to_vec(perf)?,
            );
        }
        for indicator in &snapshot.macro_indicators {
            batch.insert(
                &self.macro_indicators,
                format!(
                    "{}{KEY_SEPARATOR}{}",
                    indicator.indicator_name.key(),
                    indicator.indicator_date
                ),
                serde_json::to_vec(indicator)?,
            );
        }

        batch.commit().context("Failed to write snapshot to store")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist store")?;

        info!(
            "Imported {} portfolios, {} holdings, {} debt items, {} snapshots",
            snapshot.portfolios.len(),
            snapshot.holdings.len(),
            snapshot.debt_items.len(),
            snapshot.performance_snapshots.len()
        );
        Ok(())
    }
}

const KEY_SEPARATOR: char = '/';

/// Portfolio and holding ids prefix other keys, so `p1` must never match
/// rows of a portfolio named `p1/x`.
fn check_key_parts(snapshot: &Snapshot) -> Result<()> {
    let portfolio_ids = snapshot
        .portfolios
        .iter()
        .map(|p| ("portfolio", p.id.as_str()))
        .chain(snapshot.holdings.iter().map(|h| ("portfolio", h.portfolio_id.as_str())))
        .chain(snapshot.debt_items.iter().map(|d| ("portfolio", d.portfolio_id.as_str())));
    let holding_ids = snapshot
        .holdings
        .iter()
        .map(|h| ("holding", h.id.as_str()))
        .chain(
            snapshot
                .performance_snapshots
                .iter()
                .map(|s| ("holding", s.holding_id.as_str())),
        );

    for (kind, id) in portfolio_ids.chain(holding_ids) {
        if id.contains(KEY_SEPARATOR) {
            bail!("Invalid {kind} id {id:?}: ids may not contain '{KEY_SEPARATOR}'");
        }
    }
    Ok(())
}

fn read_all<T: DeserializeOwned>(partition: &PartitionHandle) -> Result<Vec<T>> {
    partition
        .iter()
        .map(|kv| {
            let (_, value) = kv?;
            Ok(serde_json::from_slice(&value)?)
        })
        .collect()
}

fn read_prefix<T: DeserializeOwned>(partition: &PartitionHandle, prefix: &str) -> Result<Vec<T>> {
    partition
        .prefix(format!("{prefix}{KEY_SEPARATOR}"))
        .map(|kv| {
            let (_, value) = kv?;
            Ok(serde_json::from_slice(&value)?)
        })
        .collect()
}

#[async_trait]
impl SnapshotSource for DiskStore {
    async fn fetch_portfolios(&self) -> Result<Vec<Portfolio>> {
        read_all(&self.portfolios)
    }

    async fn fetch_asset_classes(&self) -> Result<Vec<AssetClass>> {
        read_all(&self.asset_classes)
    }

    async fn fetch_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        let holdings: Vec<Holding> = read_prefix(&self.holdings, portfolio_id)?;
        debug!("Store has {} holdings for {portfolio_id}", holdings.len());
        Ok(holdings)
    }

    async fn fetch_debt_items(&self, portfolio_id: &str) -> Result<Vec<DebtItem>> {
        read_prefix(&self.debt_items, portfolio_id)
    }

    async fn fetch_performance_snapshots(
        &self,
        portfolio_id: &str,
    ) -> Result<Vec<PerformanceSnapshot>> {
        let holdings: Vec<Holding> = read_prefix(&self.holdings, portfolio_id)?;
        let mut snapshots = Vec::new();
        for holding in &holdings {
            snapshots.extend(read_prefix::<PerformanceSnapshot>(
                &self.performance_snapshots,
                &holding.id,
            )?);
        }
        Ok(snapshots)
    }

    async fn fetch_macro_indicators(&self) -> Result<Vec<MacroIndicator>> {
        read_all(&self.macro_indicators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::tests::{date, holding};
    use crate::core::model::IndicatorName;
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        let mut other = holding("x", "eq", 10.0, 10.0);
        other.portfolio_id = "p2".to_string();
        Snapshot {
            portfolios: vec![
                Portfolio {
                    id: "p1".to_string(),
                    name: "First".to_string(),
                    description: None,
                },
                Portfolio {
                    id: "p2".to_string(),
                    name: "Second".to_string(),
                    description: None,
                },
            ],
            holdings: vec![holding("a", "eq", 100.0, 80.0), other],
            performance_snapshots: vec![
                PerformanceSnapshot {
                    id: "s1".to_string(),
                    holding_id: "a".to_string(),
                    snapshot_date: date(2025, 1, 1),
                    value: 90.0,
                },
                PerformanceSnapshot {
                    id: "s2".to_string(),
                    holding_id: "x".to_string(),
                    snapshot_date: date(2025, 1, 1),
                    value: 9.0,
                },
            ],
            macro_indicators: vec![MacroIndicator {
                indicator_name: IndicatorName::FedFunds,
                value: 4.33,
                indicator_date: date(2025, 9, 1),
                source: "FRED".to_string(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_import_and_scoped_reads() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();
        store.import(&sample_snapshot()).unwrap();

        assert_eq!(store.fetch_portfolios().await.unwrap().len(), 2);
        let holdings = store.fetch_holdings("p1").await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].id, "a");
        assert_eq!(holdings[0].current_value, 100.0);

        let snapshots = store.fetch_performance_snapshots("p2").await.unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].value, 9.0);

        let indicators = store.fetch_macro_indicators().await.unwrap();
        assert_eq!(indicators[0].indicator_name, IndicatorName::FedFunds);
        assert!(store.fetch_debt_items("p1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_replaces_previous_data() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();
        store.import(&sample_snapshot()).unwrap();

        let mut smaller = sample_snapshot();
        smaller.portfolios.truncate(1);
        smaller.holdings.truncate(1);
        smaller.performance_snapshots.clear();
        store.import(&smaller).unwrap();

        assert_eq!(store.fetch_portfolios().await.unwrap().len(), 1);
        assert!(store.fetch_holdings("p2").await.unwrap().is_empty());
        assert!(
            store
                .fetch_performance_snapshots("p1")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_import_rejects_ids_with_key_separator() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();
        store.import(&sample_snapshot()).unwrap();

        let mut nested = sample_snapshot();
        nested.portfolios[1].id = "p1/x".to_string();
        nested.holdings[1].portfolio_id = "p1/x".to_string();
        let err = store.import(&nested).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid portfolio id \"p1/x\": ids may not contain '/'"
        );

        let mut nested = sample_snapshot();
        nested.performance_snapshots[0].holding_id = "a/1".to_string();
        assert!(store.import(&nested).is_err());

        // The earlier import is left untouched.
        assert_eq!(store.fetch_holdings("p1").await.unwrap().len(), 1);
        assert_eq!(store.fetch_holdings("p2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reopen_keeps_imported_data() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.import(&sample_snapshot()).unwrap();
        }

        let store = DiskStore::open(dir.path()).unwrap();
        let holdings = store.fetch_holdings("p1").await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0], sample_snapshot().holdings[0]);
    }
}
