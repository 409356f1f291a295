use super::ui;
use crate::core::config::AppConfig;
use crate::store::{disk::DiskStore, file};
use anyhow::{Result, bail};
use std::path::Path;
use tracing::{info, warn};

/// Seeds the local store with a snapshot file, replacing what it held.
pub fn run(config: &AppConfig, snapshot_path: &Path) -> Result<String> {
    let snapshot = file::read_snapshot(snapshot_path)?;
    if snapshot.portfolios.is_empty() {
        bail!(
            "Snapshot file {} contains no portfolios",
            snapshot_path.display()
        );
    }
    for problem in snapshot.validate() {
        warn!("Data integrity: {problem}");
    }

    let store_path = config.store_path()?;
    let store = DiskStore::open(&store_path)?;
    store.import(&snapshot)?;
    info!("Seeded store at {}", store_path.display());

    Ok(format!(
        "Imported {} portfolios, {} holdings, {} debt items and {} snapshots into {}",
        ui::style_text(
            &snapshot.portfolios.len().to_string(),
            ui::StyleType::TotalValue
        ),
        snapshot.holdings.len(),
        snapshot.debt_items.len(),
        snapshot.performance_snapshots.len(),
        ui::style_text(&store_path.display().to_string(), ui::StyleType::Subtle)
    ))
}
