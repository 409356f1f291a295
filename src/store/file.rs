use crate::core::model::Snapshot;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a snapshot document. Files ending in `.json` are parsed as JSON,
/// anything else as YAML.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let snapshot: Snapshot = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?
    };

    debug!(
        "Read snapshot with {} portfolios and {} holdings from {}",
        snapshot.portfolios.len(),
        snapshot.holdings.len(),
        path.display()
    );
    Ok(snapshot)
}
