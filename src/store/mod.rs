pub mod disk;
pub mod file;
pub mod memory;

use crate::core::config::{AppConfig, SourceConfig};
use crate::core::source::SnapshotSource;
use crate::providers::{HttpSource, RetryPolicy};
use anyhow::Result;
use disk::DiskStore;
use memory::MemorySource;
use tracing::debug;

/// Opens the data source the configuration points at.
pub fn open_source(config: &AppConfig) -> Result<Box<dyn SnapshotSource>> {
    match &config.source {
        SourceConfig::Store => {
            let path = config.store_path()?;
            debug!("Reading from store at {}", path.display());
            Ok(Box::new(DiskStore::open(&path)?))
        }
        SourceConfig::File { path } => {
            debug!("Reading snapshot file {path}");
            Ok(Box::new(MemorySource::new(file::read_snapshot(path)?)))
        }
        SourceConfig::Http {
            base_url,
            retries,
            retry_delay_ms,
        } => {
            debug!("Reading from {base_url}");
            Ok(Box::new(HttpSource::new(
                base_url,
                RetryPolicy::new(*retries, *retry_delay_ms),
            )?))
        }
    }
}
