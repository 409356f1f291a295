//! Portfolio entities and the analytics computed over them

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod indicators;
pub mod log;
pub mod model;
pub mod performance;
pub mod risk;
pub mod source;

// Re-export main types for cleaner imports
pub use dashboard::{Dashboard, ReportOptions};
pub use model::Snapshot;
pub use source::{SnapshotSource, load_snapshot};
