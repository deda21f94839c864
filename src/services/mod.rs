pub mod cached_movers;
pub mod color;
pub mod file_cache;
pub mod fmp_client;
pub mod ingestion;
pub mod snapshot_gate;
pub mod snapshot_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use cached_movers::CachedMovers;
pub use color::{batch_max, color_for, colorize, intensity, ColoredMover};
pub use file_cache::FileCache;
pub use fmp_client::FmpClient;
pub use ingestion::{RefreshOutcome, SnapshotService};
pub use snapshot_gate::SnapshotSchedule;
pub use snapshot_store::SnapshotStore;
