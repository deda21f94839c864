pub mod serve;
pub mod snapshot;
pub mod status;

use crate::config::AppConfig;
use crate::constants::PLACEHOLDER_API_KEY;
use crate::error::Result;
use crate::services::{FmpClient, SnapshotService, SnapshotStore};

/// Open the snapshot store and provider client described by `config`
pub async fn snapshot_service(config: &AppConfig) -> Result<SnapshotService> {
    if config.api_key == PLACEHOLDER_API_KEY {
        tracing::warn!("FMP_API_KEY is not set, provider requests will be rejected");
    }

    let client = FmpClient::from_config(config)?;
    let store = SnapshotStore::connect(&config.database_url).await?;
    Ok(SnapshotService::new(store, client))
}
