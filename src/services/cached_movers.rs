use crate::constants::CACHED_LIMIT;
use crate::error::Result;
use crate::models::{MarketSide, Mover};
use crate::services::file_cache::FileCache;
use crate::services::fmp_client::FmpClient;
use tracing::{debug, info, warn};

/// Movers served from the JSON file cache, refreshed from the provider when stale
///
/// Fresh fetches are enriched with each symbol's sector before being cached.
pub struct CachedMovers {
    cache: FileCache,
    client: FmpClient,
    limit: usize,
}

impl CachedMovers {
    pub fn new(cache: FileCache, client: FmpClient) -> Self {
        Self {
            cache,
            client,
            limit: CACHED_LIMIT,
        }
    }

    /// One side of the board, keyed in the cache by the side's name
    pub async fn load(&self, side: MarketSide) -> Result<Vec<Mover>> {
        let key = side.as_str();

        if let Some(value) = self.cache.get(key) {
            match serde_json::from_value::<Vec<Mover>>(value) {
                Ok(movers) => {
                    debug!(side = %side, count = movers.len(), "Serving movers from file cache");
                    return Ok(movers);
                }
                Err(e) => warn!(side = %side, error = %e, "Cached movers have unexpected shape, refetching"),
            }
        }

        let mut movers = self.client.fetch_movers(side, self.limit).await?;
        self.enrich_sectors(&mut movers).await;

        let value = serde_json::to_value(&movers)?;
        if let Err(e) = self.cache.set(key, &value) {
            warn!(side = %side, dir = %self.cache.dir().display(), error = %e, "Failed to write movers cache");
        }

        info!(side = %side, count = movers.len(), "Refreshed movers cache");
        Ok(movers)
    }

    /// Fill in `sector` from company profiles; a failed lookup leaves sectors empty
    async fn enrich_sectors(&self, movers: &mut [Mover]) {
        let symbols: Vec<String> = movers.iter().map(|m| m.symbol.clone()).collect();

        match self.client.fetch_sectors(&symbols).await {
            Ok(sectors) => {
                for mover in movers.iter_mut() {
                    mover.sector = sectors.get(&mover.symbol).cloned();
                }
            }
            Err(e) => warn!(error = %e, "Sector lookup failed, continuing without sectors"),
        }
    }
}
