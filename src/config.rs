use crate::utils::{get_cache_dir, get_cache_ttl, get_database_url, get_fmp_api_key, get_fmp_base_url};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, read from the environment once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub database_url: String,
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: get_fmp_api_key(),
            base_url: get_fmp_base_url(),
            database_url: get_database_url(),
            cache_dir: get_cache_dir(),
            cache_ttl: get_cache_ttl(),
        }
    }
}
