use crate::commands::snapshot_service;
use crate::config::AppConfig;
use crate::server::{self, AppState};
use crate::services::{CachedMovers, FileCache, FmpClient};
use std::sync::Arc;

pub async fn run(host: String, port: u16) {
    println!("🚀 Starting stockmovers server on {}:{}", host, port);

    let config = AppConfig::from_env();
    println!("🗄️  Database: {}", config.database_url);
    println!("📁 Cache directory: {} (expires after {}h)", config.cache_dir.display(), config.cache_ttl.as_secs() / 3600);

    let app_state = match build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    match app_state.snapshots.store().record_count().await {
        Ok(count) => println!("📊 Stored snapshot records: {}", count),
        Err(e) => eprintln!("⚠️  Warning: could not count stored records: {}", e),
    }

    println!("🌐 Open http://{}:{}/ in your browser", host, port);

    if let Err(e) = server::serve(app_state, &host, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}

async fn build_state(config: &AppConfig) -> crate::error::Result<AppState> {
    let snapshots = snapshot_service(config).await?;
    let client = FmpClient::from_config(config)?;
    let cache = FileCache::new(&config.cache_dir, config.cache_ttl)?;

    Ok(AppState {
        snapshots: Arc::new(snapshots),
        cached: Arc::new(CachedMovers::new(cache, client.clone())),
        client,
    })
}
