pub mod pages;
pub mod views;

use crate::services::{CachedMovers, FmpClient, SnapshotService};
use axum::{extract::FromRef, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub snapshots: Arc<SnapshotService>,
    pub client: FmpClient,
    pub cached: Arc<CachedMovers>,
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for Arc<SnapshotService> {
    fn from_ref(app_state: &AppState) -> Arc<SnapshotService> {
        app_state.snapshots.clone()
    }
}

impl FromRef<AppState> for FmpClient {
    fn from_ref(app_state: &AppState) -> FmpClient {
        app_state.client.clone()
    }
}

impl FromRef<AppState> for Arc<CachedMovers> {
    fn from_ref(app_state: &AppState) -> Arc<CachedMovers> {
        app_state.cached.clone()
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_handler))
        .route("/snapshots/{date}", get(pages::snapshot_handler))
        .route("/live", get(pages::live_handler))
        .route("/cached", get(pages::cached_handler))
        .route("/health", get(pages::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(app_state: AppState, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Registering routes:");
    tracing::info!("  GET /");
    tracing::info!("  GET /snapshots/{{date}}");
    tracing::info!("  GET /live");
    tracing::info!("  GET /cached");
    tracing::info!("  GET /health");

    let app = router(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{healthy_provider, spawn_stub};
    use crate::services::{FileCache, SnapshotStore};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_router_serves_every_route() {
        let temp_dir = tempdir().unwrap();
        let provider_url = spawn_stub(healthy_provider(Arc::new(AtomicUsize::new(0)))).await;
        let client = FmpClient::new(provider_url, "test-key".to_string()).unwrap();

        let url = format!("sqlite://{}", temp_dir.path().join("movers.db").display());
        let store = SnapshotStore::connect(&url).await.unwrap();
        let cache = FileCache::new(temp_dir.path().join("cache"), Duration::from_secs(3600)).unwrap();

        let state = AppState {
            snapshots: Arc::new(SnapshotService::new(store, client.clone())),
            cached: Arc::new(CachedMovers::new(cache, client.clone())),
            client,
        };
        let base = spawn_stub(router(state)).await;

        let http = reqwest::Client::new();
        for (path, status) in [
            ("/", 200),
            ("/live", 200),
            ("/cached", 200),
            ("/health", 200),
            ("/snapshots/not-a-date", 400),
            ("/snapshots/1999-01-01", 404),
        ] {
            let response = http.get(format!("{}{}", base, path)).send().await.unwrap();
            assert_eq!(response.status().as_u16(), status, "GET {}", path);
        }
    }
}
