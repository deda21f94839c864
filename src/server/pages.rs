use super::views;
use crate::constants::LIVE_LIMIT;
use crate::error::{AppError, Result};
use crate::models::{partition_by_side, MarketSide, SnapshotRecord};
use crate::services::{colorize, CachedMovers, FmpClient, RefreshOutcome, SnapshotService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Snapshot index. Runs the daily gate first; a failed refresh still renders
/// whatever is already stored.
#[instrument(skip(service))]
pub async fn index_handler(State(service): State<Arc<SnapshotService>>) -> Response {
    match service.refresh_if_due(Utc::now()).await {
        RefreshOutcome::Stored(rows) => info!(rows, "Stored today's snapshot"),
        RefreshOutcome::Failed(reason) => error!(%reason, "Snapshot refresh failed, rendering stored data"),
        RefreshOutcome::NotDue | RefreshOutcome::AlreadyStored => {}
    }

    match service.store().snapshot_dates().await {
        Ok(dates) => Html(views::index_page(&dates)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list snapshot dates");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error loading stored snapshots.")
        }
    }
}

/// The latest batch stored on one date
#[instrument(skip(service))]
pub async fn snapshot_handler(
    State(service): State<Arc<SnapshotService>>,
    Path(date): Path<String>,
) -> Response {
    let (date, records) = match load_snapshot(&service, &date).await {
        Ok(loaded) => loaded,
        Err(AppError::InvalidInput(_)) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid date. Please use YYYY-MM-DD.");
        }
        Err(AppError::NotFound(message)) => return error_response(StatusCode::NOT_FOUND, &message),
        Err(e) => {
            error!(error = %e, "Failed to load snapshot");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error loading stored snapshots.");
        }
    };

    let last_updated = records
        .first()
        .map(|record| record.snapshot_timestamp.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();

    let (gainers, losers) = partition_by_side(&records);
    let html = views::movers_page(
        &format!("Market Movers for {}", date),
        &colorize(gainers, MarketSide::Gainers),
        &colorize(losers, MarketSide::Losers),
        &last_updated,
    );
    Html(html).into_response()
}

/// Parse a `YYYY-MM-DD` path segment and load that day's latest batch
async fn load_snapshot(service: &SnapshotService, raw: &str) -> Result<(NaiveDate, Vec<SnapshotRecord>)> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::InvalidInput(format!("'{}' is not a YYYY-MM-DD date: {}", raw, e)))?;

    let records = service.store().records_on(date).await?;
    if records.is_empty() {
        return Err(AppError::NotFound(format!("No snapshot stored for {}.", date)));
    }
    Ok((date, records))
}

/// Top movers straight from the provider, nothing stored
#[instrument(skip(client))]
pub async fn live_handler(State(client): State<FmpClient>) -> Response {
    let gainers = match client.fetch_movers(MarketSide::Gainers, LIVE_LIMIT).await {
        Ok(movers) => movers,
        Err(e) => return upstream_error_response(&e),
    };
    let losers = match client.fetch_movers(MarketSide::Losers, LIVE_LIMIT).await {
        Ok(movers) => movers,
        Err(e) => return upstream_error_response(&e),
    };

    let html = views::movers_page(
        "Live Market Movers",
        &colorize(gainers, MarketSide::Gainers),
        &colorize(losers, MarketSide::Losers),
        &eastern_now(),
    );
    Html(html).into_response()
}

/// Top movers with sectors, served from the file cache when fresh
#[instrument(skip(cached))]
pub async fn cached_handler(State(cached): State<Arc<CachedMovers>>) -> Response {
    let gainers = match cached.load(MarketSide::Gainers).await {
        Ok(movers) => movers,
        Err(e) => return upstream_error_response(&e),
    };
    let losers = match cached.load(MarketSide::Losers).await {
        Ok(movers) => movers,
        Err(e) => return upstream_error_response(&e),
    };

    let html = views::movers_page(
        "Market Movers by Sector",
        &colorize(gainers, MarketSide::Gainers),
        &colorize(losers, MarketSide::Losers),
        &eastern_now(),
    );
    Html(html).into_response()
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: i64,
    pub latest_snapshot: Option<NaiveDate>,
    pub snapshot_due: bool,
}

#[instrument(skip(service))]
pub async fn health_handler(State(service): State<Arc<SnapshotService>>) -> Response {
    let now = Utc::now();
    let store = service.store();

    let health = async {
        let records = store.record_count().await?;
        let latest_snapshot = store.latest_snapshot_date().await?;
        let snapshot_due = service.schedule().should_fetch(now, latest_snapshot);
        Ok::<_, AppError>(HealthResponse {
            status: "ok",
            records,
            latest_snapshot,
            snapshot_due,
        })
    };

    match health.await {
        Ok(health) => (StatusCode::OK, Json(health)).into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

fn eastern_now() -> String {
    crate::services::SnapshotSchedule::default()
        .local_now(Utc::now())
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Html(views::error_page(message))).into_response()
}

/// 500 page for a failed provider call; the page text never includes the raw error
fn upstream_error_response(err: &AppError) -> Response {
    error!(error = %err, "Failed to load movers from provider");
    let message = match err {
        AppError::DataShape(_) => "Error processing data from the API.",
        _ => "Error fetching data. Please check your API key and network connection.",
    };
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}
