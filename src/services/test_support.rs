//! Local stand-in for the FMP API, used by tests across the crate.

use crate::models::MarketSide;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serve `router` on an ephemeral local port and return its base URL
pub(crate) async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// `count` provider-shaped records; gainers are positive, losers negative,
/// both sorted by magnitude descending
pub(crate) fn sample_movers(side: MarketSide, count: usize) -> Value {
    let (prefix, sign) = match side {
        MarketSide::Gainers => ("GAIN", 1.0),
        MarketSide::Losers => ("LOSE", -1.0),
    };
    let records: Vec<Value> = (0..count)
        .map(|i| {
            let pct = sign * (50.0 - i as f64);
            json!({
                "symbol": format!("{}{}", prefix, i),
                "name": format!("{} Holdings {}", prefix, i),
                "price": 10.0 + i as f64,
                "change": sign * 1.5,
                "changesPercentage": pct
            })
        })
        .collect();
    Value::Array(records)
}

fn side_from_path(side: &str) -> Option<MarketSide> {
    MarketSide::all().into_iter().find(|s| s.as_str() == side)
}

/// A provider that answers every endpoint; `hits` counts live movers requests
pub(crate) fn healthy_provider(hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/stock_market/{side}",
            get(move |Path(side): Path<String>| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    match side_from_path(&side) {
                        Some(side) => Json(sample_movers(side, 40)).into_response(),
                        None => StatusCode::NOT_FOUND.into_response(),
                    }
                }
            }),
        )
        .route(
            "/historical-price-full/{side}",
            get(|Path(side): Path<String>, Query(params): Query<HashMap<String, String>>| async move {
                if !params.contains_key("date") {
                    return StatusCode::BAD_REQUEST.into_response();
                }
                match side_from_path(&side) {
                    Some(side) => Json(json!({ "historical": sample_movers(side, 5) })).into_response(),
                    None => StatusCode::NOT_FOUND.into_response(),
                }
            }),
        )
        .route(
            "/profile/{symbols}",
            get(|Path(symbols): Path<String>| async move {
                let profiles: Vec<Value> = symbols
                    .split(',')
                    .map(|symbol| json!({ "symbol": symbol, "sector": "Technology" }))
                    .collect();
                Json(Value::Array(profiles))
            }),
        )
}

/// A provider that is down: every request gets 503
pub(crate) fn failing_provider() -> Router {
    Router::new().fallback(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable") })
}

/// Gainers succeed, everything else gets 503
pub(crate) fn losers_failing_provider() -> Router {
    Router::new()
        .route(
            "/stock_market/gainers",
            get(|| async { Json(sample_movers(MarketSide::Gainers, 40)) }),
        )
        .fallback(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable") })
}

/// Answers 200 with a body that is not a movers list
pub(crate) fn malformed_provider() -> Router {
    Router::new().fallback(|| async { Json(json!({ "Error Message": "Invalid API KEY." })) })
}
