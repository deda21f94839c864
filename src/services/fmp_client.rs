use crate::config::AppConfig;
use crate::constants::HTTP_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::models::{MarketSide, Mover};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Client for the Financial Modeling Prep gainers/losers endpoints
///
/// One GET per call, no retries. Network failures and non-2xx responses are
/// provider errors; bodies that do not look like a movers list are data-shape
/// errors.
#[derive(Clone)]
pub struct FmpClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl FmpClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - API base including version, e.g. "https://financialmodelingprep.com/api/v3"
    /// * `api_key` - FMP API key, sent as the `apikey` query parameter
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Invalid base_url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Provider(format!("Failed to create HTTP client: {}", e)))?;

        debug!(base_url = %base_url, "Created FmpClient");

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    /// Today's gainers or losers, truncated to `limit`
    ///
    /// GET {base}/stock_market/{gainers|losers}
    pub async fn fetch_movers(&self, side: MarketSide, limit: usize) -> Result<Vec<Mover>> {
        let path = format!("/stock_market/{}", side.as_str());
        let body = self.get_json(&path, &[]).await?;
        let movers = parse_movers(&body, limit)?;

        info!(side = %side, count = movers.len(), "Fetched movers from provider");
        Ok(movers)
    }

    /// Gainers or losers for a past trading day, truncated to `limit`
    ///
    /// GET {base}/historical-price-full/{gainers|losers}?date=YYYY-MM-DD
    pub async fn fetch_historical_movers(
        &self,
        side: MarketSide,
        date: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Mover>> {
        let path = format!("/historical-price-full/{}", side.as_str());
        let date_str = date.format("%Y-%m-%d").to_string();
        let body = self.get_json(&path, &[("date", date_str.as_str())]).await?;
        let movers = parse_historical_movers(&body, limit)?;

        info!(side = %side, date = %date_str, count = movers.len(), "Fetched historical movers from provider");
        Ok(movers)
    }

    /// Sector for each symbol that has one in its company profile
    ///
    /// GET {base}/profile/{SYM1,SYM2,...}
    pub async fn fetch_sectors(&self, symbols: &[String]) -> Result<HashMap<String, String>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        let path = format!("/profile/{}", symbols.join(","));
        let body = self.get_json(&path, &[]).await?;
        let sectors = parse_sectors(&body)?;

        debug!(requested = symbols.len(), found = sectors.len(), "Fetched sectors from provider");
        Ok(sectors)
    }

    /// GET `path` with the API key and extra query parameters, returning the parsed body
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?query, "Sending request to provider");

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the full URL (and so the key) in its message
                let error_msg = format!("Request to {} failed: {}", url, e.without_url());
                error!("{}", error_msg);
                Error::Provider(error_msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!(url = %url, %status, "Provider returned error status");
            return Err(Error::Provider(format!(
                "API returned error status {}: {}",
                status,
                body.trim()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("Failed to read response body: {}", e.without_url())))?;

        serde_json::from_str(&body)
            .map_err(|e| Error::DataShape(format!("Failed to parse JSON response from {}: {}", path, e)))
    }
}

/// Parse a live movers response: a JSON array of records
pub fn parse_movers(body: &Value, limit: usize) -> Result<Vec<Mover>> {
    let records = body.as_array().ok_or_else(|| {
        // The provider reports a bad key as {"Error Message": "..."}
        Error::DataShape(format!("Expected a JSON array of movers, got: {}", summarize(body)))
    })?;

    records.iter().take(limit).map(Mover::from_value).collect()
}

/// Parse a historical movers response: `{"historical": [...]}`
///
/// A body without `historical` means the provider has no data for that day
/// and yields an empty list.
pub fn parse_historical_movers(body: &Value, limit: usize) -> Result<Vec<Mover>> {
    let object = body.as_object().ok_or_else(|| {
        Error::DataShape(format!("Expected a JSON object, got: {}", summarize(body)))
    })?;

    match object.get("historical") {
        Some(historical) => parse_movers(historical, limit),
        None => {
            warn!("Historical response has no 'historical' field, treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Parse a profile response into symbol -> sector, skipping blank sectors
pub fn parse_sectors(body: &Value) -> Result<HashMap<String, String>> {
    let profiles = body.as_array().ok_or_else(|| {
        Error::DataShape(format!("Expected a JSON array of profiles, got: {}", summarize(body)))
    })?;

    let mut sectors = HashMap::new();
    for profile in profiles {
        let symbol = profile["symbol"].as_str();
        let sector = profile["sector"].as_str().map(str::trim).filter(|s| !s.is_empty());
        if let (Some(symbol), Some(sector)) = (symbol, sector) {
            sectors.insert(symbol.to_string(), sector.to_string());
        }
    }
    Ok(sectors)
}

fn summarize(body: &Value) -> String {
    let text = body.to_string();
    if text.len() > 120 {
        let cut = (0..=120).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &text[..cut])
    } else {
        text
    }
}
