use crate::constants::{
    DEFAULT_CACHE_DIR, DEFAULT_CACHE_TTL_HOURS, DEFAULT_DATABASE_URL, FMP_BASE_URL,
    PLACEHOLDER_API_KEY,
};
use std::path::PathBuf;
use std::time::Duration;

/// Get FMP API key from environment variable or use the placeholder
pub fn get_fmp_api_key() -> String {
    std::env::var("FMP_API_KEY").unwrap_or_else(|_| PLACEHOLDER_API_KEY.to_string())
}

/// Get FMP base URL from environment variable or use default
pub fn get_fmp_base_url() -> String {
    std::env::var("FMP_BASE_URL").unwrap_or_else(|_| FMP_BASE_URL.to_string())
}

/// Get database connection string from environment variable or use default
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Get file cache directory from environment variable or use default
pub fn get_cache_dir() -> PathBuf {
    std::env::var("CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR))
}

/// Get file cache expiration window from `CACHE_TTL_HOURS` (falls back on unparsable values)
pub fn get_cache_ttl() -> Duration {
    let hours = std::env::var("CACHE_TTL_HOURS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_CACHE_TTL_HOURS);
    Duration::from_secs(hours * 3600)
}

/// Initialize tracing with `RUST_LOG`, defaulting to info
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Escape text for inclusion in HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
