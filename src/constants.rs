//! Fixed values for the movers dashboard.
//!
//! ## Row counts per view
//!
//! | View        | Source                     | Rows per side |
//! |-------------|----------------------------|---------------|
//! | `/live`     | provider, every request    | 10            |
//! | `/cached`   | JSON file cache (24h)      | 25            |
//! | snapshots   | daily batch in the store   | 100           |

/// Default FMP API base (v3)
pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Used when `FMP_API_KEY` is not set; the provider rejects it, which surfaces as a provider error
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

/// Used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://stock_movers.db";

/// Used when `CACHE_DIR` is not set
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// File cache expiration window
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// Upstream request timeout
pub const HTTP_TIMEOUT_SECS: u64 = 30;

pub const LIVE_LIMIT: usize = 10;
pub const CACHED_LIMIT: usize = 25;
pub const SNAPSHOT_LIMIT: usize = 100;

/// Daily snapshot threshold (hour of day, US Eastern)
pub const SNAPSHOT_REFRESH_HOUR: u32 = 15;

/// Page that a symbol links to
pub const LAUNCH_LINK_BASE: &str = "https://financialmodelingprep.com/financial-summary/";

/// Row colors
pub const GAINER_RGB: (u8, u8, u8) = (0, 255, 0);
pub const LOSER_RGB: (u8, u8, u8) = (255, 0, 0);
pub const NEUTRAL_COLOR: &str = "rgba(128, 128, 128, 0.1)";

/// Opacity of a 0% move; a move equal to the batch maximum gets 1.0
pub const MIN_ALPHA: f64 = 0.1;
