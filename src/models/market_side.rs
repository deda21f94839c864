//! Which side of the day's movers list a record belongs to
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSide {
    /// Stocks whose price moved up the most
    #[serde(alias = "gainer")]
    Gainers,

    /// Stocks whose price moved down the most
    #[serde(alias = "loser")]
    Losers,
}

impl MarketSide {
    /// Both sides, gainers first
    pub fn all() -> [MarketSide; 2] {
        [MarketSide::Gainers, MarketSide::Losers]
    }

    /// Path segment used by the provider endpoints and as the cache key
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSide::Gainers => "gainers",
            MarketSide::Losers => "losers",
        }
    }

    pub fn is_gainer(&self) -> bool {
        matches!(self, MarketSide::Gainers)
    }

    pub fn from_is_gainer(is_gainer: bool) -> Self {
        if is_gainer {
            MarketSide::Gainers
        } else {
            MarketSide::Losers
        }
    }

    /// Table heading in rendered pages
    pub fn title(&self) -> &'static str {
        match self {
            MarketSide::Gainers => "Top Gainers",
            MarketSide::Losers => "Top Losers",
        }
    }
}

impl fmt::Display for MarketSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
