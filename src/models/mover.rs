use crate::constants::LAUNCH_LINK_BASE;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the provider's gainers/losers list
///
/// # Number format
/// `price`, `change` and `changes_percentage` keep the provider's formatting
/// (the JSON number `12.50` arrives as `12.5` and is stored as `"12.5"`).
/// They are only parsed when a numeric value is needed, see [`Mover::percentage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub changes_percentage: String,

    /// Filled in by sector enrichment on the cached view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl Mover {
    /// Build from one raw provider record
    ///
    /// Fails with a data-shape error when any of `symbol`, `name`, `price`,
    /// `change` or `changesPercentage` is missing.
    pub fn from_value(record: &Value) -> Result<Self> {
        Ok(Self {
            symbol: required_field(record, "symbol")?,
            name: required_field(record, "name")?,
            price: required_field(record, "price")?,
            change: required_field(record, "change")?,
            changes_percentage: required_field(record, "changesPercentage")?,
            sector: None,
        })
    }

    /// Numeric percentage change, `None` when the provider sent something unparsable
    pub fn percentage(&self) -> Option<f64> {
        parse_percentage(&self.changes_percentage)
    }

    pub fn launch_link(&self) -> String {
        launch_link(&self.symbol)
    }
}

/// Link to the symbol's summary page
pub fn launch_link(symbol: &str) -> String {
    format!("{}{}", LAUNCH_LINK_BASE, symbol.trim().to_uppercase())
}

/// Parse a percentage as the provider formats it: `"5.2"`, `"+5.2%"`, `"(-5.2%)"`
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let cleaned = raw
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim_end_matches('%')
        .trim_start_matches('+')
        .trim();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn required_field(record: &Value, key: &str) -> Result<String> {
    match record.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Null) | None => Err(AppError::DataShape(format!("Missing '{}' field", key))),
        Some(other) => Err(AppError::DataShape(format!(
            "Unexpected value for '{}': {}",
            key, other
        ))),
    }
}
