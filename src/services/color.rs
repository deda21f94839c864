//! Row colors for the movers tables
//!
//! Each row is shaded by how large its move is relative to the biggest move
//! on the same side of the board:
//!
//! ```text
//! alpha = 0.1 + 0.9 * (|p| / m)    when m > 0
//! alpha = 0.1                      otherwise
//! ```
//!
//! Gainers are green `(0, 255, 0)`, losers red `(255, 0, 0)`. A percentage that
//! cannot be parsed gets the neutral color instead of an error.

use crate::constants::{GAINER_RGB, LOSER_RGB, MIN_ALPHA, NEUTRAL_COLOR};
use crate::models::{MarketSide, Mover};
use serde::Serialize;

/// A mover with its computed row color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredMover {
    #[serde(flatten)]
    pub mover: Mover,
    pub color: String,
}

/// Opacity for a move of `percentage` when the batch maximum is `max_percentage`
pub fn intensity(percentage: f64, max_percentage: f64) -> f64 {
    if !percentage.is_finite() || !max_percentage.is_finite() || max_percentage <= 0.0 {
        return MIN_ALPHA;
    }
    let normalized = percentage.abs() / max_percentage;
    (MIN_ALPHA + (1.0 - MIN_ALPHA) * normalized).clamp(MIN_ALPHA, 1.0)
}

/// CSS color for one row
pub fn color_for(percentage: Option<f64>, max_percentage: f64, side: MarketSide) -> String {
    let Some(percentage) = percentage.filter(|p| p.is_finite()) else {
        return NEUTRAL_COLOR.to_string();
    };

    let (r, g, b) = match side {
        MarketSide::Gainers => GAINER_RGB,
        MarketSide::Losers => LOSER_RGB,
    };
    let alpha = intensity(percentage, max_percentage);
    format!("rgba({}, {}, {}, {})", r, g, b, format_alpha(alpha))
}

/// Largest absolute parsable percentage in the batch, 0.0 for an empty batch
pub fn batch_max(movers: &[Mover]) -> f64 {
    movers
        .iter()
        .filter_map(Mover::percentage)
        .map(f64::abs)
        .fold(0.0, f64::max)
}

/// Attach colors to one side of the board
pub fn colorize(movers: Vec<Mover>, side: MarketSide) -> Vec<ColoredMover> {
    let max = batch_max(&movers);
    movers
        .into_iter()
        .map(|mover| {
            let color = color_for(mover.percentage(), max, side);
            ColoredMover { mover, color }
        })
        .collect()
}

/// Three decimals, trailing zeros dropped: 0.55, 1, 0.325
fn format_alpha(alpha: f64) -> String {
    let s = format!("{:.3}", alpha);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mover(symbol: &str, pct: &str) -> Mover {
        Mover {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price: "1".to_string(),
            change: "0.1".to_string(),
            changes_percentage: pct.to_string(),
            sector: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_intensity_at_batch_maximum_is_full() {
        for m in [0.5, 5.0, 42.0, 1000.0] {
            assert!(approx(intensity(m, m), 1.0));
            assert!(approx(intensity(-m, m), 1.0));
        }
    }

    #[test]
    fn test_intensity_with_zero_maximum_is_minimum() {
        for p in [0.0, 3.0, -7.5, 100.0] {
            assert!(approx(intensity(p, 0.0), 0.1));
        }
    }

    #[test]
    fn test_intensity_ignores_sign() {
        for p in [0.1, 1.0, 2.5, 4.99] {
            assert!(approx(intensity(p, 5.0), intensity(-p, 5.0)));
        }
    }

    #[test]
    fn test_intensity_half_of_maximum() {
        assert!(approx(intensity(2.5, 5.0), 0.55));
    }

    #[test]
    fn test_color_for_sides() {
        assert_eq!(color_for(Some(2.5), 5.0, MarketSide::Gainers), "rgba(0, 255, 0, 0.55)");
        assert_eq!(color_for(Some(-5.0), 5.0, MarketSide::Losers), "rgba(255, 0, 0, 1)");
        assert_eq!(color_for(Some(0.0), 0.0, MarketSide::Losers), "rgba(255, 0, 0, 0.1)");
    }

    #[test]
    fn test_color_for_unparsable_is_neutral() {
        assert_eq!(color_for(None, 5.0, MarketSide::Gainers), NEUTRAL_COLOR);
        assert_eq!(color_for(Some(f64::NAN), 5.0, MarketSide::Losers), NEUTRAL_COLOR);
    }

    #[test]
    fn test_batch_max_uses_magnitude_and_skips_garbage() {
        let movers = vec![mover("A", "-8.5"), mover("B", "3.0"), mover("C", "n/a")];
        assert!(approx(batch_max(&movers), 8.5));
        assert_eq!(batch_max(&[]), 0.0);
    }

    #[test]
    fn test_colorize_losers() {
        let colored = colorize(
            vec![mover("A", "-10.0"), mover("B", "-5.0"), mover("C", "bad")],
            MarketSide::Losers,
        );
        assert_eq!(colored[0].color, "rgba(255, 0, 0, 1)");
        assert_eq!(colored[1].color, "rgba(255, 0, 0, 0.55)");
        assert_eq!(colored[2].color, NEUTRAL_COLOR);
        assert_eq!(colored[1].mover.symbol, "B");
    }
}
