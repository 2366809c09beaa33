//! Fibonacci retracement levels.
//!
//! Levels run from the swing high (ratio 0.0) down to the swing low (ratio 1.0):
//! price = high - (high - low) * ratio.

use serde::{Deserialize, Serialize};

/// Retracement ratios in level order.
pub const FIB_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibLevel {
    pub ratio: f64,
    pub price: f64,
}

impl FibLevel {
    /// The 0.0 and 1.0 levels sit on the raw extremes rather than inside the swing.
    pub fn is_boundary(&self) -> bool {
        self.ratio == 0.0 || self.ratio == 1.0
    }
}

/// Derive the seven retracement levels for a swing. `high == low` yields seven
/// levels at `high`.
pub fn fib_levels(high: f64, low: f64) -> [FibLevel; 7] {
    let diff = high - low;
    FIB_RATIOS.map(|ratio| FibLevel {
        ratio,
        price: high - diff * ratio,
    })
}

/// First interior level (in ratio order) whose price is within `tolerance` of `price`.
///
/// First-found, not closest: with overlapping tolerance bands the lower ratio wins.
pub fn match_interior_level(levels: &[FibLevel], price: f64, tolerance: f64) -> Option<FibLevel> {
    levels
        .iter()
        .find(|level| !level.is_boundary() && (price - level.price).abs() <= tolerance)
        .copied()
}
