//! Indicators over a bar series.
//!
//! - `ema`: exponential moving average tracks over closes
//! - `swing`: highest high / lowest low over a trailing window
//! - `fibonacci`: retracement levels between a swing high and low
//!
//! Everything here is a pure function of its input slice. Nothing is cached
//! between calls; every evaluation recomputes from the full history it is given.

pub mod ema;
pub mod fibonacci;
pub mod swing;

pub use ema::{ema_of_series, Ema};
pub use fibonacci::{fib_levels, match_interior_level, FibLevel, FIB_RATIOS};
pub use swing::{SwingExtremes, SwingLocator};

use crate::domain::Bar;

/// Trait for single-series indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length, index-aligned with the input.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_21").
    fn name(&self) -> &str;

    /// Number of leading values that are still dominated by the seed.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic hourly bars from close prices for testing.
///
/// open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                base + chrono::Duration::hours(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
