//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[0] = close[0]. Every index carries a value; there is no NaN warmup.
//!
//! The seed is the first element of whatever slice is passed, so the track
//! depends on how much history the caller supplies. Callers pass the whole
//! series on every evaluation, at O(n) per track.

use crate::domain::Bar;
use crate::error::CoreError;

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, CoreError> {
        if period == 0 {
            return Err(CoreError::InvalidPeriod { period });
        }
        Ok(Self {
            period,
            name: format!("ema_{period}"),
        })
    }

    /// EMA track over an arbitrary value series.
    pub fn compute_values(&self, values: &[f64]) -> Vec<f64> {
        smooth(values, alpha(self.period))
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.compute_values(&closes)
    }
}

/// Compute EMA values from a pre-extracted f64 slice.
pub fn ema_of_series(values: &[f64], period: usize) -> Result<Vec<f64>, CoreError> {
    if period == 0 {
        return Err(CoreError::InvalidPeriod { period });
    }
    Ok(smooth(values, alpha(period)))
}

fn alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

fn smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&seed) = values.first() else {
        return result;
    };
    result.push(seed);

    let mut prev = seed;
    for &v in &values[1..] {
        // Same recurrence as alpha*v + (1-alpha)*prev, but exact when v == prev.
        let ema = prev + alpha * (v - prev);
        result.push(ema);
        prev = ema;
    }

    result
}
