//! Swing extremes — highest high and lowest low over a trailing window.
//!
//! The window is the last `min(lookback, len)` bars. Indices in the result are
//! local to that window. Ties keep the first occurrence.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingExtremes {
    pub high: f64,
    pub low: f64,
    pub high_index: usize,
    pub low_index: usize,
}

impl SwingExtremes {
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwingLocator {
    lookback: usize,
}

impl SwingLocator {
    pub fn new(lookback: usize) -> Result<Self, CoreError> {
        if lookback == 0 {
            return Err(CoreError::InvalidLookback { lookback });
        }
        Ok(Self { lookback })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Returns `None` for an empty series.
    pub fn locate(&self, bars: &[Bar]) -> Option<SwingExtremes> {
        if bars.is_empty() {
            return None;
        }

        let start = bars.len().saturating_sub(self.lookback);
        let window = &bars[start..];

        let mut extremes = SwingExtremes {
            high: f64::NEG_INFINITY,
            low: f64::INFINITY,
            high_index: 0,
            low_index: 0,
        };
        for (i, bar) in window.iter().enumerate() {
            if bar.high > extremes.high {
                extremes.high = bar.high;
                extremes.high_index = i;
            }
            if bar.low < extremes.low {
                extremes.low = bar.low;
                extremes.low_index = i;
            }
        }

        Some(extremes)
    }
}
