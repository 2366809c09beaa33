//! Evaluator parameters and their defaults.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const DEFAULT_FAST_PERIOD: usize = 8;
pub const DEFAULT_MED_PERIOD: usize = 13;
pub const DEFAULT_SLOW_PERIOD: usize = 21;

/// Trailing window scanned for swing extremes.
pub const DEFAULT_SWING_LOOKBACK: usize = 60;

/// Fraction of the swing range within which a close counts as "at" a level.
pub const DEFAULT_TOLERANCE_RATIO: f64 = 0.01;

/// Bars required beyond the slow period before the evaluator has an opinion.
pub const WARMUP_MARGIN: usize = 5;

/// Default bound of the bar series buffer.
pub const DEFAULT_SERIES_CAPACITY: usize = 500;

/// Parameters of the signal evaluator.
///
/// `fast < med < slow` is the conventional ordering but is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub fast_period: usize,
    pub med_period: usize,
    pub slow_period: usize,
    pub swing_lookback: usize,
    pub tolerance_ratio: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            fast_period: DEFAULT_FAST_PERIOD,
            med_period: DEFAULT_MED_PERIOD,
            slow_period: DEFAULT_SLOW_PERIOD,
            swing_lookback: DEFAULT_SWING_LOOKBACK,
            tolerance_ratio: DEFAULT_TOLERANCE_RATIO,
        }
    }
}

impl EvaluatorConfig {
    pub fn with_periods(fast_period: usize, med_period: usize, slow_period: usize) -> Self {
        Self {
            fast_period,
            med_period,
            slow_period,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for period in [self.fast_period, self.med_period, self.slow_period] {
            if period == 0 {
                return Err(CoreError::InvalidPeriod { period });
            }
        }
        if self.swing_lookback == 0 {
            return Err(CoreError::InvalidLookback {
                lookback: self.swing_lookback,
            });
        }
        if !self.tolerance_ratio.is_finite() || self.tolerance_ratio < 0.0 {
            return Err(CoreError::InvalidTolerance {
                ratio: self.tolerance_ratio,
            });
        }
        Ok(())
    }

    /// Minimum series length before a signal can be produced.
    pub fn warmup_bars(&self) -> usize {
        self.slow_period + WARMUP_MARGIN
    }
}
