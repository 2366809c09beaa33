//! Signal evaluator — trend + retracement first, EMA crossover as fallback.
//!
//! Rules are checked in order and the first one that fires wins:
//! 1. Trend/retracement: the EMA stack is aligned (bullish or bearish) and the
//!    last close sits within tolerance of an interior Fibonacci level of the
//!    trailing swing. Carries the matched level and an EMA snapshot.
//! 2. Crossover: the fast EMA crossed the medium EMA between the previous and
//!    the last bar. Carries no attachments.
//!
//! A series shorter than `slow_period + WARMUP_MARGIN` produces no signal.
//! The evaluator never looks at anything beyond the slice it is given and keeps
//! no state between calls.

use crate::config::EvaluatorConfig;
use crate::domain::{Bar, EmaSnapshot, Signal, SignalKind, SignalRule, Trend};
use crate::error::CoreError;
use crate::indicators::{fib_levels, match_interior_level, Ema, Indicator, SwingLocator};

/// EMA tracks for one evaluation, index-aligned with the bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct EmaTracks {
    pub fast: Vec<f64>,
    pub med: Vec<f64>,
    pub slow: Vec<f64>,
}

impl EmaTracks {
    pub fn snapshot(&self, index: usize) -> Option<EmaSnapshot> {
        Some(EmaSnapshot {
            fast: *self.fast.get(index)?,
            med: *self.med.get(index)?,
            slow: *self.slow.get(index)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    config: EvaluatorConfig,
    fast: Ema,
    med: Ema,
    slow: Ema,
    swing: SwingLocator,
}

impl SignalEvaluator {
    pub fn new(config: EvaluatorConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            fast: Ema::new(config.fast_period)?,
            med: Ema::new(config.med_period)?,
            slow: Ema::new(config.slow_period)?,
            swing: SwingLocator::new(config.swing_lookback)?,
            config,
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Number of bars needed before the evaluator can produce output.
    pub fn warmup_bars(&self) -> usize {
        self.config.warmup_bars()
    }

    pub fn ema_tracks(&self, bars: &[Bar]) -> EmaTracks {
        EmaTracks {
            fast: self.fast.compute(bars),
            med: self.med.compute(bars),
            slow: self.slow.compute(bars),
        }
    }

    /// EMA stack classification at the last bar, `None` for an empty series.
    pub fn trend_at_last(&self, bars: &[Bar]) -> Option<Trend> {
        let last = bars.len().checked_sub(1)?;
        let s = self.ema_tracks(bars).snapshot(last)?;
        Some(Trend::classify(s.fast, s.med, s.slow))
    }

    /// Evaluate the series as of its last bar.
    ///
    /// Returns `None` when history is insufficient or no rule fires.
    pub fn evaluate(&self, bars: &[Bar]) -> Option<Signal> {
        if bars.len() < self.warmup_bars() {
            return None;
        }
        // warmup_bars() >= 6, so both indices exist.
        let last = bars.len() - 1;
        let prev = last - 1;
        let last_bar = &bars[last];

        let tracks = self.ema_tracks(bars);
        let now = tracks.snapshot(last)?;
        let trend = Trend::classify(now.fast, now.med, now.slow);

        let swing = self.swing.locate(bars)?;
        let levels = fib_levels(swing.high, swing.low);
        let tolerance = swing.range() * self.config.tolerance_ratio;
        let matched = match_interior_level(&levels, last_bar.close, tolerance);

        if let Some(level) = matched {
            let kind = match trend {
                Trend::Bullish => Some((SignalKind::Buy, "bullish")),
                Trend::Bearish => Some((SignalKind::Sell, "bearish")),
                Trend::Neutral => None,
            };
            if let Some((kind, label)) = kind {
                return Some(Signal {
                    kind,
                    rule: SignalRule::TrendRetracement,
                    reason: format!(
                        "EMA trend {label} and price retraced to fib {}",
                        level.ratio
                    ),
                    price: last_bar.close,
                    timestamp: last_bar.time,
                    matched_level: Some(level),
                    ema_snapshot: Some(now),
                });
            }
        }

        let before = tracks.snapshot(prev)?;
        let crossover = if before.fast <= before.med && now.fast > now.med {
            Some((SignalKind::Buy, "EMA fast crossed above EMA med"))
        } else if before.fast >= before.med && now.fast < now.med {
            Some((SignalKind::Sell, "EMA fast crossed below EMA med"))
        } else {
            None
        };

        crossover.map(|(kind, reason)| Signal {
            kind,
            rule: SignalRule::Crossover,
            reason: reason.to_string(),
            price: last_bar.close,
            timestamp: last_bar.time,
            matched_level: None,
            ema_snapshot: None,
        })
    }
}
