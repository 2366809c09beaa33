//! FibScan Core — bars, EMA tracks, swing extremes, Fibonacci levels, signal evaluator.
//!
//! This crate contains the pure signal pipeline:
//! - Domain types (bars, signals, sink rows, notifications)
//! - EMA smoothing over closes
//! - Swing high/low over a trailing window
//! - Fibonacci retracement levels and tolerance matching
//! - The signal evaluator combining trend, retracement and crossover rules
//! - A bounded FIFO bar series
//!
//! Nothing here performs I/O. Persistence, notification and bar acquisition
//! live in `fibscan-runner`.

pub mod config;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod indicators;
pub mod series;

pub use config::EvaluatorConfig;
pub use domain::{Bar, Signal, SignalKind, SignalRule, Trend};
pub use error::CoreError;
pub use evaluator::{EmaTracks, SignalEvaluator};
pub use series::BarSeries;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types can cross the driver's thread boundary.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<Signal>();
        require_sync::<Signal>();
        require_send::<BarSeries>();
        require_sync::<BarSeries>();
        require_send::<SignalEvaluator>();
        require_sync::<SignalEvaluator>();
        require_send::<EvaluatorConfig>();
        require_sync::<EvaluatorConfig>();
        require_send::<CoreError>();
        require_sync::<CoreError>();
    }

    /// Architecture contract: the evaluator reads a slice and nothing else.
    ///
    /// `evaluate(&self, &[Bar])` takes no series handle, sink or clock, so it
    /// cannot mutate the buffer or perform I/O.
    #[test]
    fn evaluator_signature_is_read_only() {
        fn _check(evaluator: &SignalEvaluator, bars: &[Bar]) -> Option<Signal> {
            evaluator.evaluate(bars)
        }
    }
}
