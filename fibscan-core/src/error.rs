//! Validation errors for core components.
//!
//! Insufficient history and an empty series are not errors: they produce an
//! absent signal. Only caller-supplied parameters and out-of-order bars are
//! rejected here.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("EMA period must be >= 1 (got {period})")]
    InvalidPeriod { period: usize },

    #[error("swing lookback must be >= 1 (got {lookback})")]
    InvalidLookback { lookback: usize },

    #[error("bar series capacity must be >= 1 (got {capacity})")]
    InvalidCapacity { capacity: usize },

    #[error("tolerance ratio must be finite and >= 0 (got {ratio})")]
    InvalidTolerance { ratio: f64 },

    #[error("bar at {time} precedes the last bar at {last}")]
    OutOfOrder {
        time: DateTime<Utc>,
        last: DateTime<Utc>,
    },
}
