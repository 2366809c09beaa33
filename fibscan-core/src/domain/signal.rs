//! Signal — the immutable output of one evaluation.
//!
//! Signals describe a market event at the last bar of the evaluated series. They
//! carry no persistence or delivery state: the driver flattens them into a
//! [`SignalRecord`] for the record sink and a [`Notification`] for the notifier.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::fibonacci::FibLevel;

/// Directional intent of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which decision rule produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalRule {
    /// Aligned EMA trend with price sitting on an interior retracement level.
    TrendRetracement,
    /// Fast EMA crossed the medium EMA on the last bar.
    Crossover,
}

/// EMA stack classification at a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// fast > med > slow
    Bullish,
    /// fast < med < slow
    Bearish,
    Neutral,
}

impl Trend {
    pub fn classify(fast: f64, med: f64, slow: f64) -> Self {
        if fast > med && med > slow {
            Trend::Bullish
        } else if fast < med && med < slow {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }
}

/// The three EMA values at the signal bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaSnapshot {
    pub fast: f64,
    pub med: f64,
    pub slow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub rule: SignalRule,
    pub reason: String,
    /// Close of the last bar.
    pub price: f64,
    /// Time of the last bar.
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_level: Option<FibLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_snapshot: Option<EmaSnapshot>,
}

impl Signal {
    /// Flatten into the row shape accepted by a record sink.
    pub fn to_record(&self, symbol: &str) -> SignalRecord {
        SignalRecord {
            time: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            symbol: symbol.to_string(),
            kind: self.kind,
            price: self.price,
            reason: self.reason.clone(),
        }
    }

    /// Title/body pair for a notifier.
    pub fn notification(&self, symbol: &str) -> Notification {
        Notification {
            title: format!("Signal {} - {}", self.kind, symbol),
            body: format!("{} @ {}", self.reason, self.price),
        }
    }
}

/// One row of signal history: `time,symbol,type,price,reason`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub time: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub price: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}
