//! Domain types for FibScan

pub mod bar;
pub mod signal;

pub use bar::Bar;
pub use signal::{EmaSnapshot, Notification, Signal, SignalKind, SignalRecord, SignalRule, Trend};
