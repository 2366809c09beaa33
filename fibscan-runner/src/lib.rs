//! FibScan Runner — configuration, bar acquisition, scan driver, record sink, notifier.
//!
//! This crate builds on `fibscan-core` to provide:
//! - TOML scan configuration
//! - CSV bar loading and deterministic synthetic samples
//! - Bar sources for watch mode (synthetic random walk, replay)
//! - The scan driver: bounded series, one cycle at a time, news gate
//! - Append-only CSV signal records and notification delivery

pub mod config;
pub mod data_loader;
pub mod driver;
pub mod feed;
pub mod news;
pub mod notifier;
pub mod sink;

pub use config::{ConfigError, ScanConfig};
pub use data_loader::{generate_synthetic_bars, load_bars_csv, write_bars_csv, LoadError};
pub use driver::{run_watch, CycleOutcome, ScanDriver, WatchOptions, WatchSummary};
pub use feed::{BarSource, ReplayFeed, SyntheticFeed};
pub use news::{AlwaysClear, BlockList, NewsFilter};
pub use notifier::{LogNotifier, Notifier, NotifyError};
pub use sink::{CsvRecordSink, RecordSink, SinkError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn driver_is_send_sync() {
        assert_send::<ScanDriver>();
        assert_sync::<ScanDriver>();
    }

    #[test]
    fn config_is_send_sync() {
        assert_send::<ScanConfig>();
        assert_sync::<ScanConfig>();
    }

    #[test]
    fn cycle_outcome_is_send_sync() {
        assert_send::<CycleOutcome>();
        assert_sync::<CycleOutcome>();
    }

    #[test]
    fn feeds_are_send() {
        assert_send::<SyntheticFeed>();
        assert_send::<ReplayFeed>();
    }

    #[test]
    fn sink_is_send() {
        assert_send::<CsvRecordSink>();
    }
}
