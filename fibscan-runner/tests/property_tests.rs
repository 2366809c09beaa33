//! Property tests for the scan driver's bar series.
//!
//! Uses proptest to verify:
//! 1. Appending any in-order sequence keeps `min(n, capacity)` bars, the newest ones
//! 2. Each append past capacity evicts exactly the oldest retained bar

use chrono::{Duration, TimeZone, Utc};
use fibscan_core::domain::Bar;
use fibscan_runner::{AlwaysClear, LogNotifier, ScanConfig, ScanDriver};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// In-order bars; gaps of 0 hours produce equal timestamps.
fn arb_ordered_bars(max_len: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((0i64..3, 1800.0..2000.0_f64), 0..max_len).prop_map(|steps| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut offset = 0;
        steps
            .into_iter()
            .map(|(gap, close)| {
                offset += gap;
                Bar::new(
                    base + Duration::hours(offset),
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                )
            })
            .collect()
    })
}

fn driver(capacity: usize) -> ScanDriver {
    let config = ScanConfig {
        series_capacity: capacity,
        ..ScanConfig::default()
    };
    ScanDriver::new(
        config,
        Box::new(fibscan_runner::CsvRecordSink::new(
            std::env::temp_dir().join("fibscan_property_unused.csv"),
        )),
        Box::new(LogNotifier),
        Box::new(AlwaysClear),
    )
    .unwrap()
}

// ── 1-2. Bounded appends ─────────────────────────────────────────────

proptest! {
    #[test]
    fn appends_keep_newest_bars_up_to_capacity(
        bars in arb_ordered_bars(200),
        capacity in 1usize..80,
    ) {
        let driver = driver(capacity);
        for bar in &bars {
            prop_assert!(driver.append_bar(*bar).is_ok());
        }

        let kept = bars.len().min(capacity);
        prop_assert_eq!(driver.series_len(), kept);
        prop_assert_eq!(driver.snapshot(), bars[bars.len() - kept..].to_vec());
    }

    #[test]
    fn eviction_returns_oldest_retained_bar(
        bars in arb_ordered_bars(120),
        capacity in 1usize..40,
    ) {
        let driver = driver(capacity);
        for (i, bar) in bars.iter().enumerate() {
            let evicted = driver.append_bar(*bar).unwrap();
            let expected = i.checked_sub(capacity).map(|j| bars[j]);
            prop_assert_eq!(evicted, expected);
        }
    }
}
