//! Bar loading: CSV files and synthetic sample data.
//!
//! CSV files carry the columns `time,open,high,low,close` with RFC 3339 times.
//! Loaded bars must be sane and in non-decreasing time order; the first
//! offending row is reported by its 1-based data row number.
//!
//! Synthetic data is a developer aid for trying the pipeline without a feed.
//! It is deterministic per symbol.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use fibscan_core::domain::Bar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Default starting price of generated samples.
pub const DEFAULT_SAMPLE_PRICE: f64 = 1900.0;

/// Errors from the bar loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: bar at {time} has an inconsistent OHLC envelope")]
    InsaneBar { row: usize, time: DateTime<Utc> },

    #[error("row {row}: bar at {time} precedes the previous row")]
    OutOfOrder { row: usize, time: DateTime<Utc> },

    #[error("no bars found in {path}")]
    Empty { path: String },
}

/// Load bars from a CSV file.
pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars: Vec<Bar> = Vec::new();

    for (i, record) in reader.deserialize::<Bar>().enumerate() {
        let bar = record?;
        let row = i + 1;
        if !bar.is_sane() {
            return Err(LoadError::InsaneBar {
                row,
                time: bar.time,
            });
        }
        if let Some(prev) = bars.last() {
            if bar.time < prev.time {
                return Err(LoadError::OutOfOrder {
                    row,
                    time: bar.time,
                });
            }
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::Empty {
            path: path.display().to_string(),
        });
    }
    tracing::debug!(path = %path.display(), count = bars.len(), "loaded bars");
    Ok(bars)
}

/// Write bars to a CSV file with a header row, replacing any existing file.
pub fn write_bars_csv(path: &Path, bars: &[Bar]) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_path(path)?;
    for bar in bars {
        writer.serialize(bar)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Deterministic RNG seeded from the symbol name.
pub(crate) fn symbol_rng(symbol: &str) -> StdRng {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    StdRng::from_seed(seed)
}

pub(crate) fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Generate `n` hourly synthetic bars ending one hour before `end`.
///
/// Each close moves up to ±2.0 from the previous close (rounded to cents);
/// wicks extend up to 1.2 beyond the body.
pub fn generate_synthetic_bars(
    symbol: &str,
    n: usize,
    start_price: f64,
    end: DateTime<Utc>,
) -> Vec<Bar> {
    let mut rng = symbol_rng(symbol);
    let mut bars = Vec::with_capacity(n);
    let mut price = start_price;

    for i in 0..n {
        let open = price;
        let change: f64 = rng.gen_range(-2.0..2.0);
        let close = round_cents(open + change);
        let high = open.max(close) + rng.gen_range(0.0..1.2);
        let low = open.min(close) - rng.gen_range(0.0..1.2);
        let time = end - Duration::hours((n - i) as i64);
        bars.push(Bar::new(time, open, high, low, close));
        price = close;
    }

    bars
}
