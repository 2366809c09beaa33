//! FibScan CLI — one-shot scans, watch mode, sample data and config scaffolding.
//!
//! Commands:
//! - `scan` — load bars (CSV or synthetic), run one cycle, print the result
//! - `watch` — seed the series, then tick a bar source on an interval
//! - `sample` — write deterministic synthetic bars to a CSV file
//! - `init-config` — write a default TOML scan configuration
//!
//! Logging goes to stderr and is filtered with `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Timelike, Utc};
use clap::{Parser, Subcommand};
use fibscan_core::domain::{Bar, Signal};
use fibscan_runner::data_loader::DEFAULT_SAMPLE_PRICE;
use fibscan_runner::{
    generate_synthetic_bars, load_bars_csv, run_watch, write_bars_csv, BarSource, CycleOutcome,
    ReplayFeed, ScanConfig, ScanDriver, SyntheticFeed, WatchOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fibscan",
    version,
    about = "FibScan — EMA trend and Fibonacci retracement signal scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single scan cycle over a bar history.
    Scan {
        /// Path to a TOML scan config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV file with columns time,open,high,low,close.
        #[arg(long, conflicts_with = "synthetic")]
        bars: Option<PathBuf>,

        /// Generate a synthetic history instead of reading a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Number of synthetic bars.
        #[arg(long, default_value_t = 200)]
        count: usize,

        /// Print the signal as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Seed the series, then append one bar and scan on every tick.
    Watch {
        /// Path to a TOML scan config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Replay bars from this CSV file instead of a synthetic feed.
        #[arg(long)]
        bars: Option<PathBuf>,

        /// Bars used to seed the series before ticking. Defaults to the evaluator warmup.
        #[arg(long)]
        seed_bars: Option<usize>,

        /// Delay between ticks. Overrides `interval_ms` from the config.
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Stop after this many ticks.
        #[arg(long)]
        cycles: Option<u64>,
    },
    /// Write synthetic hourly bars to a CSV file.
    Sample {
        #[arg(long, default_value = "bars.csv")]
        output: PathBuf,

        #[arg(long, default_value_t = 200)]
        count: usize,

        #[arg(long, default_value_t = DEFAULT_SAMPLE_PRICE)]
        start_price: f64,

        #[arg(long, default_value = fibscan_runner::config::DEFAULT_SYMBOL)]
        symbol: String,
    },
    /// Write the default scan configuration as TOML.
    InitConfig {
        #[arg(long, default_value = "fibscan.toml")]
        output: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            bars,
            synthetic,
            count,
            json,
        } => run_scan(config.as_deref(), bars.as_deref(), synthetic, count, json),
        Commands::Watch {
            config,
            bars,
            seed_bars,
            interval_ms,
            cycles,
        } => run_watch_cmd(config.as_deref(), bars.as_deref(), seed_bars, interval_ms, cycles),
        Commands::Sample {
            output,
            count,
            start_price,
            symbol,
        } => run_sample(&output, count, start_price, &symbol),
        Commands::InitConfig { output, force } => run_init_config(&output, force),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn load_csv(path: &Path) -> Result<Vec<Bar>> {
    load_bars_csv(path).with_context(|| format!("loading bars from {}", path.display()))
}

/// Top of the current hour, so synthetic runs line up on hourly bars.
fn hour_floor(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

fn run_scan(
    config_path: Option<&Path>,
    bars_path: Option<&Path>,
    synthetic: bool,
    count: usize,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let bars = match (bars_path, synthetic) {
        (Some(path), _) => load_csv(path)?,
        (None, true) => generate_synthetic_bars(
            &config.symbol,
            count,
            DEFAULT_SAMPLE_PRICE,
            hour_floor(Utc::now()),
        ),
        (None, false) => bail!("one of --bars or --synthetic is required"),
    };

    let driver = ScanDriver::from_config(config).context("building scan driver")?;
    driver.load_bars(bars).context("loading bar series")?;

    let outcome = driver.run_cycle();
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.signal())?);
        return Ok(());
    }

    let symbol = &driver.config().symbol;
    match outcome {
        CycleOutcome::Signal(signal) => print_signal(symbol, &signal),
        CycleOutcome::NoSignal => println!(
            "{symbol}: no signal ({} bars, warmup {})",
            driver.series_len(),
            driver.config().evaluator.warmup_bars()
        ),
        CycleOutcome::Disabled => println!("{symbol}: scanning disabled in config"),
        CycleOutcome::Blocked => println!("{symbol}: blocked by news filter"),
        CycleOutcome::Busy => println!("{symbol}: another cycle in flight"),
    }
    Ok(())
}

fn print_signal(symbol: &str, signal: &Signal) {
    println!(
        "{symbol}: {} @ {:.2} ({})",
        signal.kind,
        signal.price,
        signal.timestamp.to_rfc3339()
    );
    println!("  reason: {}", signal.reason);
    if let Some(level) = signal.matched_level {
        println!("  fib:    {} at {:.2}", level.ratio, level.price);
    }
    if let Some(ema) = signal.ema_snapshot {
        println!(
            "  ema:    fast {:.2} / med {:.2} / slow {:.2}",
            ema.fast, ema.med, ema.slow
        );
    }
}

fn run_watch_cmd(
    config_path: Option<&Path>,
    bars_path: Option<&Path>,
    seed_bars: Option<usize>,
    interval_ms: Option<u64>,
    cycles: Option<u64>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let seed_count = seed_bars.unwrap_or_else(|| config.evaluator.warmup_bars());
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.interval_ms));
    let symbol = config.symbol.clone();

    let (seed, mut source): (Vec<Bar>, Box<dyn BarSource>) = match bars_path {
        Some(path) => {
            let mut bars = load_csv(path)?;
            let rest = bars.split_off(seed_count.min(bars.len()));
            (bars, Box::new(ReplayFeed::new(rest)) as Box<dyn BarSource>)
        }
        None => {
            let end = hour_floor(Utc::now());
            let seed = generate_synthetic_bars(&symbol, seed_count, DEFAULT_SAMPLE_PRICE, end);
            let step = chrono::Duration::hours(1);
            let feed = SyntheticFeed::new(&symbol, DEFAULT_SAMPLE_PRICE, end, step);
            (seed, Box::new(feed) as Box<dyn BarSource>)
        }
    };

    let driver = ScanDriver::from_config(config).context("building scan driver")?;
    driver.load_bars(seed).context("seeding bar series")?;

    let stop = AtomicBool::new(false);
    let summary = run_watch(
        &driver,
        source.as_mut(),
        WatchOptions {
            interval,
            max_ticks: cycles,
        },
        &stop,
    );

    println!(
        "{symbol}: {} ticks, {} signals ({} buy / {} sell), {} rejected bars",
        summary.ticks, summary.signals, summary.buys, summary.sells, summary.rejected_bars
    );
    if let Some(signal) = driver.latest_signal() {
        print_signal(&symbol, &signal);
    }
    Ok(())
}

fn run_sample(output: &Path, count: usize, start_price: f64, symbol: &str) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    let bars = generate_synthetic_bars(symbol, count, start_price, hour_floor(Utc::now()));
    write_bars_csv(output, &bars)
        .with_context(|| format!("writing bars to {}", output.display()))?;
    println!("Wrote {count} {symbol} bars to {}", output.display());
    Ok(())
}

fn run_init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }
    let text = ScanConfig::default().to_toml_string()?;
    std::fs::write(output, text).with_context(|| format!("writing {}", output.display()))?;
    println!("Config written to: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hour_floor_drops_minutes_and_seconds() {
        let t = Utc.with_ymd_and_hms(2024, 5, 6, 13, 47, 12).unwrap();
        assert_eq!(
            hour_floor(t),
            Utc.with_ymd_and_hms(2024, 5, 6, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn scan_requires_a_bar_source() {
        let err = run_scan(None, None, false, 200, false).unwrap_err();
        assert!(err.to_string().contains("--bars or --synthetic"));
    }

    #[test]
    fn bars_and_synthetic_conflict() {
        let parsed = Cli::try_parse_from(["fibscan", "scan", "--bars", "x.csv", "--synthetic"]);
        assert!(parsed.is_err());
    }
}
