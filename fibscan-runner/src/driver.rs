//! Scan driver — owns the bar series and runs one evaluation cycle at a time.
//!
//! A cycle is: enable check → in-flight guard → news gate → snapshot the
//! series → evaluate → on a signal, append a record and (optionally) notify.
//!
//! The series is behind a mutex and evaluation runs on an owned snapshot, so an
//! append racing a cycle can never be observed half-way. A cycle triggered
//! while another is running is dropped (`CycleOutcome::Busy`). Sink and
//! notifier failures are logged and never fail the cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use fibscan_core::domain::{Bar, Signal, SignalKind};
use fibscan_core::{BarSeries, CoreError, SignalEvaluator};

use crate::config::{ConfigError, ScanConfig};
use crate::feed::BarSource;
use crate::news::{AlwaysClear, NewsFilter};
use crate::notifier::{LogNotifier, Notifier};
use crate::sink::{CsvRecordSink, RecordSink};

/// Result of one trigger of the scan cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Scanning is switched off in the configuration.
    Disabled,
    /// Another cycle was already running; this trigger was dropped.
    Busy,
    /// The news gate suppressed this cycle.
    Blocked,
    /// Evaluation ran and produced no signal.
    NoSignal,
    Signal(Signal),
}

impl CycleOutcome {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            CycleOutcome::Signal(s) => Some(s),
            _ => None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight flag when a cycle ends, including on unwind.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ScanDriver {
    config: ScanConfig,
    evaluator: SignalEvaluator,
    enabled: AtomicBool,
    in_flight: AtomicBool,
    series: Mutex<BarSeries>,
    latest: Mutex<Option<Signal>>,
    sink: Mutex<Box<dyn RecordSink>>,
    notifier: Box<dyn Notifier>,
    news: Box<dyn NewsFilter>,
}

impl std::fmt::Debug for ScanDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanDriver")
            .field("config", &self.config)
            .field("enabled", &self.enabled)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl ScanDriver {
    pub fn new(
        config: ScanConfig,
        sink: Box<dyn RecordSink>,
        notifier: Box<dyn Notifier>,
        news: Box<dyn NewsFilter>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = SignalEvaluator::new(config.evaluator)?;
        let series = BarSeries::new(config.series_capacity)?;
        Ok(Self {
            enabled: AtomicBool::new(config.enabled),
            in_flight: AtomicBool::new(false),
            series: Mutex::new(series),
            latest: Mutex::new(None),
            sink: Mutex::new(sink),
            evaluator,
            config,
            notifier,
            news,
        })
    }

    /// Driver with a CSV sink at `config.record_path`, log notifications and no news gate.
    pub fn from_config(config: ScanConfig) -> Result<Self, ConfigError> {
        let sink = CsvRecordSink::new(config.record_path.clone());
        Self::new(
            config,
            Box::new(sink),
            Box::new(LogNotifier),
            Box::new(AlwaysClear),
        )
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        tracing::info!(symbol = %self.config.symbol, enabled, "scan cycle toggled");
    }

    /// Replace the series with `bars`, keeping the newest `series_capacity`.
    pub fn load_bars(&self, bars: Vec<Bar>) -> Result<(), CoreError> {
        let count = bars.len();
        let mut series = lock(&self.series);
        series.replace(bars)?;
        tracing::info!(
            symbol = %self.config.symbol,
            loaded = count,
            kept = series.len(),
            "bar series loaded"
        );
        Ok(())
    }

    /// Append one bar, returning the bar evicted to stay within capacity.
    pub fn append_bar(&self, bar: Bar) -> Result<Option<Bar>, CoreError> {
        lock(&self.series).push(bar)
    }

    pub fn series_len(&self) -> usize {
        lock(&self.series).len()
    }

    pub fn snapshot(&self) -> Vec<Bar> {
        lock(&self.series).snapshot()
    }

    /// Signal produced by the most recent completed evaluation, if any.
    pub fn latest_signal(&self) -> Option<Signal> {
        lock(&self.latest).clone()
    }

    /// Run one scan cycle against the current series.
    pub fn run_cycle(&self) -> CycleOutcome {
        if !self.is_enabled() {
            return CycleOutcome::Disabled;
        }
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!(symbol = %self.config.symbol, "cycle already in flight, trigger dropped");
            return CycleOutcome::Busy;
        };

        let symbol = &self.config.symbol;
        if !self.news.allows(symbol) {
            tracing::info!(symbol = %symbol, "news filter blocked cycle");
            return CycleOutcome::Blocked;
        }

        let bars = self.snapshot();
        let signal = self.evaluator.evaluate(&bars);
        *lock(&self.latest) = signal.clone();

        let Some(signal) = signal else {
            tracing::debug!(symbol = %symbol, bars = bars.len(), "no signal");
            return CycleOutcome::NoSignal;
        };

        tracing::info!(
            symbol = %symbol,
            kind = %signal.kind,
            rule = ?signal.rule,
            price = signal.price,
            reason = %signal.reason,
            "signal emitted"
        );
        self.publish(&signal);
        CycleOutcome::Signal(signal)
    }

    fn publish(&self, signal: &Signal) {
        let symbol = &self.config.symbol;
        let record = signal.to_record(symbol);
        if let Err(e) = lock(&self.sink).append(&record) {
            tracing::warn!(symbol = %symbol, error = %e, "failed to record signal");
        }

        if self.config.notifications {
            if let Err(e) = self.notifier.notify(&signal.notification(symbol)) {
                tracing::warn!(symbol = %symbol, error = %e, "failed to deliver notification");
            }
        }
    }

    /// Pull one bar from `source`, append it, and run a cycle.
    ///
    /// The series stays locked from reading the last bar until the new bar is
    /// pushed, so concurrent appends cannot slip in between. Returns `Ok(None)`
    /// once the source is exhausted.
    pub fn tick(&self, source: &mut dyn BarSource) -> Result<Option<CycleOutcome>, CoreError> {
        {
            let mut series = lock(&self.series);
            let Some(bar) = source.next_bar(series.last()) else {
                return Ok(None);
            };
            series.push(bar)?;
        }
        Ok(Some(self.run_cycle()))
    }
}

/// Options for the periodic scan loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub interval: Duration,
    /// Stop after this many ticks; `None` runs until the source ends or `stop` is set.
    pub max_ticks: Option<u64>,
}

/// Tally of a watch session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub ticks: u64,
    pub signals: u64,
    pub buys: u64,
    pub sells: u64,
    pub rejected_bars: u64,
}

/// Tick the driver from `source` every `interval` until stopped.
///
/// Runs on the calling thread, one cycle at a time. A bar the series rejects
/// is logged and counted; the loop continues with the next tick.
pub fn run_watch(
    driver: &ScanDriver,
    source: &mut dyn BarSource,
    options: WatchOptions,
    stop: &AtomicBool,
) -> WatchSummary {
    let mut summary = WatchSummary::default();
    tracing::info!(
        symbol = %driver.config().symbol,
        interval_ms = options.interval.as_millis() as u64,
        "watch started"
    );

    while !stop.load(Ordering::Acquire) {
        if options.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }
        match driver.tick(source) {
            Ok(None) => break,
            Ok(Some(outcome)) => {
                summary.ticks += 1;
                if let Some(signal) = outcome.signal() {
                    summary.signals += 1;
                    match signal.kind {
                        SignalKind::Buy => summary.buys += 1,
                        SignalKind::Sell => summary.sells += 1,
                    }
                }
            }
            Err(e) => {
                summary.ticks += 1;
                summary.rejected_bars += 1;
                tracing::warn!(error = %e, "bar rejected");
            }
        }
        if !options.interval.is_zero() {
            std::thread::sleep(options.interval);
        }
    }

    tracing::info!(
        ticks = summary.ticks,
        signals = summary.signals,
        "watch finished"
    );
    summary
}
