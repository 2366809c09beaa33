//! Bounded, time-ordered bar buffer.
//!
//! The series is the only mutable piece of the pipeline. Appending past
//! capacity evicts the oldest bar (FIFO). Evaluation reads a contiguous slice
//! or an owned snapshot and never mutates the buffer.

use std::collections::VecDeque;

use crate::config::DEFAULT_SERIES_CAPACITY;
use crate::domain::Bar;
use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl Default for BarSeries {
    fn default() -> Self {
        Self {
            bars: VecDeque::with_capacity(DEFAULT_SERIES_CAPACITY),
            capacity: DEFAULT_SERIES_CAPACITY,
        }
    }
}

impl BarSeries {
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::InvalidCapacity { capacity });
        }
        Ok(Self {
            bars: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a bar, evicting and returning the oldest one if over capacity.
    ///
    /// Bars with the same time as the last bar are accepted as-is; a bar
    /// earlier than the last one is rejected and the series is left unchanged.
    pub fn push(&mut self, bar: Bar) -> Result<Option<Bar>, CoreError> {
        if let Some(last) = self.bars.back() {
            if bar.time < last.time {
                return Err(CoreError::OutOfOrder {
                    time: bar.time,
                    last: last.time,
                });
            }
        }
        self.bars.push_back(bar);
        if self.bars.len() > self.capacity {
            return Ok(self.bars.pop_front());
        }
        Ok(None)
    }

    /// Replace the whole series, keeping only the newest `capacity` bars.
    ///
    /// The input must already be time-ordered; on error the series is untouched.
    pub fn replace(&mut self, bars: impl IntoIterator<Item = Bar>) -> Result<(), CoreError> {
        let mut fresh = Self {
            bars: VecDeque::with_capacity(self.capacity),
            capacity: self.capacity,
        };
        for bar in bars {
            fresh.push(bar)?;
        }
        *self = fresh;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    /// Owned copy of the bars, oldest first.
    pub fn snapshot(&self) -> Vec<Bar> {
        self.bars.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            BarSeries::new(0),
            Err(CoreError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn default_capacity_is_500() {
        assert_eq!(BarSeries::default().capacity(), 500);
    }

    #[test]
    fn push_evicts_oldest_when_full() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        let mut series = BarSeries::new(3).unwrap();
        assert_eq!(series.push(bars[0]).unwrap(), None);
        assert_eq!(series.push(bars[1]).unwrap(), None);
        assert_eq!(series.push(bars[2]).unwrap(), None);
        assert_eq!(series.push(bars[3]).unwrap(), Some(bars[0]));
        assert_eq!(series.len(), 3);
        let closes: Vec<f64> = series.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![2.0, 3.0, 4.0]);
        assert_eq!(series.last().unwrap().close, 4.0);
    }

    #[test]
    fn out_of_order_bar_rejected_and_series_unchanged() {
        let bars = make_bars(&[1.0, 2.0]);
        let mut series = BarSeries::new(10).unwrap();
        series.push(bars[1]).unwrap();
        let err = series.push(bars[0]).unwrap_err();
        assert_eq!(
            err,
            CoreError::OutOfOrder {
                time: bars[0].time,
                last: bars[1].time
            }
        );
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn equal_time_accepted_without_dedup() {
        let bar = make_bars(&[1.0])[0];
        let mut series = BarSeries::new(10).unwrap();
        series.push(bar).unwrap();
        series.push(bar).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn replace_keeps_newest_bars() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut series = BarSeries::new(2).unwrap();
        series.replace(bars.clone()).unwrap();
        assert_eq!(series.snapshot(), bars[3..].to_vec());
    }

    #[test]
    fn replace_with_unordered_input_leaves_series_untouched() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let mut series = BarSeries::new(5).unwrap();
        series.push(bars[0]).unwrap();
        let unordered = vec![bars[2], bars[1]];
        assert!(series.replace(unordered).is_err());
        assert_eq!(series.snapshot(), vec![bars[0]]);
    }

    #[test]
    fn iter_and_snapshot_agree_after_wraparound() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let mut series = BarSeries::new(4).unwrap();
        for bar in &bars {
            series.push(*bar).unwrap();
        }
        let snapshot = series.snapshot();
        assert!(series.iter().eq(snapshot.iter()));
        assert_eq!(snapshot, bars[3..].to_vec());
    }
}
