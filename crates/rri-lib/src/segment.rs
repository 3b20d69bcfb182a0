//! Time-window segmentation of a series.

use crate::error::{RRiError, Result};
use crate::series::RRi;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Window layout for [`RRi::time_split`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitOptions {
    /// Window duration (seconds).
    pub seg_size: f64,
    /// Duration shared by consecutive windows (seconds).
    #[serde(default)]
    pub overlap: f64,
    /// Emit a trailing window that ran out of data before `seg_size`.
    #[serde(default)]
    pub keep_last: bool,
}

impl SplitOptions {
    pub fn new(seg_size: f64) -> Self {
        Self {
            seg_size,
            overlap: 0.0,
            keep_last: false,
        }
    }

    pub fn overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn keep_last(mut self, keep_last: bool) -> Self {
        self.keep_last = keep_last;
        self
    }

    pub fn step(&self) -> f64 {
        self.seg_size - self.overlap
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.seg_size.is_finite() && self.seg_size > 0.0) {
            return Err(RRiError::InvalidSegmentation(format!(
                "seg_size must be positive, got {}",
                self.seg_size
            )));
        }
        if !(self.overlap >= 0.0 && self.overlap < self.seg_size) {
            return Err(RRiError::InvalidSegmentation(format!(
                "overlap must be in [0, {}), got {}",
                self.seg_size, self.overlap
            )));
        }
        Ok(())
    }
}

/// Single-pass producer of the segments of a series.
///
/// Windows are `[k * step, k * step + seg_size)` measured from time zero.
/// The final point of the series also closes the window whose upper edge it
/// sits on. The first window without points ends the sequence. Only the
/// last non-empty window is held to `keep_last`; with overlap, earlier
/// windows that already reach the end of the data are still emitted even
/// though they cover less than `seg_size`. Once drained
/// the iterator stays empty; call [`RRi::time_split`] again to start over.
#[derive(Debug)]
pub struct TimeSplit<'a> {
    rri: &'a RRi,
    options: SplitOptions,
    k: usize,
    done: bool,
}

/// Index range of one window plus whether it took the final point through
/// its closed upper edge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    start: f64,
    lo: usize,
    hi: usize,
    closes_series: bool,
}

impl Window {
    fn is_empty(&self) -> bool {
        self.lo >= self.hi
    }
}

impl<'a> TimeSplit<'a> {
    fn new(rri: &'a RRi, options: SplitOptions) -> Result<Self> {
        options.validate()?;
        debug!(
            "splitting {} points into {}s windows (overlap {}s, keep_last {})",
            rri.len(),
            options.seg_size,
            options.overlap,
            options.keep_last
        );
        Ok(Self {
            rri,
            options,
            k: 0,
            done: false,
        })
    }

    fn window(&self, k: usize) -> Window {
        let time = self.rri.time();
        let start = k as f64 * self.options.step();
        let end = start + self.options.seg_size;
        let lo = time.partition_point(|&t| t < start);
        let mut hi = time.partition_point(|&t| t < end);
        let mut closes_series = false;
        if hi + 1 == time.len() && time[hi] == end {
            hi += 1;
            closes_series = true;
        }
        Window {
            start,
            lo,
            hi,
            closes_series,
        }
    }
}

impl Iterator for TimeSplit<'_> {
    type Item = Result<RRi>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let window = self.window(self.k);
        if window.is_empty() {
            debug!("window {} is empty, stopping", self.k);
            self.done = true;
            return None;
        }
        let is_final = window.closes_series || self.window(self.k + 1).is_empty();
        let time = self.rri.time();
        if is_final {
            self.done = true;
            let covered = time[window.hi - 1] - window.start;
            if covered < self.options.seg_size && !self.options.keep_last {
                debug!(
                    "dropping short trailing window {} ({covered}s < {}s)",
                    self.k, self.options.seg_size
                );
                return None;
            }
        }
        trace!(
            "window {} starting at {}s holds points {}..{}",
            self.k,
            window.start,
            window.lo,
            window.hi
        );
        self.k += 1;
        Some(self.rri.from_parts(
            self.rri.values()[window.lo..window.hi].to_vec(),
            time[window.lo..window.hi].to_vec(),
        ))
    }
}

impl FusedIterator for TimeSplit<'_> {}

impl RRi {
    /// Lazily cut the series into windows of `seg_size` seconds.
    pub fn time_split(&self, seg_size: f64, overlap: f64, keep_last: bool) -> Result<TimeSplit<'_>> {
        self.split_with(
            SplitOptions::new(seg_size)
                .overlap(overlap)
                .keep_last(keep_last),
        )
    }

    pub fn split_with(&self, options: SplitOptions) -> Result<TimeSplit<'_>> {
        TimeSplit::new(self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(split: TimeSplit<'_>) -> Vec<RRi> {
        split.collect::<Result<Vec<_>>>().unwrap()
    }

    fn times(segments: &[RRi]) -> Vec<Vec<f64>> {
        segments.iter().map(|s| s.time().to_vec()).collect()
    }

    #[test]
    fn splits_on_time_information() {
        let rri = RRi::with_time(
            vec![800.0, 810.0, 790.0, 795.0],
            vec![1.0, 5.0, 10.0, 20.0],
        )
        .unwrap();
        let segments = collect(rri.time_split(10.0, 0.0, false).unwrap());
        assert_eq!(times(&segments), vec![vec![1.0, 5.0], vec![10.0, 20.0]]);
        assert_eq!(segments[0].values(), &[800.0, 810.0]);
        assert_eq!(segments[1].values(), &[790.0, 795.0]);
    }

    #[test]
    fn keeps_short_last_segment_on_request() {
        let rri = RRi::with_time(
            vec![800.0, 810.0, 790.0, 795.0, 801.0],
            vec![1.0, 4.9, 5.1, 9.9, 12.0],
        )
        .unwrap();
        let kept = collect(rri.time_split(5.0, 0.0, true).unwrap());
        assert_eq!(
            times(&kept),
            vec![vec![1.0, 4.9], vec![5.1, 9.9], vec![12.0]]
        );
        assert_eq!(kept[2].values(), &[801.0]);

        let dropped = collect(rri.time_split(5.0, 0.0, false).unwrap());
        assert_eq!(times(&dropped), vec![vec![1.0, 4.9], vec![5.1, 9.9]]);
    }

    #[test]
    fn non_terminal_edge_points_open_the_next_window() {
        let rri = RRi::with_time(vec![800.0; 4], vec![0.0, 5.0, 10.0, 15.0]).unwrap();
        let segments = collect(rri.time_split(5.0, 0.0, false).unwrap());
        assert_eq!(
            times(&segments),
            vec![vec![0.0], vec![5.0], vec![10.0, 15.0]]
        );
    }

    #[test]
    fn overlapping_windows_share_points() {
        let time: Vec<f64> = (0..=20).map(f64::from).collect();
        let rri = RRi::with_time(vec![800.0; 21], time).unwrap();
        let segments = collect(rri.time_split(10.0, 5.0, false).unwrap());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].time().first(), Some(&0.0));
        assert_eq!(segments[0].time().last(), Some(&9.0));
        assert_eq!(segments[1].time().first(), Some(&5.0));
        assert_eq!(segments[1].time().last(), Some(&14.0));
        assert_eq!(segments[2].time().first(), Some(&10.0));
        assert_eq!(segments[2].time().last(), Some(&20.0));
    }

    #[test]
    fn only_the_last_overlapping_window_is_trimmed() {
        let time: Vec<f64> = (0..=22).map(f64::from).collect();
        let rri = RRi::with_time(vec![800.0; 23], time).unwrap();
        let segments = collect(rri.time_split(10.0, 5.0, false).unwrap());
        let spans: Vec<(f64, f64)> = segments
            .iter()
            .map(|s| (s.time()[0], *s.time().last().unwrap()))
            .collect();
        assert_eq!(
            spans,
            vec![(0.0, 9.0), (5.0, 14.0), (10.0, 19.0), (15.0, 22.0)]
        );

        let kept = collect(rri.time_split(10.0, 5.0, true).unwrap());
        assert_eq!(kept.len(), 5);
        assert_eq!(kept[4].time(), &[20.0, 21.0, 22.0]);
    }

    #[test]
    fn every_segment_keeps_lengths_aligned() {
        let rri = RRi::new(vec![812.0; 200]).unwrap();
        for segment in collect(rri.time_split(30.0, 10.0, true).unwrap()) {
            assert_eq!(segment.len(), segment.time().len());
            assert!(segment.duration() < 30.0);
        }
    }

    #[test]
    fn empty_window_ends_generation() {
        let rri = RRi::with_time(vec![800.0; 3], vec![1.0, 2.0, 30.0]).unwrap();
        let segments = collect(rri.time_split(5.0, 0.0, true).unwrap());
        assert_eq!(times(&segments), vec![vec![1.0, 2.0]]);

        let late = RRi::with_time(vec![800.0; 2], vec![12.0, 13.0]).unwrap();
        assert!(collect(late.time_split(5.0, 0.0, true).unwrap()).is_empty());
        let reset = late.reset_time().unwrap();
        assert_eq!(collect(reset.time_split(5.0, 0.0, true).unwrap()).len(), 1);
    }

    #[test]
    fn segments_keep_series_kind() {
        let rri = RRi::detrended(vec![-5.0, 3.0, 0.0, 2.0], vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        let segments = collect(rri.time_split(2.0, 0.0, true).unwrap());
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(RRi::is_detrended));
    }

    #[test]
    fn invalid_segments_surface_validation_errors() {
        let shifted = &RRi::with_time(vec![800.0, 900.0], vec![0.0, 1.0]).unwrap() - 850.0;
        let first = shifted.time_split(5.0, 0.0, true).unwrap().next();
        assert_eq!(first, Some(Err(RRiError::InvalidSeries)));
    }

    #[test]
    fn rejects_bad_options() {
        let rri = RRi::new(vec![800.0; 4]).unwrap();
        assert!(rri.time_split(0.0, 0.0, false).is_err());
        assert!(rri.time_split(5.0, 5.0, false).is_err());
        assert!(rri.time_split(5.0, -1.0, false).is_err());
    }

    #[test]
    fn drained_iterator_stays_empty() {
        let rri = RRi::with_time(vec![800.0; 2], vec![0.0, 1.0]).unwrap();
        let mut split = rri.time_split(5.0, 0.0, true).unwrap();
        assert!(split.next().is_some());
        assert!(split.next().is_none());
        assert!(split.next().is_none());
    }
}
