use crate::error::{RRiError, Result};
use crate::validate::{build_time_axis, check_positive, validate_series, validate_time};
use log::debug;
use serde::Serialize;
use std::fmt;
use std::ops::{Bound, Index, RangeBounds};
use std::str::FromStr;

/// Whether the intervals are raw beat-to-beat durations or detrended residuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    #[default]
    Raw,
    Detrended,
}

/// Successive heartbeat intervals (milliseconds) with the time (seconds) at
/// which each interval ends.
///
/// Fields are private: the only way to change a series after construction is
/// [`RRi::reset_time_in_place`]. Every other transform returns a new series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RRi {
    values: Vec<f64>,
    time: Vec<f64>,
    interpolated: bool,
    kind: SeriesKind,
}

/// Collects construction options before the validated build.
#[derive(Debug, Clone)]
pub struct RRiBuilder {
    values: Vec<f64>,
    time: Option<Vec<f64>>,
    interpolated: bool,
    kind: SeriesKind,
}

impl RRiBuilder {
    pub fn time(mut self, time: Vec<f64>) -> Self {
        self.time = Some(time);
        self
    }

    /// Gap filling happens upstream; this only records that it did.
    pub fn interpolated(mut self, interpolated: bool) -> Self {
        self.interpolated = interpolated;
        self
    }

    /// Pin the series as detrended. Residual values may be zero or negative,
    /// so they skip normalization and the positivity check.
    pub fn detrended(mut self) -> Self {
        self.kind = SeriesKind::Detrended;
        self
    }

    pub fn build(self) -> Result<RRi> {
        let values = match self.kind {
            SeriesKind::Raw => validate_series(self.values)?,
            SeriesKind::Detrended => {
                if self.values.is_empty() {
                    return Err(RRiError::EmptySeries);
                }
                self.values
            }
        };
        let time = match self.time {
            Some(time) => validate_time(&values, time)?,
            None => {
                debug!("deriving time axis for {} intervals", values.len());
                // residuals of a detrended series can make this axis invalid
                validate_time(&values, build_time_axis(&values))?
            }
        };
        Ok(RRi {
            values,
            time,
            interpolated: self.interpolated,
            kind: self.kind,
        })
    }
}

/// Named attributes reachable through [`RRi::field`] and [`RRi::set_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Values,
    Time,
    Interpolated,
    Detrended,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Values => "values",
            Field::Time => "time",
            Field::Interpolated => "interpolated",
            Field::Detrended => "detrended",
        }
    }
}

impl FromStr for Field {
    type Err = RRiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "values" | "rri" => Ok(Field::Values),
            "time" => Ok(Field::Time),
            "interpolated" => Ok(Field::Interpolated),
            "detrended" => Ok(Field::Detrended),
            other => Err(RRiError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Samples(&'a [f64]),
    Flag(bool),
}

impl RRi {
    pub fn builder(values: Vec<f64>) -> RRiBuilder {
        RRiBuilder {
            values,
            time: None,
            interpolated: false,
            kind: SeriesKind::Raw,
        }
    }

    /// Series with a time axis derived from the intervals.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        Self::builder(values).build()
    }

    pub fn with_time(values: Vec<f64>, time: Vec<f64>) -> Result<Self> {
        Self::builder(values).time(time).build()
    }

    pub fn detrended(values: Vec<f64>, time: Vec<f64>) -> Result<Self> {
        Self::builder(values).time(time).detrended().build()
    }

    /// Re-check a derived selection without re-normalizing units.
    pub(crate) fn from_parts(&self, values: Vec<f64>, time: Vec<f64>) -> Result<Self> {
        match self.kind {
            SeriesKind::Raw => check_positive(&values)?,
            SeriesKind::Detrended if values.is_empty() => return Err(RRiError::EmptySeries),
            SeriesKind::Detrended => {}
        }
        let time = validate_time(&values, time)?;
        Ok(Self {
            values,
            time,
            interpolated: self.interpolated,
            kind: self.kind,
        })
    }

    /// Arithmetic results keep the receiver's time axis and skip validation.
    pub(crate) fn with_values_unchecked(&self, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.time.len());
        Self {
            values,
            time: self.time.clone(),
            interpolated: self.interpolated,
            kind: self.kind,
        }
    }

    /// Record upstream gap filling on an already validated series.
    pub fn with_interpolated(mut self, interpolated: bool) -> Self {
        self.interpolated = interpolated;
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn interpolated(&self) -> bool {
        self.interpolated
    }

    pub fn is_detrended(&self) -> bool {
        self.kind == SeriesKind::Detrended
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seconds between the first and last timestamp.
    pub fn duration(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn field(&self, name: &str) -> Result<FieldRef<'_>> {
        Ok(match name.parse::<Field>()? {
            Field::Values => FieldRef::Samples(&self.values),
            Field::Time => FieldRef::Samples(&self.time),
            Field::Interpolated => FieldRef::Flag(self.interpolated),
            Field::Detrended => FieldRef::Flag(self.is_detrended()),
        })
    }

    /// String-keyed assignment always fails: a constructed series is read-only.
    pub fn set_field(&mut self, name: &str, _value: Vec<f64>) -> Result<()> {
        let field = name.parse::<Field>()?;
        Err(RRiError::ImmutabilityViolation {
            field: field.as_str().to_string(),
        })
    }

    /// Positional sub-series; bounds past the end are clamped.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Result<Self> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .clamp(start, len);
        self.from_parts(
            self.values[start..end].to_vec(),
            self.time[start..end].to_vec(),
        )
    }

    /// Keep the points whose mask entry is `true`.
    pub fn mask(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.len() {
            return Err(RRiError::LengthMismatch);
        }
        let (values, time): (Vec<f64>, Vec<f64>) = self
            .values
            .iter()
            .zip(&self.time)
            .zip(keep)
            .filter(|&(_, &k)| k)
            .map(|((&v, &t), _)| (v, t))
            .unzip();
        self.from_parts(values, time)
    }

    /// Points whose timestamp lies in `[start, end]`.
    pub fn time_range(&self, start: f64, end: f64) -> Result<Self> {
        let keep: Vec<bool> = self.time.iter().map(|&t| t >= start && t <= end).collect();
        self.mask(&keep)
    }

    /// Copy of the series with the time axis shifted to start at zero.
    pub fn reset_time(&self) -> Result<Self> {
        let offset = self.time.first().copied().unwrap_or(0.0);
        let time = self.time.iter().map(|t| t - offset).collect();
        self.from_parts(self.values.clone(), time)
    }

    /// Shift this series' own time axis to start at zero.
    ///
    /// This is the single in-place mutation a series allows. Relative offsets
    /// are preserved, so the time invariants still hold afterwards.
    pub fn reset_time_in_place(&mut self) -> &mut Self {
        if let Some(&offset) = self.time.first() {
            for t in &mut self.time {
                *t -= offset;
            }
        }
        self
    }

    /// Instantaneous heart rate in beats per minute.
    pub fn to_heart_rate(&self) -> Vec<f64> {
        to_heart_rate(&self.values)
    }

    /// `values[i + 1] - values[i]` for every adjacent pair.
    pub fn successive_differences(&self) -> Vec<f64> {
        self.values.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }
}

pub fn to_heart_rate(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| 60_000.0 / v).collect()
}

impl Index<usize> for RRi {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl AsRef<[f64]> for RRi {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl<'a> IntoIterator for &'a RRi {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

const SUMMARY_THRESHOLD: usize = 1000;
const SUMMARY_EDGE: usize = 3;

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.0}.")
    } else {
        format!("{v}")
    }
}

impl fmt::Display for RRi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = if self.len() > SUMMARY_THRESHOLD {
            let head = self.values[..SUMMARY_EDGE].iter().map(|&v| format_value(v));
            let tail = self.values[self.len() - SUMMARY_EDGE..]
                .iter()
                .map(|&v| format_value(v));
            head.chain(std::iter::once("...".to_string()))
                .chain(tail)
                .collect()
        } else {
            self.values.iter().map(|&v| format_value(v)).collect()
        };
        write!(f, "RRi array([{}])", parts.join(", "))
    }
}
