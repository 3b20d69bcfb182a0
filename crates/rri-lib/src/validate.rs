//! Construction-time checks for interval sequences and their time axes.

use crate::error::{RRiError, Result, TimeAxisViolation};
use log::warn;

/// Largest magnitude still read as seconds rather than milliseconds.
pub const SECONDS_THRESHOLD: f64 = 10.0;

/// Normalize intervals to milliseconds and reject non-positive values.
///
/// A sequence whose largest magnitude is at most [`SECONDS_THRESHOLD`] is
/// assumed to be expressed in seconds and is scaled by 1000.
pub fn validate_series(values: Vec<f64>) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(RRiError::EmptySeries);
    }
    let peak = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let values = if peak <= SECONDS_THRESHOLD {
        warn!("interval magnitudes <= {SECONDS_THRESHOLD}, reading them as seconds");
        values.into_iter().map(|v| v * 1000.0).collect()
    } else {
        values
    };
    check_positive(&values)?;
    Ok(values)
}

/// Positivity check for values that are already in milliseconds.
pub fn check_positive(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(RRiError::EmptySeries);
    }
    if values.iter().any(|v| v.is_nan() || *v <= 0.0) {
        return Err(RRiError::InvalidSeries);
    }
    Ok(())
}

/// Check an explicit time axis against its interval sequence.
pub fn validate_time(values: &[f64], time: Vec<f64>) -> Result<Vec<f64>> {
    if values.len() != time.len() {
        return Err(RRiError::LengthMismatch);
    }
    // written so that NaN fails each check
    if time.iter().any(|t| !(*t >= 0.0)) {
        return Err(RRiError::InvalidTimeAxis(TimeAxisViolation::Negative));
    }
    if time.iter().skip(1).any(|t| *t == 0.0) {
        return Err(RRiError::InvalidTimeAxis(
            TimeAxisViolation::ZeroAfterStart,
        ));
    }
    if time.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(RRiError::InvalidTimeAxis(TimeAxisViolation::NotIncreasing));
    }
    Ok(time)
}

/// Elapsed seconds of each beat since the first one.
pub fn build_time_axis(values: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    let mut time: Vec<f64> = values
        .iter()
        .map(|v| {
            acc += v;
            acc / 1000.0
        })
        .collect();
    if let Some(&first) = time.first() {
        for t in &mut time {
            *t -= first;
        }
    }
    time
}
