use crate::error::{RRiError, Result};
use crate::series::RRi;
use crate::stats::{mean, sample_std};
use serde::Serialize;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

/// Scatter of each interval against the next one, with the SD1/SD2 ellipse
/// that summarizes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoincareSummary {
    /// `values[..n - 1]`
    pub x: Vec<f64>,
    /// `values[1..]`
    pub y: Vec<f64>,
    /// Short-term variability, perpendicular to the identity line.
    pub sd1: f64,
    /// Long-term variability, along the identity line.
    pub sd2: f64,
    pub center: [f64; 2],
    /// Ellipse rotation (radians).
    pub angle: f64,
    pub sd1_axis: [[f64; 2]; 2],
    pub sd2_axis: [[f64; 2]; 2],
}

pub fn poincare(rri: &RRi) -> Result<PoincareSummary> {
    let n = rri.len();
    if n < 3 {
        return Err(RRiError::NotEnoughPoints(n));
    }
    let values = rri.values();
    let x = values[..n - 1].to_vec();
    let y = values[1..].to_vec();
    let sd1 = sample_std(&rri.successive_differences()) * FRAC_1_SQRT_2;
    let sdnn = sample_std(values);
    let sd2 = (2.0 * sdnn * sdnn - sd1 * sd1).max(0.0).sqrt();
    let c = mean(&x);
    let center = [c, c];
    let along = [FRAC_1_SQRT_2, FRAC_1_SQRT_2];
    let across = [-FRAC_1_SQRT_2, FRAC_1_SQRT_2];
    Ok(PoincareSummary {
        x,
        y,
        sd1,
        sd2,
        center,
        angle: FRAC_PI_4,
        sd1_axis: axis(center, across, sd1),
        sd2_axis: axis(center, along, sd2),
    })
}

fn axis(center: [f64; 2], dir: [f64; 2], length: f64) -> [[f64; 2]; 2] {
    [
        [center[0] - dir[0] * length, center[1] - dir[1] * length],
        [center[0] + dir[0] * length, center[1] + dir[1] * length],
    ]
}

impl RRi {
    pub fn poincare(&self) -> Result<PoincareSummary> {
        poincare(self)
    }
}
