//! Backend-agnostic figure models for interval series. Drawing lives with
//! the caller (the CLI renders these through plotters).

use crate::error::Result;
use crate::series::RRi;
use crate::stats::{max, min};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub dash: Option<[f32; 2]>,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub size: u32,
    pub color: Color,
}

/// Histogram bars as `[left, right, count]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub bins: Vec<[f64; 3]>,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
    Scatter(ScatterSeries),
    Bars(BarSeries),
}

impl Series {
    /// Every `[x, y]` corner the series needs to fit on the chart.
    pub fn extent_points(&self) -> Vec<[f64; 2]> {
        match self {
            Series::Line(line) => line.points.clone(),
            Series::Scatter(scatter) => scatter.points.clone(),
            Series::Bars(bars) => bars
                .bins
                .iter()
                .flat_map(|b| [[b[0], 0.0], [b[1], b[2]]])
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            series: Vec::new(),
        }
    }

    pub fn labels(mut self, x: &str, y: &str) -> Self {
        self.x.label = Some(x.into());
        self.y.label = Some(y.into());
        self
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    /// `(x_min, x_max, y_min, y_max)` over all series.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let points: Vec<[f64; 2]> = self.series.iter().flat_map(Series::extent_points).collect();
        if points.is_empty() {
            return None;
        }
        let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
        Some((min(&xs), max(&xs), min(&ys), max(&ys)))
    }
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

/// Interval against time.
pub fn figure_from_rri_limit(rri: &RRi, max_points: usize) -> Figure {
    let mut fig = Figure::new(Some("RRi".into())).labels("Time (s)", "RRi (ms)");
    let points: Vec<[f64; 2]> = rri
        .time()
        .iter()
        .zip(rri.values())
        .map(|(&t, &v)| [t, v])
        .collect();
    fig.add_series(Series::Line(LineSeries {
        name: "RRi".into(),
        points: decimate_points(&points, max_points),
        style: Style {
            width: 2.0,
            dash: None,
            color: Color(0xFF0077),
        },
    }));
    fig
}

pub fn figure_from_rri(rri: &RRi) -> Figure {
    figure_from_rri_limit(rri, 1024)
}

/// Equal-width bins spanning `[min, max]`.
pub fn histogram_bins(values: &[f64], n_bins: usize) -> Vec<[f64; 3]> {
    if values.is_empty() || n_bins == 0 {
        return Vec::new();
    }
    let lo = min(values);
    let hi = max(values);
    if hi == lo {
        return vec![[lo - 0.5, hi + 0.5, values.len() as f64]];
    }
    let width = (hi - lo) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            let left = lo + i as f64 * width;
            [left, left + width, c as f64]
        })
        .collect()
}

pub fn histogram(rri: &RRi, n_bins: usize) -> Figure {
    let mut fig = Figure::new(Some("RRi histogram".into())).labels("RRi (ms)", "Count");
    fig.add_series(Series::Bars(BarSeries {
        name: "RRi".into(),
        bins: histogram_bins(rri.values(), n_bins),
        color: Color(0x1F77B4),
    }));
    fig
}

/// Scatter of consecutive intervals plus the SD1/SD2 axes.
pub fn poincare_figure(rri: &RRi) -> Result<Figure> {
    let summary = rri.poincare()?;
    let mut fig = Figure::new(Some("Poincaré Plot".into())).labels("RRi_n (ms)", "RRi_n+1 (ms)");
    fig.add_series(Series::Scatter(ScatterSeries {
        name: "RRi".into(),
        points: summary
            .x
            .iter()
            .zip(&summary.y)
            .map(|(&x, &y)| [x, y])
            .collect(),
        size: 2,
        color: Color(0x000000),
    }));
    fig.add_series(Series::Line(LineSeries {
        name: format!("SD1: {:.2}ms", summary.sd1),
        points: summary.sd1_axis.to_vec(),
        style: Style {
            width: 1.5,
            dash: Some([4.0, 4.0]),
            color: Color(0x1F77B4),
        },
    }));
    fig.add_series(Series::Line(LineSeries {
        name: format!("SD2: {:.2}ms", summary.sd2),
        points: summary.sd2_axis.to_vec(),
        style: Style {
            width: 1.5,
            dash: Some([4.0, 4.0]),
            color: Color(0x000000),
        },
    }));
    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimation_caps_point_count() {
        let points: Vec<[f64; 2]> = (0..5000).map(|i| [i as f64, 1.0]).collect();
        assert_eq!(decimate_points(&points, 1024).len(), 1024);
        assert_eq!(decimate_points(&points[..10], 1024).len(), 10);
    }

    #[test]
    fn line_figure_follows_time_axis() {
        let rri = RRi::with_time(vec![800.0, 810.0], vec![4.0, 5.0]).unwrap();
        let fig = figure_from_rri(&rri);
        match &fig.series[0] {
            Series::Line(line) => assert_eq!(line.points, vec![[4.0, 800.0], [5.0, 810.0]]),
            other => panic!("unexpected series {other:?}"),
        }
        assert_eq!(fig.bounds(), Some((4.0, 5.0, 800.0, 810.0)));
    }

    #[test]
    fn histogram_counts_every_value() {
        let bins = histogram_bins(&[800.0, 810.0, 815.0, 750.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b[2]).sum::<f64>(), 4.0);
        assert_eq!(bins[3][2], 3.0);
        assert_eq!(histogram_bins(&[800.0, 800.0], 4), vec![[799.5, 800.5, 2.0]]);
    }

    #[test]
    fn poincare_figure_has_scatter_and_axes() {
        let rri = RRi::new(vec![800.0, 810.0, 815.0, 750.0]).unwrap();
        let fig = poincare_figure(&rri).unwrap();
        assert_eq!(fig.series.len(), 3);
        match &fig.series[1] {
            Series::Line(line) => assert_eq!(line.name, "SD1: 29.65ms"),
            other => panic!("unexpected series {other:?}"),
        }
    }
}
