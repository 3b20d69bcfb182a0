use crate::error::{RRiError, Result};
use crate::series::{to_heart_rate, RRi};
use serde::Serialize;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (divides by `n`).
pub fn var(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64
}

pub fn std(data: &[f64]) -> f64 {
    var(data).sqrt()
}

/// Sample standard deviation (divides by `n - 1`).
pub fn sample_std(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() as f64 - 1.0)).sqrt()
}

pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn max(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn min(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn amplitude(data: &[f64]) -> f64 {
    max(data) - min(data)
}

pub fn rms(data: &[f64]) -> f64 {
    mean(&data.iter().map(|x| x * x).collect::<Vec<_>>()).sqrt()
}

impl RRi {
    pub fn mean(&self) -> f64 {
        mean(self.values())
    }

    pub fn var(&self) -> f64 {
        var(self.values())
    }

    pub fn std(&self) -> f64 {
        std(self.values())
    }

    pub fn median(&self) -> f64 {
        median(self.values())
    }

    pub fn max(&self) -> f64 {
        max(self.values())
    }

    pub fn min(&self) -> f64 {
        min(self.values())
    }

    pub fn amplitude(&self) -> f64 {
        amplitude(self.values())
    }

    pub fn rms(&self) -> f64 {
        rms(self.values())
    }

    pub fn describe(&self) -> Description {
        describe(self)
    }

    pub fn info(&self) -> SeriesInfo {
        info(self)
    }
}

/// Statistics reported by [`describe`], in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Min,
    Max,
    Mean,
    Var,
    Std,
    Median,
    Amplitude,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Statistic::Min,
        Statistic::Max,
        Statistic::Mean,
        Statistic::Var,
        Statistic::Std,
        Statistic::Median,
        Statistic::Amplitude,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Mean => "mean",
            Statistic::Var => "var",
            Statistic::Std => "std",
            Statistic::Median => "median",
            Statistic::Amplitude => "amplitude",
        }
    }

    pub fn compute(&self, data: &[f64]) -> f64 {
        match self {
            Statistic::Min => min(data),
            Statistic::Max => max(data),
            Statistic::Mean => mean(data),
            Statistic::Var => var(data),
            Statistic::Std => std(data),
            Statistic::Median => median(data),
            Statistic::Amplitude => amplitude(data),
        }
    }
}

impl FromStr for Statistic {
    type Err = RRiError;

    fn from_str(s: &str) -> Result<Self> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| RRiError::UnknownStatistic(s.to_string()))
    }
}

/// One statistic over the intervals and over the heart rate they imply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescribeRow {
    pub rri: f64,
    pub hr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    rows: Vec<(Statistic, DescribeRow)>,
}

impl Description {
    pub fn get(&self, name: &str) -> Option<&DescribeRow> {
        let stat = name.parse::<Statistic>().ok()?;
        self.row(stat)
    }

    pub fn row(&self, stat: Statistic) -> Option<&DescribeRow> {
        self.rows.iter().find(|(s, _)| *s == stat).map(|(_, row)| row)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DescribeRow)> + '_ {
        self.rows.iter().map(|(s, row)| (s.as_str(), row))
    }
}

/// # Panics
///
/// Panics if `name` is not one of the described statistics; use
/// [`Description::get`] for a fallible lookup.
impl Index<&str> for Description {
    type Output = DescribeRow;

    fn index(&self, name: &str) -> &DescribeRow {
        match self.get(name) {
            Some(row) => row,
            None => panic!("no statistic named '{name}'"),
        }
    }
}

impl Serialize for Description {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (stat, row) in &self.rows {
            map.serialize_entry(stat.as_str(), row)?;
        }
        map.end()
    }
}

const RULE: &str = "----------------------------------------";

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "{:<10}{:>12}{:>12}", "", "rri", "hr")?;
        writeln!(f, "{RULE}")?;
        for (stat, row) in &self.rows {
            writeln!(f, "{:<10}{:>12.2}{:>12.2}", stat.as_str(), row.rri, row.hr)?;
        }
        Ok(())
    }
}

/// Heart-rate column holds the statistic of the transformed series, not the
/// transform of the interval statistic.
pub fn describe(rri: &RRi) -> Description {
    let hr = to_heart_rate(rri.values());
    let rows = Statistic::ALL
        .into_iter()
        .map(|stat| {
            (
                stat,
                DescribeRow {
                    rri: stat.compute(rri.values()),
                    hr: stat.compute(&hr),
                },
            )
        })
        .collect();
    Description { rows }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesInfo {
    pub n_points: usize,
    pub duration: f64,
    pub interpolated: bool,
    pub detrended: bool,
    pub memory_kb: f64,
}

pub fn info(rri: &RRi) -> SeriesInfo {
    SeriesInfo {
        n_points: rri.len(),
        duration: rri.duration(),
        interpolated: rri.interpolated(),
        detrended: rri.is_detrended(),
        memory_kb: std::mem::size_of_val(rri.values()) as f64 / 1024.0,
    }
}

fn title_bool(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for SeriesInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N Points: {}\nDuration: {:.2}s\nInterpolated: {}\nDetrended: {}\nMemory Usage: {:.2}Kb",
            self.n_points,
            self.duration,
            title_bool(self.interpolated),
            title_bool(self.detrended),
            self.memory_kb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAKE_RRI: [f64; 4] = [800.0, 810.0, 815.0, 750.0];

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} vs {b}");
    }

    #[test]
    fn statistical_values() {
        let rri = RRi::new(FAKE_RRI.to_vec()).unwrap();
        assert_eq!(rri.mean(), 793.75);
        assert_eq!(rri.var(), 667.1875);
        assert_close(rri.std(), 25.829972899714782, 1e-12);
        assert_eq!(rri.median(), 805.0);
        assert_eq!(rri.max(), 815.0);
        assert_eq!(rri.min(), 750.0);
        assert_eq!(rri.amplitude(), 65.0);
        let expected_rms = (FAKE_RRI.iter().map(|x| x * x).sum::<f64>() / 4.0).sqrt();
        assert_close(rri.rms(), expected_rms, 1e-9);
    }

    #[test]
    fn median_of_odd_length() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn describe_table_values() {
        let descr = RRi::new(FAKE_RRI.to_vec()).unwrap().describe();
        let expected = [
            ("min", 750.0, 73.61963190184049),
            ("max", 815.0, 80.0),
            ("amplitude", 65.0, 6.380368098159508),
            ("mean", 793.75, 75.67342649397864),
            ("median", 805.0, 74.53703703703704),
            ("var", 667.1875, 6.487185483887203),
            ("std", 25.829972899714782, 2.546995383562209),
        ];
        for (name, rri, hr) in expected {
            assert_close(descr[name].rri, rri, 1e-9);
            assert_close(descr[name].hr, hr, 1e-9);
        }
        assert!(descr.get("kurtosis").is_none());
    }

    #[test]
    #[should_panic(expected = "no statistic named 'kurtosis'")]
    fn indexing_unknown_statistic_panics() {
        let descr = RRi::new(FAKE_RRI.to_vec()).unwrap().describe();
        let _ = descr["kurtosis"];
    }

    #[test]
    fn describe_rendering() {
        let rendered = RRi::new(FAKE_RRI.to_vec()).unwrap().describe().to_string();
        let expected = [
            "----------------------------------------\n",
            "                   rri          hr\n",
            "min             750.00       73.62\n",
            "max             815.00       80.00\n",
            "mean            793.75       75.67\n",
            "var             667.19        6.49\n",
            "std              25.83        2.55\n",
            "median          805.00       74.54\n",
            "amplitude        65.00        6.38\n",
        ];
        for row in expected {
            assert!(rendered.contains(row), "missing {row:?} in\n{rendered}");
        }
    }

    #[test]
    fn describe_serializes_as_mapping() {
        let descr = RRi::new(FAKE_RRI.to_vec()).unwrap().describe();
        let value = serde_json::to_value(&descr).unwrap();
        assert_eq!(value["max"]["rri"], 815.0);
        assert_eq!(value["max"]["hr"], 80.0);
    }

    #[test]
    fn info_message() {
        let rri = RRi::new(FAKE_RRI.to_vec()).unwrap();
        assert_eq!(
            rri.info().to_string(),
            "N Points: 4\nDuration: 2.38s\nInterpolated: False\nDetrended: False\nMemory Usage: 0.03Kb"
        );
    }

    #[test]
    fn info_uses_explicit_time() {
        let rri = RRi::with_time(FAKE_RRI.to_vec(), vec![2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(
            rri.info().to_string(),
            "N Points: 4\nDuration: 3.00s\nInterpolated: False\nDetrended: False\nMemory Usage: 0.03Kb"
        );
    }
}
