//! Polar `.hrm` exports.
//!
//! Intervals (ms) are the first column of the `[HRData]` section.

use crate::series::RRi;
use anyhow::{Context, Result};
use std::path::Path;

const HR_DATA: &str = "[HRData]";

pub fn parse_hrm_values(text: &str) -> Result<Vec<f64>> {
    let mut lines = text.lines().enumerate();
    lines
        .by_ref()
        .find(|(_, line)| line.trim() == HR_DATA)
        .ok_or_else(|| anyhow::anyhow!("missing {HR_DATA} section"))?;
    let mut out = Vec::new();
    for (idx, line) in lines {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            break;
        }
        let Some(field) = trimmed.split_whitespace().next() else {
            continue;
        };
        let val: f64 = field
            .parse()
            .with_context(|| format!("line {} is not an interval: {}", idx + 1, trimmed))?;
        out.push(val);
    }
    if out.is_empty() {
        anyhow::bail!("{HR_DATA} section holds no intervals");
    }
    Ok(out)
}

pub fn parse_hrm(text: &str) -> Result<RRi> {
    Ok(RRi::new(parse_hrm_values(text)?)?)
}

pub fn read_from_hrm(path: &Path) -> Result<RRi> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_hrm(&text).with_context(|| format!("invalid hrm file {}", path.display()))
}
