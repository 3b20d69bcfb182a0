use crate::series::RRi;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse one interval per line, ignoring blank/comment lines.
///
/// Only the first field of a line is read; fields may be separated by
/// whitespace or commas.
pub fn parse_rri_values(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let field = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .next()
            .unwrap_or(trimmed);
        let val: f64 = field
            .parse()
            .with_context(|| format!("line {} is not f64: {}", idx + 1, trimmed))?;
        out.push(val);
    }
    if out.is_empty() {
        anyhow::bail!("no intervals found");
    }
    Ok(out)
}

pub fn parse_rri_text(text: &str) -> Result<RRi> {
    let values = parse_rri_values(text)?;
    Ok(RRi::new(values)?)
}

/// Read a newline-delimited interval file from disk.
pub fn read_from_text(path: &Path) -> Result<RRi> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_rri_text(&text).with_context(|| format!("invalid rri file {}", path.display()))
}
