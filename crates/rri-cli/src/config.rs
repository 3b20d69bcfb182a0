use anyhow::{Context, Result};
use rri_lib::SplitOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Defaults read from `--config`; command-line flags win over these.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct CliConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub split: Option<SplitOptions>,
    #[serde(default)]
    pub plot: PlotConfig,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default)]
    pub interpolated: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlotConfig {
    #[serde(default = "default_bins")]
    pub bins: usize,
    #[serde(default = "default_size")]
    pub size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            size: default_size(),
        }
    }
}

fn default_bins() -> usize {
    30
}

fn default_size() -> (u32, u32) {
    (800, 480)
}

pub fn read_config(path: &Path) -> Result<CliConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: CliConfig =
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    if let Some(split) = &config.split {
        split
            .validate()
            .with_context(|| format!("[split] in {}", path.display()))?;
    }
    Ok(config)
}

/// Resolve split options from flags on top of the config file.
pub fn merge_split(
    config: Option<SplitOptions>,
    seg_size: Option<f64>,
    overlap: Option<f64>,
    keep_last: bool,
) -> Result<SplitOptions> {
    let base = match (config, seg_size) {
        (_, Some(seg_size)) => SplitOptions {
            seg_size,
            ..config.unwrap_or_else(|| SplitOptions::new(seg_size))
        },
        (Some(config), None) => config,
        (None, None) => anyhow::bail!("--seg-size is required when the config has no [split]"),
    };
    Ok(SplitOptions {
        overlap: overlap.unwrap_or(base.overlap),
        keep_last: keep_last || base.keep_last,
        ..base
    })
}
