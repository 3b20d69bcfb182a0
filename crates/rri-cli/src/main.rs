mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{merge_split, read_config, CliConfig};
use log::info;
use plotters::prelude::*;
use rri_lib::{
    io::{read_rri, text as text_io},
    plot::{figure_from_rri, histogram, poincare_figure, Figure, Series},
    RRi,
};
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "rri",
    version,
    about = "RRi: inspect and segment heartbeat interval series"
)]
struct Cli {
    /// Interval file (`.hrm` or newline-delimited text); stdin when omitted
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// TOML file with defaults for input, split and plot
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Mark the series as gap-filled upstream
    #[arg(long, global = true)]
    interpolated: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PlotKind {
    Line,
    Hist,
    Poincare,
}

#[derive(Subcommand)]
enum Commands {
    /// Descriptive statistics of intervals and heart rate
    Describe {
        /// Print the fixed-width table instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Point count, duration, flags and memory footprint
    Info,
    /// Cut the series into fixed-duration windows (JSON array)
    Split {
        #[arg(long)]
        seg_size: Option<f64>,
        #[arg(long)]
        overlap: Option<f64>,
        #[arg(long)]
        keep_last: bool,
    },
    /// Keep the points whose time lies in [start, end]
    TimeRange {
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
        /// Shift the result so it starts at time zero
        #[arg(long)]
        reset: bool,
    },
    /// Instantaneous heart rate (bpm)
    Hr,
    /// SD1/SD2 summary of consecutive intervals
    Poincare,
    /// Render the series to a PNG via plotters
    Plot {
        #[arg(long, value_enum, default_value = "line")]
        kind: PlotKind,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        bins: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => read_config(path)?,
        None => CliConfig::default(),
    };
    let rri = load_rri(
        cli.input.as_deref(),
        cli.interpolated || config.input.interpolated,
    )?;
    info!("loaded {} intervals", rri.len());
    match cli.command {
        Commands::Describe { text } => cmd_describe(&rri, text)?,
        Commands::Info => println!("{}", rri.info()),
        Commands::Split {
            seg_size,
            overlap,
            keep_last,
        } => cmd_split(&rri, &config, seg_size, overlap, keep_last)?,
        Commands::TimeRange { start, end, reset } => cmd_time_range(&rri, start, end, reset)?,
        Commands::Hr => println!("{}", serde_json::to_string(&rri.to_heart_rate())?),
        Commands::Poincare => println!("{}", serde_json::to_string(&rri.poincare()?)?),
        Commands::Plot { kind, out, bins } => {
            let fig = match kind {
                PlotKind::Line => figure_from_rri(&rri),
                PlotKind::Hist => histogram(&rri, bins.unwrap_or(config.plot.bins)),
                PlotKind::Poincare => poincare_figure(&rri)?,
            };
            draw_plotters_figure(&out, &fig, config.plot.size)?;
        }
    }
    Ok(())
}

fn load_rri(input: Option<&Path>, interpolated: bool) -> Result<RRi> {
    let rri = match input {
        Some(path) => read_rri(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_rri_text(&buf)?
        }
    };
    Ok(rri.with_interpolated(interpolated))
}

fn cmd_describe(rri: &RRi, text: bool) -> Result<()> {
    let description = rri.describe();
    if text {
        print!("{}", description);
    } else {
        println!("{}", serde_json::to_string(&description)?);
    }
    Ok(())
}

fn cmd_split(
    rri: &RRi,
    config: &CliConfig,
    seg_size: Option<f64>,
    overlap: Option<f64>,
    keep_last: bool,
) -> Result<()> {
    let options = merge_split(config.split, seg_size, overlap, keep_last)?;
    let segments = rri
        .split_with(options)?
        .collect::<rri_lib::Result<Vec<_>>>()
        .context("building segments")?;
    info!("produced {} segments", segments.len());
    println!("{}", serde_json::to_string(&segments)?);
    Ok(())
}

fn cmd_time_range(rri: &RRi, start: f64, end: f64, reset: bool) -> Result<()> {
    let mut window = rri
        .time_range(start, end)
        .with_context(|| format!("selecting [{start}, {end}]"))?;
    if reset {
        window.reset_time_in_place();
    }
    println!("{}", serde_json::to_string(&window)?);
    Ok(())
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn draw_plotters_figure(path: &Path, fig: &Figure, size: (u32, u32)) -> Result<()> {
    let backend = BitMapBackend::new(path, size);
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let (x_min, x_max, y_min, y_max) = fig.bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
    let (x_min, x_max) = padded(x_min, x_max);
    let (y_min, y_max) = padded(y_min, y_max);
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            fig.title.clone().unwrap_or_else(|| "Plot".into()),
            ("sans-serif", 24),
        )
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    let mut mesh = chart.configure_mesh();
    if let Some(label) = &fig.x.label {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &fig.y.label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw()?;
    for series in &fig.series {
        match series {
            Series::Line(line) => {
                let (r, g, b) = line.style.color.rgb();
                chart.draw_series(LineSeries::new(
                    line.points.iter().map(|p| (p[0], p[1])),
                    RGBColor(r, g, b).stroke_width(line.style.width.round() as u32),
                ))?;
            }
            Series::Scatter(scatter) => {
                let (r, g, b) = scatter.color.rgb();
                let color = RGBColor(r, g, b);
                chart.draw_series(
                    scatter
                        .points
                        .iter()
                        .map(|p| Circle::new((p[0], p[1]), scatter.size, color.filled())),
                )?;
            }
            Series::Bars(bars) => {
                let (r, g, b) = bars.color.rgb();
                let color = RGBColor(r, g, b);
                chart.draw_series(
                    bars.bins
                        .iter()
                        .map(|bin| Rectangle::new([(bin[0], 0.0), (bin[1], bin[2])], color.filled())),
                )?;
            }
        }
    }
    root.present()?;
    Ok(())
}
