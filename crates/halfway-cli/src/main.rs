use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use halfway_lib::{
    config::{read_config, ModelConfig},
    io::{csv::write_series_csv, table::series_rows},
    model::{run_pipeline, PipelineRun, Summation},
    plot::{
        dash_segments, figure_from_cumulative, figure_from_midpoint, Figure, PlotBackend, Series,
    },
};
use log::info;
use plotters::prelude::*;
use std::{
    io,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "halfway",
    version,
    about = "Perceived-time model: find the age at which half of lived experience has accrued"
)]
struct Cli {
    /// Logging verbosity when RUST_LOG is unset (e.g., debug, info, warn)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// TOML file with model settings; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SummationArg {
    Naive,
    Compensated,
}

impl From<SummationArg> for Summation {
    fn from(arg: SummationArg) -> Self {
        match arg {
            SummationArg::Naive => Summation::Naive,
            SummationArg::Compensated => Summation::Compensated,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SeriesFormat {
    Csv,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PlotKind {
    /// Perceived value of a year (1/age) with the midpoint marked
    Value,
    /// Running total of perceived value with the midpoint marked
    Cumulative,
}

/// Overrides shared by the single-run commands.
#[derive(Args, Clone)]
struct RunArgs {
    /// Last age on the axis (years)
    #[arg(long)]
    max_age: Option<u32>,
    /// Samples per year (1 = annual, 12 = monthly)
    #[arg(long)]
    resolution: Option<u32>,
    #[arg(long)]
    summation: Option<SummationArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the perceptual midpoint for one resolution
    Midpoint {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Compare midpoints across resolutions against sqrt(max_age)
    Compare {
        #[arg(long)]
        max_age: Option<u32>,
        /// Comma-separated samples-per-year values, e.g. 1,12,52,365
        #[arg(long, value_delimiter = ',')]
        resolutions: Vec<u32>,
        /// Error at or below which a stalled resolution still counts as converged
        #[arg(long)]
        tolerance: Option<f64>,
        #[arg(long)]
        summation: Option<SummationArg>,
    },
    /// Emit the per-sample age, weight and running total
    Series {
        #[command(flatten)]
        run: RunArgs,
        #[arg(long, default_value = "csv")]
        format: SeriesFormat,
    },
    /// Render the model to an SVG via plotters
    Plot {
        #[command(flatten)]
        run: RunArgs,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "value")]
        kind: PlotKind,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 480)]
        height: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level.as_str())).init();
    let base = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Midpoint { run } => cmd_midpoint(base, &run)?,
        Commands::Compare {
            max_age,
            resolutions,
            tolerance,
            summation,
        } => cmd_compare(base, max_age, resolutions, tolerance, summation)?,
        Commands::Series { run, format } => cmd_series(base, &run, format)?,
        Commands::Plot {
            run,
            out,
            kind,
            width,
            height,
        } => cmd_plot(base, &run, &out, kind, (width, height))?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ModelConfig> {
    match path {
        Some(path) => {
            info!("loading model config from {}", path.display());
            read_config(path)
        }
        None => Ok(ModelConfig::default()),
    }
}

fn apply_run_args(mut config: ModelConfig, args: &RunArgs) -> ModelConfig {
    if let Some(max_age) = args.max_age {
        config.max_age = max_age;
    }
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(summation) = args.summation {
        config.summation = summation.into();
    }
    config
}

fn run_model(base: ModelConfig, args: &RunArgs) -> Result<PipelineRun> {
    let config = apply_run_args(base, args);
    config.validate()?;
    let run = run_pipeline(&config.pipeline()).with_context(|| {
        format!(
            "computing midpoint for max_age={} resolution={}",
            config.max_age, config.resolution
        )
    })?;
    Ok(run)
}

fn cmd_midpoint(base: ModelConfig, args: &RunArgs) -> Result<()> {
    let run = run_model(base, args)?;
    println!("{}", serde_json::to_string(&run.summary())?);
    Ok(())
}

fn cmd_compare(
    mut config: ModelConfig,
    max_age: Option<u32>,
    resolutions: Vec<u32>,
    tolerance: Option<f64>,
    summation: Option<SummationArg>,
) -> Result<()> {
    if let Some(max_age) = max_age {
        config.max_age = max_age;
    }
    if !resolutions.is_empty() {
        config.resolutions = resolutions;
    }
    if let Some(tolerance) = tolerance {
        config.tolerance = tolerance;
    }
    if let Some(summation) = summation {
        config.summation = summation.into();
    }
    config.validate_max_age()?;
    let report = config
        .comparator()
        .compare(config.max_age, &config.resolutions);
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

fn cmd_series(base: ModelConfig, args: &RunArgs, format: SeriesFormat) -> Result<()> {
    let run = run_model(base, args)?;
    let rows = series_rows(&run.weighted, &run.cumulative);
    match format {
        SeriesFormat::Csv => write_series_csv(io::stdout().lock(), &rows)?,
        SeriesFormat::Json => println!("{}", serde_json::to_string(&rows)?),
    }
    Ok(())
}

fn cmd_plot(
    base: ModelConfig,
    args: &RunArgs,
    out: &Path,
    kind: PlotKind,
    size: (u32, u32),
) -> Result<()> {
    let run = run_model(base, args)?;
    let fig = match kind {
        PlotKind::Value => figure_from_midpoint(run.config.max_age, &run.midpoint),
        PlotKind::Cumulative => figure_from_cumulative(&run.cumulative, &run.midpoint, 2048),
    };
    let mut backend = SvgFigure { path: out, size };
    backend
        .draw(&fig)
        .with_context(|| format!("rendering plot to {}", out.display()))?;
    info!("plot written to {}", out.display());
    Ok(())
}

struct SvgFigure<'a> {
    path: &'a Path,
    size: (u32, u32),
}

impl PlotBackend for SvgFigure<'_> {
    fn draw(&mut self, fig: &Figure) -> Result<()> {
        let (x_min, x_max, y_min, y_max) = fig
            .bounds()
            .ok_or_else(|| anyhow!("figure has no finite points"))?;
        let (x_min, x_max) = padded(x_min, x_max);
        let (y_min, y_max) = padded(y_min, y_max);

        let root = SVGBackend::new(self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(
                fig.title.clone().unwrap_or_else(|| "Plot".into()),
                ("sans-serif", 24),
            )
            .x_label_area_size(40)
            .y_label_area_size(60)
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
            let (name, style) = match series {
                Series::Line(line) => (line.name.clone(), &line.style),
                Series::VLine(marker) => (marker.name.clone(), &marker.style),
            };
            let (r, g, b) = style.color.rgb();
            let shape = RGBColor(r, g, b).stroke_width(style.width.round().max(1.0) as u32);
            let anno = match series {
                Series::Line(line) => chart.draw_series(LineSeries::new(
                    line.points.iter().map(|p| (p[0], p[1])),
                    shape,
                ))?,
                Series::VLine(marker) => {
                    let segments = match marker.style.dash {
                        Some([on, off]) => {
                            let (_, height) = chart.plotting_area().dim_in_pixel();
                            let per_px = (y_max - y_min) / height.max(1) as f64;
                            dash_segments(y_min, y_max, on as f64 * per_px, off as f64 * per_px)
                        }
                        None => vec![(y_min, y_max)],
                    };
                    let x = marker.x;
                    chart.draw_series(
                        segments
                            .into_iter()
                            .map(move |(from, to)| PathElement::new(vec![(x, from), (x, to)], shape)),
                    )?
                }
            };
            anno.label(name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], shape));
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()?;
        Ok(())
    }
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        let pad = (hi - lo) * 0.02;
        (lo - pad, hi + pad)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}
