mod tui;

use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use tracing::metadata::LevelFilter;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use triplens_common::Config;
use triplens_core::{
    export_histogram_csv, export_histogram_json, hist_hover, load_trips, print_summary, random_walk_plot,
    render_all, start_location_plot, summarize_trips, time_of_day_plot, trip_plots, HistogramOptions,
    HistogramStyle, JsonRenderer, Plot, Renderer, Sample, TextRenderer,
};
use tui::renderer::TuiRenderer;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Json,
    Tui,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "triplens", version, about = "Histograms and plots for trip logs")]
struct Cli {
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Histogram of one numeric column.
    Hist {
        path: String,
        #[arg(long, default_value = "distance")] column: String,
        #[arg(long)] bins: Option<usize>,
        #[arg(long)] log: bool,
        #[arg(long, value_delimiter = ',', num_args = 2, allow_negative_numbers = true)]
        range: Option<Vec<f64>>,
        #[arg(long, value_enum, default_value = "text")] output: Output,
    },
    /// Activity, people and duration summary.
    Summary { path: String },
    /// Trips by time of day.
    Scatter {
        path: String,
        #[arg(long, value_enum, default_value = "text")] output: Output,
    },
    /// Hex-binned trip start locations.
    Hexbin {
        path: String,
        #[arg(long)] size: Option<f64>,
        #[arg(long, value_enum, default_value = "text")] output: Output,
    },
    /// Synthetic random-walk series.
    Timeseries {
        #[arg(long)] periods: Option<usize>,
        #[arg(long)] seed: Option<u64>,
        #[arg(long, value_enum, default_value = "text")] output: Output,
    },
    /// Every trip plot in the interactive viewer.
    Dashboard {
        path: String,
        #[arg(long, default_value = "distance")] column: String,
    },
    /// Write a histogram table to disk.
    Export {
        path: String,
        #[arg(long, default_value = "distance")] column: String,
        #[arg(long)] bins: Option<usize>,
        #[arg(long)] log: bool,
        #[arg(long, value_enum)] format: Option<ExportFormat>,
        #[arg(long)] output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default config");
        Config::default()
    });
    match cli.command {
        Commands::Hist { path, column, bins, log, range, output } => {
            let opts = histogram_options(&config, bins, log, range)?;
            run_hist(&path, &column, opts, output, config)?
        }
        Commands::Summary { path } => {
            let trips = load_trips(&path, &config.trips)?;
            print_summary(&summarize_trips(&trips, &config.trips)?);
        }
        Commands::Scatter { path, output } => {
            let trips = load_trips(&path, &config.trips)?;
            let plot = time_of_day_plot(&trips, &config)?;
            emit(&[plot], output, config, None)?
        }
        Commands::Hexbin { path, size, output } => {
            let trips = load_trips(&path, &config.trips)?;
            let plot = start_location_plot(&trips, &config, size.unwrap_or(config.hexbin.size))?;
            emit(&[plot], output, config, None)?
        }
        Commands::Timeseries { periods, seed, output } => {
            let mut config = config;
            if let Some(p) = periods { config.timeseries.periods = p; }
            if seed.is_some() { config.timeseries.seed = seed; }
            let plot = random_walk_plot(&config)?;
            emit(&[plot], output, config, None)?
        }
        Commands::Dashboard { path, column } => {
            let trips = load_trips(&path, &config.trips)?;
            let mut plots = trip_plots(&trips, &config, &column)?;
            plots.push(random_walk_plot(&config)?);
            let opts = histogram_options(&config, None, false, None)?;
            let sample = Sample::from_batch(&trips, &column)?;
            emit(&plots, Output::Tui, config, Some((column, sample, opts)))?
        }
        Commands::Export { path, column, bins, log, format, output } => {
            let opts = histogram_options(&config, bins, log, None)?;
            run_export(&path, &column, opts, format, output, &config)?
        }
    }
    Ok(())
}

fn histogram_options(config: &Config, bins: Option<usize>, log: bool, range: Option<Vec<f64>>) -> anyhow::Result<HistogramOptions> {
    let mut opts = HistogramOptions::new(bins.unwrap_or(config.histogram.bins)).log_scale(log || config.histogram.log_scale);
    if let Some(r) = range {
        let [lo, hi] = r.as_slice() else { anyhow::bail!("--range takes LO,HI, got {} values", r.len()) };
        opts = opts.range(*lo, *hi);
    }
    Ok(opts)
}

fn run_hist(path: &str, column: &str, opts: HistogramOptions, output: Output, config: Config) -> anyhow::Result<()> {
    let trips = load_trips(path, &config.trips)?;
    let sample = Sample::from_batch(&trips, column)?;
    tracing::info!(column, values = sample.len(), min = sample.min(), max = sample.max(), "building histogram");
    let table = sample.histogram(&opts)?;
    let plot = Plot::Histogram(hist_hover(table, column, &HistogramStyle::from(&config.histogram)));
    emit(&[plot], output, config, Some((column.to_string(), sample, opts)))
}

fn emit(plots: &[Plot], output: Output, config: Config, sample: Option<(String, Sample, HistogramOptions)>) -> anyhow::Result<()> {
    let mut renderer: Box<dyn Renderer> = match output {
        Output::Text => Box::new(TextRenderer::new(io::stdout()).with_bar(40, &config.display.bar_char)),
        Output::Json => Box::new(JsonRenderer::new(io::stdout())),
        Output::Tui => {
            let mut tui = TuiRenderer::new(config);
            if let Some((column, sample, opts)) = sample {
                tui.register_sample(&column, sample, opts);
            }
            Box::new(tui)
        }
    };
    render_all(renderer.as_mut(), plots)?;
    Ok(())
}

fn run_export(path: &str, column: &str, opts: HistogramOptions, format: Option<ExportFormat>, output: Option<String>, config: &Config) -> anyhow::Result<()> {
    let format = match format {
        Some(f) => f,
        None => match config.export.format.as_str() {
            "json" => ExportFormat::Json,
            "csv" => ExportFormat::Csv,
            other => anyhow::bail!("Unknown export format in config: {other} (use json or csv)"),
        },
    };
    let ext = match format { ExportFormat::Json => "json", ExportFormat::Csv => "csv" };
    let out_path: PathBuf = match output {
        Some(o) => PathBuf::from(o),
        None => Path::new(&config.export.output_dir).join(format!("histogram_{column}.{ext}")),
    };
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
    }
    let trips = load_trips(path, &config.trips)?;
    let table = Sample::from_batch(&trips, column)?.histogram(&opts)?;
    match format {
        ExportFormat::Json => export_histogram_json(&out_path, &hist_hover(table, column, &HistogramStyle::from(&config.histogram)))?,
        ExportFormat::Csv => export_histogram_csv(&out_path, &table, column)?,
    }
    println!("Exported to {}", out_path.display());
    Ok(())
}
