use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use delivery_stats::config::Overrides;
use delivery_stats::{open_source, Analysis, InputFormat, Report, Settings};

/// Compute per-month, per-product delivery time statistics (mean and tp90)
/// from a shipment export.
///
/// Use the `RUST_LOG` environment variable to configure logging. Logs go to
/// stderr; the report goes to stdout.
#[derive(Parser, Debug)]
#[command(name = "delivery-stats", version)]
struct Args {
    /// Shipment export (CSV, JSON array or JSON Lines)
    input: PathBuf,

    /// Config file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input format; `auto` picks by file extension
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Product kind column: header name, or zero-based index
    #[arg(long)]
    kind_column: Option<String>,

    /// Milestones payload column: header name, or zero-based index
    #[arg(long)]
    milestones_column: Option<String>,

    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Treat the first CSV record as data rather than headers
    #[arg(long)]
    no_headers: bool,

    /// Report format written to stdout
    #[arg(short, long, value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Output {
    /// One line per month and product type
    Text,
    /// Pretty-printed JSON document
    Json,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            format: self.format,
            kind_column: self.kind_column.clone(),
            milestones_column: self.milestones_column.clone(),
            delimiter: self.delimiter,
            no_headers: self.no_headers,
        }
    }

    /// Loaded settings with command-line overrides applied on top.
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        self.overrides().apply(&mut settings);
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = args.settings()?;
    debug!(?settings, "loaded settings");

    run(&args.input, &settings, args.output, args.export.as_deref())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose || cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = if verbose {
        EnvFilter::new(default_level.to_string())
    } else {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    };

    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Read, analyse and report one batch.
fn run(input: &Path, settings: &Settings, output: Output, export: Option<&Path>) -> Result<()> {
    let mut source = open_source(input, &settings.input)?;
    let rows = source
        .read_rows()
        .with_context(|| format!("failed to read shipments from {}", source.description()))?;
    info!(source = source.description(), rows = rows.len(), "loaded shipments");

    let analysis = Analysis::run(rows, &settings.milestones);
    let stats = analysis.statistics();
    let report = Report::new(&analysis.summary, &stats);

    match output {
        Output::Text => print!("{}", report.to_text()),
        Output::Json => println!("{}", report.to_json()?),
    }

    if let Some(path) = export {
        report.export(path)?;
        eprintln!("Exported delivery statistics to: {}", path.display());
    }

    Ok(())
}
