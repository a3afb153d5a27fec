//! Hypertac Slot Mapper CLI
//!
//! Command-line front end for the hypertac-core library. It adds:
//! - TOML configuration (grid size, column headers, output, policies)
//! - Parallel processing of several wiring sheets
//! - JSON envelopes and plain-text grid reports

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod pipeline;
mod report;

use config::{AppConfig, OutputFormat};
use pipeline::Pipeline;

/// Hypertac Slot Mapper - place wiring-sheet signals onto a Hypertac connector grid
#[derive(Parser, Debug)]
#[command(name = "hypertac")]
#[command(about = "Map signal-to-ECU wiring sheets onto a Hypertac slot grid", long_about = None)]
#[command(version)]
struct Args {
    /// Wiring sheet to map: .xlsx, .xlsm, .xlsb, .xls, .ods, .csv or .tsv (can be repeated)
    #[arg(short, long, value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of grid rows (default: 18)
    #[arg(long, value_name = "N")]
    rows: Option<usize>,

    /// Number of grid columns (default: 5)
    #[arg(long, value_name = "N")]
    cols: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (single input only; default: stdout)
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write one report per input into this directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Accept sheets that have headers but no valid rows
    #[arg(long)]
    allow_empty: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Hypertac Slot Mapper CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using hypertac-core v{}", hypertac_core::VERSION);

    let config = merge_config(&args)?;

    if config.input.files.is_empty() {
        println!("Hypertac Slot Mapper - No input specified");
        println!("\nQuick Start:");
        println!("  hypertac --input wiring.csv");
        println!("  hypertac --input wiring.csv --format txt --rows 18 --cols 5");
        println!("\nWith a configuration file:");
        println!("  hypertac --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    }

    if args.output.is_some() && config.input.files.len() > 1 {
        bail!("--output accepts a single input; use --output-dir for several");
    }

    run(&config, args.output.as_deref())
}

/// Load the config file (if any) and apply command-line overrides
fn merge_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    config.input.files.extend(args.input.iter().cloned());
    dedup_inputs(&mut config.input.files);
    if let Some(rows) = args.rows {
        config.grid.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.grid.cols = cols;
    }
    config.grid.validate()?;

    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(dir) = &args.output_dir {
        config.output.output_dir = Some(dir.clone());
    }
    if args.allow_empty {
        config.policy.allow_empty = true;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn run(config: &AppConfig, output: Option<&Path>) -> Result<()> {
    let visualizer = hypertac_core::Visualizer::new()
        .with_grid(config.grid)
        .with_extractor(config.extractor_config());
    let pipeline = Pipeline::new(visualizer);

    let outcomes = pipeline.process_all(&config.input.files);
    let format = config.output.format;

    if let Some(dir) = &config.output.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }

    let targets = config.output.output_dir.as_deref().map(|dir| {
        let inputs: Vec<&Path> = outcomes.iter().map(|o| o.input.as_path()).collect();
        report_paths(dir, &inputs, format)
    });

    let mut failures = 0;
    for (i, outcome) in outcomes.iter().enumerate() {
        if let Err(e) = &outcome.result {
            log::error!("{:#}", e);
            failures += 1;
        }

        let rendered = report::render(format, &outcome.input, &outcome.result)?;
        let target = match (&targets, output) {
            (Some(paths), _) => paths.get(i).cloned(),
            (None, Some(file)) => Some(file.to_path_buf()),
            (None, None) => None,
        };

        match target {
            Some(path) => {
                fs::write(&path, rendered)
                    .with_context(|| format!("Failed to write report: {:?}", path))?;
                log::info!("Report written: {:?}", path);
            }
            None => println!("{}", rendered),
        }
    }

    if failures > 0 {
        bail!("{} of {} inputs failed", failures, outcomes.len());
    }
    Ok(())
}

/// Drop repeated inputs, keeping the first occurrence
fn dedup_inputs(files: &mut Vec<PathBuf>) {
    let mut seen = HashSet::new();
    files.retain(|file| {
        let key = fs::canonicalize(file).unwrap_or_else(|_| file.clone());
        let first = seen.insert(key);
        if !first {
            log::warn!("Ignoring repeated input: {:?}", file);
        }
        first
    });
}

/// `<dir>/<input stem>.<json|txt>`
fn report_path(dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    numbered_report_path(dir, input, format, 1)
}

/// `<dir>/<input stem>-<n>.<json|txt>` for n > 1
fn numbered_report_path(dir: &Path, input: &Path, format: OutputFormat, n: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    if n > 1 {
        dir.join(format!("{}-{}.{}", stem, n, format.extension()))
    } else {
        dir.join(format!("{}.{}", stem, format.extension()))
    }
}

/// One distinct report path per input; repeated stems get a numeric suffix
fn report_paths(dir: &Path, inputs: &[&Path], format: OutputFormat) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let mut n = 1;
            let mut path = report_path(dir, input, format);
            while !taken.insert(path.clone()) {
                n += 1;
                path = numbered_report_path(dir, input, format, n);
            }
            if n > 1 {
                log::warn!(
                    "Report name for {:?} already taken, writing {:?}",
                    input,
                    path
                );
            }
            path
        })
        .collect()
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
