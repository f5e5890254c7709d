//! Catq: Catalog Quality Analyzer CLI

use anyhow::{Context, Result};
use catq::config::{load_config, CONFIG_FILENAME};
use catq::reporter::{ConsoleReporter, CsvReporter, JsonReporter};
use catq::{AnalysisEngine, Catalog, ColumnMapping};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Catq: Data Quality Analyzer for product catalogs
#[derive(Parser, Debug)]
#[command(name = "catq")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog CSV file to analyze (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Column holding the product identifier (auto-detected when omitted)
    #[arg(long)]
    id_column: Option<String>,

    /// Column holding the free-text description (auto-detected when omitted)
    #[arg(long)]
    description_column: Option<String>,

    /// Comma-separated code columns, in order (auto-detected when omitted)
    #[arg(long, value_delimiter = ',')]
    code_columns: Vec<String>,

    /// Output the report as JSON
    #[arg(long, short)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Write the tabular (CSV) report to this file
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Write JSON output to this file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Minimum overall score (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Quiet mode (just the score and label)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (per-column detail)
    #[arg(long, short)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Path to config file (default: search .catqrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .catqrc.json with the default tunables spelled out
    Init {
        /// Minimum overall score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<f64>,

        /// Directory in which to create the config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(Commands::Init { threshold, dir }) = args.command {
        return run_init(threshold, dir.as_deref());
    }

    let path = args
        .path
        .clone()
        .context("path required when not using a subcommand")?;

    // Resolve work directory for config search
    let work_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    // Load config (CLI flags override config file)
    let config =
        load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.threshold);

    let catalog = Catalog::from_csv_path(&path)?;
    let mapping = resolve_mapping(&args, config.mapping.as_ref(), &catalog)?;

    let engine = AnalysisEngine::new(config.clone());
    let report = engine.analyze(&catalog, &mapping)?;

    if let Some(ref csv_path) = args.csv {
        let table = CsvReporter::new().report(&report)?;
        std::fs::write(csv_path, table)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
    }

    if args.json {
        let reporter = if args.pretty {
            JsonReporter::new().pretty()
        } else {
            JsonReporter::new()
        };
        let json = reporter.report(&report);
        match args.output {
            Some(ref out) => std::fs::write(out, json)
                .with_context(|| format!("Failed to write {}", out.display()))?,
            None => println!("{json}"),
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.no_color {
            reporter = reporter.without_colors();
            colored::control::set_override(false);
        }
        if args.verbose {
            reporter = reporter.verbose();
        }
        if args.quiet {
            reporter.report_quiet(&report);
        } else {
            reporter.report(&report);
        }
    }

    if let Some(threshold) = config.threshold {
        if report.overall_score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "Overall score {:.2} is below the threshold {:.2}",
                    report.overall_score, threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// CLI flags beat the config file; anything still missing is auto-detected.
fn resolve_mapping(
    args: &Args,
    configured: Option<&ColumnMapping>,
    catalog: &Catalog,
) -> Result<ColumnMapping> {
    let fully_specified = args.id_column.is_some()
        && args.description_column.is_some()
        && !args.code_columns.is_empty();

    let base = if fully_specified {
        ColumnMapping::new(
            args.id_column.clone().unwrap_or_default(),
            args.description_column.clone().unwrap_or_default(),
            args.code_columns.clone(),
        )
    } else {
        let mut mapping = match configured {
            Some(m) => m.clone(),
            None => ColumnMapping::detect(catalog)?,
        };
        if let Some(ref id) = args.id_column {
            mapping.id_column = id.clone();
        }
        if let Some(ref desc) = args.description_column {
            mapping.description_column = desc.clone();
        }
        if !args.code_columns.is_empty() {
            mapping.code_columns = args.code_columns.clone();
        }
        mapping
    };

    base.validate(catalog)?;
    Ok(base)
}

fn run_init(threshold: Option<f64>, dir: Option<&Path>) -> Result<ExitCode> {
    let dir = dir.unwrap_or(Path::new("."));
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(&path, catq::config::default_config_json(threshold))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(ExitCode::SUCCESS)
}
