//! Demochart - grouped demographic pie charts
//!
//! A CLI tool that reads raw ethnicity labels from a CSV file, folds them
//! into coarser groups, and renders a pie chart with legend and total.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, unreadable input, write failure)

mod analysis;
mod cli;
mod config;
mod data;
mod models;
mod render;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::{format_count, Aggregation, ChartMetadata, ChartReport, Record};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the log level, so it loads first
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(&args));

    info!("Demochart v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    log_config_source(&args);

    if let Err(e) = run_chart(args, config) {
        error!("Chart generation failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .demochart.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize groups, colors, and chart size.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete load, aggregate, render workflow.
fn run_chart(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    config.validate()?;

    let table = config.grouping.table()?;
    debug!(
        "{} groups, fallback '{}'",
        table.groups().len(),
        table.fallback_name()
    );

    // Step 1: Load records
    let source = args
        .input
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let records = read_records(&args, &config)?;
    info!("Loaded {} records from {}", records.len(), source);

    // Step 2: Aggregate
    let aggregation = analysis::aggregate(&records, &table);
    if aggregation.is_empty() {
        warn!("No records found in {}; the chart will be empty", source);
    }

    if args.dry_run {
        print_summary(&aggregation, &config);
        println!("\n✅ Dry run complete. No file was written.");
        return Ok(());
    }

    // Step 3: Render
    let report = ChartReport {
        metadata: ChartMetadata {
            source,
            column: config.data.column.clone(),
            title: config.chart.title.clone(),
            generated_at: Utc::now(),
        },
        aggregation,
    };

    let output = match config.general.format {
        OutputFormat::Svg => render::render_svg(&report.aggregation, &config.chart),
        OutputFormat::Html => render::render_html(&report.aggregation, &config.chart),
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    let output_path = Path::new(&config.general.output);
    report::write_output(output_path, &output)?;

    if !args.quiet {
        print_summary(&report.aggregation, &config);
        println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
        println!(
            "\n✅ Chart saved to: {} ({:?})",
            output_path.display(),
            config.general.format
        );
    }

    Ok(())
}

/// Read records from the input file or standard input.
fn read_records(args: &Args, config: &Config) -> Result<Vec<Record>> {
    let options = data::LoadOptions::from(&config.data);

    if args.reads_stdin() {
        return data::load_records_from_reader(std::io::stdin().lock(), &options)
            .context("Failed to read records from standard input");
    }

    let path = args
        .input
        .as_deref()
        .context("An input file is required")?;

    data::load_records(path, &options)
        .with_context(|| format!("Failed to load records from {}", path.display()))
}

/// Print the group table to stdout.
fn print_summary(aggregation: &Aggregation, config: &Config) {
    println!("\n📊 {}", render::svg::summary_text(aggregation.total, &config.chart));

    for summary in &aggregation.summaries {
        println!(
            "   {:<20} {:>10} {:>7}",
            summary.group,
            format_count(summary.count),
            summary.percentage_label
        );
    }
}

/// Load configuration from file or use defaults.
///
/// A config file that exists but cannot be read or parsed is an error.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    Ok(Config::load_default()?.unwrap_or_default())
}

/// Report where the configuration came from once logging is up.
fn log_config_source(args: &Args) {
    if let Some(ref config_path) = args.config {
        info!("Loaded config from: {}", config_path.display());
    } else if Path::new(CONFIG_FILE).exists() {
        info!("Loaded default config from {}", CONFIG_FILE);
    } else {
        debug!("No config file found, using defaults");
    }
}
