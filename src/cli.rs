//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Demochart - grouped demographic pie charts from CSV files
///
/// Reads raw ethnicity labels from a CSV column, folds them into
/// race groups, and renders a pie chart with legend and total.
///
/// Examples:
///   demochart --input data/demographics.csv
///   demochart --input data/demographics.csv --format html -o chart.html
///   demochart --input data/demographics.csv --column Race --dry-run
///   demochart --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV file to read ("-" reads standard input)
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Output file path
    ///
    /// Defaults to pie_chart.<ext> where <ext> follows --format
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (svg, html, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .demochart.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV column holding the raw labels
    #[arg(long, value_name = "NAME", env = "DEMOCHART_COLUMN")]
    pub column: Option<String>,

    /// CSV field delimiter
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Width of the pie area in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Height of the pie area in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Margin around the pie in pixels
    #[arg(long, value_name = "PX")]
    pub margin: Option<u32>,

    /// Chart title
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: aggregate and print the group table without writing a file
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .demochart.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone SVG image (default)
    #[default]
    Svg,
    /// HTML page with inline SVG, legend and summary
    Html,
    /// Markdown table
    Markdown,
    /// JSON report
    Json,
}

impl OutputFormat {
    /// File extension conventionally used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns true when records should be read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_deref() == Some(std::path::Path::new("-"))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.width == Some(0) || self.height == Some(0) {
            return Err("Width and height must be at least 1 pixel".to_string());
        }

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err(format!(
                    "Delimiter must be a single ASCII character, got {:?}",
                    delimiter
                ));
            }
        }

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if !self.reads_stdin() {
                if !input.exists() {
                    return Err(format!("Input file does not exist: {}", input.display()));
                }
                if !input.is_file() {
                    return Err(format!("Input path is not a file: {}", input.display()));
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            input: Some(PathBuf::from("-")),
            output: None,
            format: None,
            config: None,
            column: None,
            delimiter: None,
            width: None,
            height: None,
            margin: None,
            title: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "demochart",
            "--input",
            "data.csv",
            "--format",
            "html",
            "--width",
            "640",
            "--delimiter",
            ";",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("data.csv")));
        assert_eq!(args.format, Some(OutputFormat::Html));
        assert_eq!(args.width, Some(640));
        assert_eq!(args.delimiter, Some(';'));
    }

    #[test]
    fn test_input_required_unless_init_config() {
        assert!(Args::try_parse_from(["demochart"]).is_err());
        assert!(Args::try_parse_from(["demochart", "--init-config"]).is_ok());
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("definitely/not/here.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_stdin_input() {
        let args = make_args();
        assert!(args.reads_stdin());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_width() {
        let mut args = make_args();
        args.width = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert_eq!(OutputFormat::Markdown.extension(), "md");
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
