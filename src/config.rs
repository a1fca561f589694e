//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.demochart.toml` files.

use crate::analysis::GroupTable;
use crate::cli::OutputFormat;
use crate::models::GroupDefinition;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".demochart.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Chart appearance settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Group definitions.
    #[serde(default)]
    pub grouping: GroupingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "pie_chart.svg".to_string()
}

/// CSV input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Header of the column holding raw labels.
    #[serde(default = "default_column")]
    pub column: String,

    /// Field delimiter (a single ASCII character).
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            column: default_column(),
            delimiter: default_delimiter(),
        }
    }
}

impl DataConfig {
    /// Delimiter as a byte, falling back to a comma.
    pub fn delimiter_byte(&self) -> u8 {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => b',',
        }
    }
}

fn default_column() -> String {
    "Ethnicity".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Chart appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Width of the pie area in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Height of the pie area in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Margin between the pie and the edge of its area.
    #[serde(default = "default_margin")]
    pub margin: u32,

    /// Width reserved for the legend, right of the pie.
    #[serde(default = "default_legend_width")]
    pub legend_width: u32,

    /// Slice colors, assigned in ranking order and reused when exhausted.
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,

    /// Slice outline color.
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,

    /// Slice outline width.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Optional chart title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Label preceding the total count.
    #[serde(default = "default_summary_label")]
    pub summary_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
            legend_width: default_legend_width(),
            colors: default_colors(),
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
            title: None,
            summary_label: default_summary_label(),
        }
    }
}

impl ChartConfig {
    /// Pie radius for the configured area.
    pub fn radius(&self) -> f64 {
        f64::from(self.width.min(self.height)) / 2.0 - f64::from(self.margin)
    }
}

fn default_width() -> u32 {
    500
}

fn default_height() -> u32 {
    400
}

fn default_margin() -> u32 {
    30
}

fn default_legend_width() -> u32 {
    220
}

fn default_colors() -> Vec<String> {
    vec![
        "#6050DC", "#D52DB7", "#FF2E7E", "#FF6B45", "#FFAB05", "#8A2BE2",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_stroke_color() -> String {
    "white".to_string()
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_summary_label() -> String {
    "Total inmates".to_string()
}

/// Group definitions and the fallback group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Group receiving labels that match no member list.
    #[serde(default = "default_fallback")]
    pub fallback: String,

    /// Groups in priority order.
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupDefinition>,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            groups: default_groups(),
        }
    }
}

impl GroupingConfig {
    /// Build the validated lookup table.
    pub fn table(&self) -> Result<GroupTable> {
        GroupTable::new(self.groups.clone(), &self.fallback).context("Invalid [grouping] section")
    }
}

fn default_fallback() -> String {
    "Other".to_string()
}

fn default_groups() -> Vec<GroupDefinition> {
    vec![
        GroupDefinition::new("Black", &["Black"]),
        GroupDefinition::new("White", &["White"]),
        GroupDefinition::new(
            "Hispanic",
            &[
                "Hispanic",
                "Mexican",
                "Salvadorian",
                "Puerto Rican",
                "Guatemalan",
                "Cuban",
                "Columbian",
                "Nicaraguan",
            ],
        ),
        GroupDefinition::new(
            "Asian",
            &[
                "Other Asian",
                "Chinese",
                "Cambodian",
                "Korean",
                "Indian",
                "Japanese",
                "Thai",
                "Vietnamese",
                "Filipino",
            ],
        ),
        GroupDefinition::new(
            "Pacific Islander",
            &["Pacific Islander", "Samoan", "Hawaiian", "Guamanian"],
        ),
        GroupDefinition::new(
            "Other",
            &["Other", "American Indian", "Laotian", "Jamaican", "Unknown"],
        ),
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.demochart.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Log level from the merged settings; `--quiet` beats `verbose = true`.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if !args.quiet && self.general.verbose {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only explicitly provided values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        } else if self.general.output == default_output() {
            // Default file name follows the chosen format
            self.general.output =
                replace_extension(&self.general.output, self.general.format.extension());
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(ref column) = args.column {
            self.data.column = column.clone();
        }
        if let Some(delimiter) = args.delimiter {
            self.data.delimiter = delimiter.to_string();
        }

        if let Some(width) = args.width {
            self.chart.width = width;
        }
        if let Some(height) = args.height {
            self.chart.height = height;
        }
        if let Some(margin) = args.margin {
            self.chart.margin = margin;
        }
        if let Some(ref title) = args.title {
            self.chart.title = Some(title.clone());
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.chart.width == 0 || self.chart.height == 0 {
            anyhow::bail!("Chart width and height must be at least 1 pixel");
        }
        if self.chart.radius() <= 0.0 {
            anyhow::bail!(
                "Margin {} leaves no room for a {}x{} pie",
                self.chart.margin,
                self.chart.width,
                self.chart.height
            );
        }
        if self.chart.colors.is_empty() {
            anyhow::bail!("At least one chart color is required");
        }
        if !matches!(self.data.delimiter.as_bytes(), [b] if b.is_ascii()) {
            anyhow::bail!(
                "Delimiter must be a single ASCII character, got {:?}",
                self.data.delimiter
            );
        }
        self.grouping.table()?;
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

/// Swap the extension of a path-like string.
fn replace_extension(path: &str, extension: &str) -> String {
    Path::new(path)
        .with_extension(extension)
        .display()
        .to_string()
}
