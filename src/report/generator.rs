//! Markdown and JSON report generation.
//!
//! This module generates text reports of the group counts for
//! consumers that do not want an image.

use crate::models::{format_count, Aggregation, ChartMetadata, ChartReport};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ChartReport) -> String {
    let mut output = String::new();

    // Title
    let title = report.metadata.title.as_deref().unwrap_or("Demographics Report");
    output.push_str(&format!("# {}\n\n", escape_markdown(title)));

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_groups_section(&report.aggregation));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ChartMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Source:** {}\n",
        escape_markdown(&metadata.source)
    ));
    section.push_str(&format!(
        "- **Column:** {}\n",
        escape_markdown(&metadata.column)
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push('\n');

    section
}

/// Generate the group breakdown table.
fn generate_groups_section(aggregation: &Aggregation) -> String {
    let mut section = String::new();

    section.push_str("## Groups\n\n");

    if aggregation.summaries.is_empty() {
        section.push_str("No records were found in the input.\n\n");
    } else {
        section.push_str("| Group | Count | Share |\n");
        section.push_str("|:---|---:|---:|\n");

        for summary in &aggregation.summaries {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_markdown(&summary.group),
                format_count(summary.count),
                summary.percentage_label
            ));
        }
        section.push('\n');
    }

    section.push_str(&format!(
        "**Total records:** {}\n\n",
        format_count(aggregation.total)
    ));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by demochart*\n".to_string()
}

/// Backslash-escape characters that Markdown would treat as syntax.
///
/// Covers inline markup, headings, links, raw HTML and table pipes.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '|' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ChartReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered output to a file, creating parent directories.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output to {}", path.display()))
}
