//! SVG chart rendering.
//!
//! Produces a standalone SVG document with the pie, a color-keyed legend,
//! and the total-count summary. Hover tooltips use SVG `<title>` elements.

use super::layout::{fmt_num, pie_slices, ColorScale, Slice};
use super::escape_xml;
use crate::config::ChartConfig;
use crate::models::{format_count, Aggregation, GroupSummary};

const TITLE_HEIGHT: u32 = 32;
const SUMMARY_HEIGHT: u32 = 32;
const LEGEND_ROW_HEIGHT: u32 = 24;
const LEGEND_SWATCH: u32 = 14;
const FONT_FAMILY: &str = "system-ui, -apple-system, sans-serif";

/// Outer dimensions of the rendered document.
pub fn document_size(chart: &ChartConfig) -> (u32, u32) {
    let title = if chart.title.is_some() { TITLE_HEIGHT } else { 0 };
    (
        chart.width + chart.legend_width,
        title + chart.height + SUMMARY_HEIGHT,
    )
}

/// Render the complete SVG document.
pub fn render_svg(aggregation: &Aggregation, chart: &ChartConfig) -> String {
    let (doc_width, doc_height) = document_size(chart);
    let top = if chart.title.is_some() { TITLE_HEIGHT } else { 0 };
    let colors = ColorScale::for_summaries(&aggregation.summaries, &chart.colors);

    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{font}\">\n",
        w = doc_width,
        h = doc_height,
        font = FONT_FAMILY
    ));

    if let Some(ref title) = chart.title {
        svg.push_str(&format!(
            "  <text class=\"chart-title\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"18\" font-weight=\"700\">{}</text>\n",
            fmt_num(f64::from(doc_width) / 2.0),
            TITLE_HEIGHT - 10,
            escape_xml(title)
        ));
    }

    svg.push_str(&render_pie(aggregation, chart, &colors, top));
    svg.push_str(&render_legend(&aggregation.summaries, chart, &colors, top));
    svg.push_str(&render_summary(aggregation.total, chart, top));

    svg.push_str("</svg>\n");

    svg
}

/// Render the pie group, translated to the center of the chart area.
pub(crate) fn render_pie(
    aggregation: &Aggregation,
    chart: &ChartConfig,
    colors: &ColorScale,
    top: u32,
) -> String {
    let mut group = String::new();
    let radius = chart.radius();

    group.push_str(&format!(
        "  <g class=\"pie-chart-svg\" transform=\"translate({}, {})\">\n",
        fmt_num(f64::from(chart.width) / 2.0),
        fmt_num(f64::from(top) + f64::from(chart.height) / 2.0)
    ));

    let slices = pie_slices(&aggregation.summaries, aggregation.total);
    if slices.is_empty() {
        group.push_str(
            "    <text class=\"no-data\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-size=\"14\">No data</text>\n",
        );
    }

    for slice in &slices {
        group.push_str(&render_slice(slice, chart, colors, radius));
    }

    group.push_str("  </g>\n");

    group
}

/// Render a single slice with its tooltip.
fn render_slice(slice: &Slice<'_>, chart: &ChartConfig, colors: &ColorScale, radius: f64) -> String {
    let summary = slice.summary;

    format!(
        "    <g class=\"arc\">\n      <path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\">\n        <title>{}</title>\n      </path>\n    </g>\n",
        slice.arc_path(radius),
        escape_xml(colors.color(&summary.group)),
        escape_xml(&chart.stroke_color),
        fmt_num(chart.stroke_width),
        escape_xml(&tooltip_text(summary))
    )
}

/// Tooltip text for a slice: name, count, and share on separate lines.
pub fn tooltip_text(summary: &GroupSummary) -> String {
    format!(
        "{}\nCount: {}\n{}",
        summary.group,
        format_count(summary.count),
        summary.percentage_label
    )
}

/// Legend entry text, e.g. `"Asian: 12.3%"`.
pub fn legend_text(summary: &GroupSummary) -> String {
    format!("{}: {}", summary.group, summary.percentage_label)
}

/// Summary line, e.g. `"Total inmates: 1,234"`.
pub fn summary_text(total: usize, chart: &ChartConfig) -> String {
    format!("{}: {}", chart.summary_label, format_count(total))
}

fn render_legend(
    summaries: &[GroupSummary],
    chart: &ChartConfig,
    colors: &ColorScale,
    top: u32,
) -> String {
    let mut legend = String::new();

    legend.push_str(&format!(
        "  <g class=\"legend\" transform=\"translate({}, {})\">\n",
        chart.width + 10,
        top + 20
    ));

    for (i, summary) in summaries.iter().enumerate() {
        let y = i as u32 * LEGEND_ROW_HEIGHT;
        legend.push_str(&format!(
            "    <g class=\"legend-item\" transform=\"translate(0, {})\">\n",
            y
        ));
        legend.push_str(&format!(
            "      <rect class=\"legend-color\" width=\"{s}\" height=\"{s}\" rx=\"3\" fill=\"{}\"/>\n",
            escape_xml(colors.color(&summary.group)),
            s = LEGEND_SWATCH
        ));
        legend.push_str(&format!(
            "      <text class=\"legend-text\" x=\"{}\" y=\"{}\" font-size=\"13\">{}</text>\n",
            LEGEND_SWATCH + 8,
            LEGEND_SWATCH - 2,
            escape_xml(&legend_text(summary))
        ));
        legend.push_str("    </g>\n");
    }

    legend.push_str("  </g>\n");

    legend
}

fn render_summary(total: usize, chart: &ChartConfig, top: u32) -> String {
    format!(
        "  <text class=\"summary\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"14\">{}</text>\n",
        fmt_num(f64::from(chart.width) / 2.0),
        top + chart.height + SUMMARY_HEIGHT / 2,
        escape_xml(&summary_text(total, chart))
    )
}
