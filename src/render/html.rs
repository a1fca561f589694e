//! HTML page rendering.
//!
//! Embeds the pie as inline SVG next to an HTML legend and a summary
//! paragraph.

use super::escape_xml;
use super::layout::ColorScale;
use super::svg::{legend_text, render_pie, summary_text};
use crate::config::ChartConfig;
use crate::models::Aggregation;

const STYLE: &str = r#"
body {
  margin: 0;
  padding: 24px;
  font-family: system-ui, -apple-system, sans-serif;
  color: #1f2430;
  background: #ffffff;
}
h1 { font-size: 20px; margin: 0 0 16px; }
#chart-container { display: flex; align-items: center; gap: 24px; }
.arc path { transition: opacity 200ms ease-out; }
.arc path:hover { opacity: 0.8; }
#legend { display: flex; flex-direction: column; gap: 8px; }
.legend-item { display: flex; align-items: center; gap: 8px; font-size: 14px; }
.legend-color { width: 14px; height: 14px; border-radius: 3px; }
#summary p { font-size: 15px; margin: 16px 0 0; }
"#;

/// Render a complete HTML page.
pub fn render_html(aggregation: &Aggregation, chart: &ChartConfig) -> String {
    let colors = ColorScale::for_summaries(&aggregation.summaries, &chart.colors);
    let page_title = chart.title.as_deref().unwrap_or("Pie chart");

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_xml(page_title)));
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");

    if let Some(ref title) = chart.title {
        html.push_str(&format!("<h1>{}</h1>\n", escape_xml(title)));
    }

    html.push_str("<div id=\"chart-container\">\n");
    html.push_str("<div id=\"pie-chart\">\n");
    html.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = chart.width,
        h = chart.height
    ));
    html.push_str(&render_pie(aggregation, chart, &colors, 0));
    html.push_str("</svg>\n</div>\n");

    html.push_str("<div id=\"legend\">\n");
    for summary in &aggregation.summaries {
        html.push_str(&format!(
            "  <div class=\"legend-item\"><div class=\"legend-color\" style=\"background-color: {}\"></div><span class=\"legend-text\">{}</span></div>\n",
            escape_xml(colors.color(&summary.group)),
            escape_xml(&legend_text(summary))
        ));
    }
    html.push_str("</div>\n</div>\n");

    html.push_str(&format!(
        "<div id=\"summary\"><p>{}</p></div>\n",
        escape_xml(&summary_text(aggregation.total, chart))
    ));

    html.push_str("</body>\n</html>\n");

    html
}
