//! Pie geometry and color assignment.

use crate::models::GroupSummary;
use std::f64::consts::{PI, TAU};

/// One pie segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<'a> {
    /// Summary this slice was built from.
    pub summary: &'a GroupSummary,
    /// Start angle in radians, clockwise from 12 o'clock.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
}

impl Slice<'_> {
    /// Angular size of the slice.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// SVG path data for the slice, centered on the origin.
    pub fn arc_path(&self, radius: f64) -> String {
        let (x0, y0) = polar(radius, self.start_angle);

        if self.sweep() >= TAU - 1e-9 {
            // A single arc cannot close on itself
            let (xm, ym) = polar(radius, self.start_angle + PI);
            return format!(
                "M{},{}A{r},{r},0,1,1,{},{}A{r},{r},0,1,1,{},{}Z",
                fmt_num(x0),
                fmt_num(y0),
                fmt_num(xm),
                fmt_num(ym),
                fmt_num(x0),
                fmt_num(y0),
                r = fmt_num(radius)
            );
        }

        let (x1, y1) = polar(radius, self.end_angle);
        let large_arc = if self.sweep() > PI { 1 } else { 0 };

        format!(
            "M{},{}A{r},{r},0,{},1,{},{}L0,0Z",
            fmt_num(x0),
            fmt_num(y0),
            large_arc,
            fmt_num(x1),
            fmt_num(y1),
            r = fmt_num(radius)
        )
    }
}

/// Lay out slices in input order over a full turn.
pub fn pie_slices(summaries: &[GroupSummary], total: usize) -> Vec<Slice<'_>> {
    let sum: usize = summaries.iter().map(|s| s.count).sum();
    let denominator = sum.max(total);
    if denominator == 0 {
        return Vec::new();
    }

    let mut slices = Vec::with_capacity(summaries.len());
    let mut running = 0usize;

    for summary in summaries {
        let start_angle = TAU * running as f64 / denominator as f64;
        running += summary.count;
        let end_angle = TAU * running as f64 / denominator as f64;

        slices.push(Slice {
            summary,
            start_angle,
            end_angle,
        });
    }

    slices
}

/// Ordinal color scale over a fixed palette.
#[derive(Debug, Clone)]
pub struct ColorScale {
    domain: Vec<String>,
    range: Vec<String>,
}

impl ColorScale {
    /// Map each domain value to the palette entry at its position, cycling the palette.
    pub fn new(domain: impl IntoIterator<Item = String>, range: &[String]) -> Self {
        Self {
            domain: domain.into_iter().collect(),
            range: range.to_vec(),
        }
    }

    /// Scale for the groups of a summary list.
    pub fn for_summaries(summaries: &[GroupSummary], range: &[String]) -> Self {
        Self::new(summaries.iter().map(|s| s.group.clone()), range)
    }

    /// Color for a domain value; unknown values get black.
    pub fn color(&self, key: &str) -> &str {
        if self.range.is_empty() {
            return "#000000";
        }
        match self.domain.iter().position(|d| d == key) {
            Some(index) => &self.range[index % self.range.len()],
            None => "#000000",
        }
    }
}

/// Point at `radius` and `angle` (clockwise from 12 o'clock), SVG coordinates.
fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Format a coordinate compactly: at most three decimals, no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(group: &str, count: usize) -> GroupSummary {
        GroupSummary {
            group: group.to_string(),
            count,
            percentage_label: String::new(),
        }
    }

    #[test]
    fn test_slices_cover_full_turn() {
        let summaries = vec![summary("A", 3), summary("B", 1), summary("C", 1)];
        let slices = pie_slices(&summaries, 5);

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].start_angle, 0.0);
        assert_eq!(slices[2].end_angle, TAU);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
        let total: f64 = slices.iter().map(|s| s.sweep()).sum();
        assert!((total - TAU).abs() < 1e-9);
        assert!((slices[0].sweep() - TAU * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_has_no_slices() {
        assert!(pie_slices(&[], 0).is_empty());
    }

    #[test]
    fn test_quarter_arc_path() {
        let summaries = vec![summary("A", 1), summary("B", 3)];
        let slices = pie_slices(&summaries, 4);

        assert_eq!(slices[0].arc_path(100.0), "M0,-100A100,100,0,0,1,100,0L0,0Z");
        assert_eq!(
            slices[1].arc_path(100.0),
            "M100,0A100,100,0,1,1,0,-100L0,0Z"
        );
    }

    #[test]
    fn test_full_circle_path() {
        let summaries = vec![summary("A", 7)];
        let slices = pie_slices(&summaries, 7);

        assert_eq!(
            slices[0].arc_path(50.0),
            "M0,-50A50,50,0,1,1,0,50A50,50,0,1,1,0,-50Z"
        );
    }

    #[test]
    fn test_color_scale_cycles() {
        let palette = vec!["red".to_string(), "blue".to_string()];
        let scale = ColorScale::new(
            ["A", "B", "C"].iter().map(|s| s.to_string()),
            &palette,
        );

        assert_eq!(scale.color("A"), "red");
        assert_eq!(scale.color("B"), "blue");
        assert_eq!(scale.color("C"), "red");
        assert_eq!(scale.color("missing"), "#000000");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(170.0), "170");
        assert_eq!(fmt_num(-0.0000001), "0");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(fmt_num(-12.5), "-12.5");
    }
}
