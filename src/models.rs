//! Data models for the chart generator.
//!
//! This module contains the core data structures used throughout
//! the application for representing records, groups, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single input observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Raw ethnicity label, taken verbatim from the source.
    pub ethnicity: String,
}

impl Record {
    /// Creates a record from a raw label.
    pub fn new(ethnicity: impl Into<String>) -> Self {
        Self {
            ethnicity: ethnicity.into(),
        }
    }
}

/// A named group and the raw labels that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Group name shown in the chart.
    pub name: String,
    /// Raw labels counted under this group.
    #[serde(default)]
    pub members: Vec<String>,
}

impl GroupDefinition {
    /// Creates a group definition from a name and its member labels.
    pub fn new(name: &str, members: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Count and share of a single group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group name.
    pub group: String,
    /// Number of records assigned to the group.
    pub count: usize,
    /// Share of the total, e.g. `"12.3%"`.
    #[serde(rename = "percentage")]
    pub percentage_label: String,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Non-empty groups, largest first.
    pub summaries: Vec<GroupSummary>,
    /// Total number of records.
    pub total: usize,
}

impl Aggregation {
    /// Returns true when no records were aggregated.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Metadata about a generated chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartMetadata {
    /// Input file the records were read from.
    pub source: String,
    /// CSV column holding the raw labels.
    pub column: String,
    /// Chart title, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
}

/// The complete chart report handed to the renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartReport {
    /// Metadata about the report.
    pub metadata: ChartMetadata,
    /// Aggregated group counts.
    #[serde(flatten)]
    pub aggregation: Aggregation,
}

/// Formats an integer with comma thousands separators (`12345` -> `"12,345"`).
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_group_definition_new() {
        let group = GroupDefinition::new("Asian", &["Chinese", "Korean"]);
        assert_eq!(group.name, "Asian");
        assert_eq!(group.members, vec!["Chinese", "Korean"]);
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = ChartReport {
            metadata: ChartMetadata {
                source: "data.csv".to_string(),
                column: "Ethnicity".to_string(),
                title: None,
                generated_at: Utc::now(),
            },
            aggregation: Aggregation {
                summaries: vec![GroupSummary {
                    group: "Black".to_string(),
                    count: 2,
                    percentage_label: "100.0%".to_string(),
                }],
                total: 2,
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["summaries"][0]["percentage"], "100.0%");
        assert!(json["metadata"].get("title").is_none());
    }
}
