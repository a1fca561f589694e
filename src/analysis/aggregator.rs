//! Group aggregation and percentage statistics.
//!
//! This module maps raw labels onto the configured groups, counts them,
//! and produces the ranked list of group summaries.

use crate::models::{Aggregation, GroupDefinition, GroupSummary, Record};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Errors raised while building a group table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("at least one group must be defined")]
    NoGroups,
    #[error("group names must not be empty")]
    EmptyGroupName,
    #[error("group '{0}' is defined more than once")]
    DuplicateGroup(String),
    #[error("fallback group '{0}' is not one of the defined groups")]
    UnknownFallback(String),
}

/// Ordered group definitions with a precomputed label lookup.
#[derive(Debug, Clone)]
pub struct GroupTable {
    groups: Vec<GroupDefinition>,
    fallback: usize,
    lookup: HashMap<String, usize>,
}

impl GroupTable {
    /// Build a table from definitions in priority order.
    ///
    /// A label listed under several groups belongs to the first of them.
    pub fn new(groups: Vec<GroupDefinition>, fallback: &str) -> Result<Self, GroupingError> {
        if groups.is_empty() {
            return Err(GroupingError::NoGroups);
        }

        let mut seen = HashSet::new();
        for group in &groups {
            if group.name.is_empty() {
                return Err(GroupingError::EmptyGroupName);
            }
            if !seen.insert(group.name.as_str()) {
                return Err(GroupingError::DuplicateGroup(group.name.clone()));
            }
        }

        let fallback = groups
            .iter()
            .position(|g| g.name == fallback)
            .ok_or_else(|| GroupingError::UnknownFallback(fallback.to_string()))?;

        let mut lookup = HashMap::new();
        for (index, group) in groups.iter().enumerate() {
            for member in &group.members {
                lookup.entry(member.clone()).or_insert(index);
            }
        }

        Ok(Self {
            groups,
            fallback,
            lookup,
        })
    }

    /// Group definitions in priority order.
    pub fn groups(&self) -> &[GroupDefinition] {
        &self.groups
    }

    /// Name of the catch-all group.
    pub fn fallback_name(&self) -> &str {
        &self.groups[self.fallback].name
    }

    /// Index of the group a raw label belongs to.
    pub fn group_index(&self, label: &str) -> usize {
        self.lookup.get(label).copied().unwrap_or(self.fallback)
    }

    /// Name of the group a raw label belongs to.
    #[allow(dead_code)] // Lookup helper for callers that need names
    pub fn group_for(&self, label: &str) -> &str {
        &self.groups[self.group_index(label)].name
    }
}

/// Count occurrences of each distinct raw label.
pub fn label_frequencies(records: &[Record]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        *counts.entry(record.ethnicity.as_str()).or_default() += 1;
    }

    counts
}

/// Aggregate records into ranked group summaries.
pub fn aggregate(records: &[Record], table: &GroupTable) -> Aggregation {
    let total = records.len();
    let mut counts = vec![0usize; table.groups().len()];

    for (label, count) in label_frequencies(records) {
        let index = table.group_index(label);
        if index == table.fallback && !table.lookup.contains_key(label) {
            debug!(
                "Unmatched label {:?} ({}) counted under {}",
                label,
                count,
                table.fallback_name()
            );
        }
        counts[index] += count;
    }

    let mut summaries: Vec<GroupSummary> = table
        .groups()
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(group, count)| GroupSummary {
            group: group.name.clone(),
            count,
            percentage_label: percentage_label(count, total),
        })
        .collect();

    // Stable: equal counts keep definition order
    summaries.sort_by_key(|s| std::cmp::Reverse(s.count));

    Aggregation { summaries, total }
}

/// Format `count / total` as a percentage with one decimal, e.g. `"12.3%"`.
///
/// Rounds the f64 share the way JavaScript's `toFixed(1)` does: the nearest
/// tenth of the binary value, with exact ties going up. A zero total yields
/// `"0.0%"`.
pub fn percentage_label(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }

    let value = count as f64 / total as f64 * 100.0;

    // Only .25 and .75 can sit exactly between two tenths
    let fract = value.fract();
    if fract == 0.25 || fract == 0.75 {
        let tenths = (value * 10.0 + 0.5) as u64;
        return format!("{}.{}%", tenths / 10, tenths % 10);
    }

    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(labels: &[&str]) -> Vec<Record> {
        labels.iter().map(|l| Record::new(*l)).collect()
    }

    fn simple_table() -> GroupTable {
        GroupTable::new(
            vec![
                GroupDefinition::new("A", &["x", "y"]),
                GroupDefinition::new("B", &["z"]),
                GroupDefinition::new("Other", &[]),
            ],
            "Other",
        )
        .unwrap()
    }

    fn summary(group: &str, count: usize, pct: &str) -> GroupSummary {
        GroupSummary {
            group: group.to_string(),
            count,
            percentage_label: pct.to_string(),
        }
    }

    #[test]
    fn test_aggregate_example() {
        let result = aggregate(&records(&["x", "x", "y", "z", "q"]), &simple_table());

        assert_eq!(result.total, 5);
        assert_eq!(
            result.summaries,
            vec![
                summary("A", 3, "60.0%"),
                summary("B", 1, "20.0%"),
                summary("Other", 1, "20.0%"),
            ]
        );
    }

    #[test]
    fn test_aggregate_empty_input() {
        let result = aggregate(&[], &simple_table());

        assert_eq!(result.total, 0);
        assert!(result.summaries.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_counts_cover_every_record() {
        let input = records(&["x", "", "z", "z", "unknown", "y", "Z", " x"]);
        let result = aggregate(&input, &simple_table());

        let sum: usize = result.summaries.iter().map(|s| s.count).sum();
        assert_eq!(sum, input.len());
        assert!(result.summaries.iter().all(|s| s.count > 0));
        assert!(result
            .summaries
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_first_matching_group_wins() {
        let table = GroupTable::new(
            vec![
                GroupDefinition::new("First", &["shared"]),
                GroupDefinition::new("Second", &["shared", "own"]),
                GroupDefinition::new("Other", &[]),
            ],
            "Other",
        )
        .unwrap();

        assert_eq!(table.group_for("shared"), "First");
        assert_eq!(table.group_for("own"), "Second");

        let result = aggregate(&records(&["shared", "shared", "own"]), &table);
        assert_eq!(result.summaries[0], summary("First", 2, "66.7%"));
        assert_eq!(result.summaries[1], summary("Second", 1, "33.3%"));
    }

    #[test]
    fn test_member_of_fallback_group_is_not_special() {
        let table = GroupTable::new(
            vec![
                GroupDefinition::new("Other", &["Unknown"]),
                GroupDefinition::new("Black", &["Black"]),
            ],
            "Other",
        )
        .unwrap();

        let result = aggregate(&records(&["Black", "Unknown", "Martian"]), &table);
        assert_eq!(
            result.summaries,
            vec![summary("Other", 2, "66.7%"), summary("Black", 1, "33.3%")]
        );
    }

    #[test]
    fn test_unmatched_labels_go_to_fallback() {
        let table = simple_table();
        assert_eq!(table.fallback_name(), "Other");
        assert_eq!(table.group_for("q"), "Other");
        assert_eq!(table.group_for(""), "Other");
        // Matching is exact
        assert_eq!(table.group_for("X"), "Other");
    }

    #[test]
    fn test_ties_keep_definition_order() {
        let result = aggregate(&records(&["q", "z", "x"]), &simple_table());
        let order: Vec<_> = result.summaries.iter().map(|s| s.group.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "Other"]);
    }

    #[test]
    fn test_fixture_with_default_groups() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/demographics.csv");
        let input =
            crate::data::load_records(&path, &crate::data::LoadOptions::default()).unwrap();
        let table = crate::config::GroupingConfig::default().table().unwrap();

        let result = aggregate(&input, &table);
        assert_eq!(result.total, 20);
        assert_eq!(
            result.summaries,
            vec![
                summary("Black", 5, "25.0%"),
                summary("Hispanic", 4, "20.0%"),
                summary("White", 3, "15.0%"),
                summary("Asian", 3, "15.0%"),
                summary("Other", 3, "15.0%"),
                summary("Pacific Islander", 2, "10.0%"),
            ]
        );
    }

    #[test]
    fn test_label_frequencies() {
        let input = records(&["a", "b", "a"]);
        let freq = label_frequencies(&input);
        assert_eq!(freq.get("a"), Some(&2));
        assert_eq!(freq.get("b"), Some(&1));
        assert_eq!(freq.len(), 2);
    }

    #[test]
    fn test_percentage_label() {
        assert_eq!(percentage_label(0, 0), "0.0%");
        assert_eq!(percentage_label(5, 5), "100.0%");
        assert_eq!(percentage_label(1, 8), "12.5%");
        assert_eq!(percentage_label(1, 3), "33.3%");
        assert_eq!(percentage_label(2, 3), "66.7%");
        assert_eq!(percentage_label(1, 5), "20.0%");
        assert_eq!(percentage_label(1, 2000), "0.1%");
        assert_eq!(percentage_label(1, 2001), "0.0%");
    }

    #[test]
    fn test_percentage_label_follows_float_share() {
        // 23/80 * 100 lands just below 28.75 as an f64
        assert_eq!(percentage_label(23, 80), "28.7%");
        assert_eq!(percentage_label(41, 80), "51.2%");
        // 1/400 * 100 is exactly 0.25; ties round up
        assert_eq!(percentage_label(1, 400), "0.3%");
    }

    #[test]
    fn test_group_table_validation() {
        assert_eq!(
            GroupTable::new(vec![], "Other").unwrap_err(),
            GroupingError::NoGroups
        );
        assert_eq!(
            GroupTable::new(vec![GroupDefinition::new("A", &[])], "Other").unwrap_err(),
            GroupingError::UnknownFallback("Other".to_string())
        );
        assert_eq!(
            GroupTable::new(
                vec![GroupDefinition::new("A", &[]), GroupDefinition::new("A", &[])],
                "A"
            )
            .unwrap_err(),
            GroupingError::DuplicateGroup("A".to_string())
        );
        assert_eq!(
            GroupTable::new(vec![GroupDefinition::new("", &[])], "").unwrap_err(),
            GroupingError::EmptyGroupName
        );
    }
}
