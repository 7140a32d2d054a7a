//! Detected data quality issues.

use super::table::display_row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column label used for row-level issues.
pub const ALL_COLUMNS: &str = "all";

/// Class of defect an issue describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Missing,
    Invalid,
    Duplicate,
    Inconsistent,
    Outlier,
    Obsolete,
    ReferentialIntegrity,
}

impl IssueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Invalid => "invalid",
            Self::Duplicate => "duplicate",
            Self::Inconsistent => "inconsistent",
            Self::Outlier => "outlier",
            Self::Obsolete => "obsolete",
            Self::ReferentialIntegrity => "referential_integrity",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Severity for a share of affected rows, in percent.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent > 50.0 {
            Self::Critical
        } else if percent > 25.0 {
            Self::High
        } else if percent > 10.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact cell location of an offending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based display row
    pub row: usize,
    pub column: String,
    pub value: String,
}

/// A detected data quality defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    /// Column name, or `all` for row-level issues
    pub column: String,
    pub title: String,
    pub description: String,
    /// Number of affected rows
    pub record_count: usize,
    /// Affected share of the table in percent, one decimal
    pub impact_score: f64,
    /// 1-based display rows; capped only for date recency issues
    pub affected_rows: Vec<usize>,
    pub total_affected_rows: usize,
    pub example_bad_values: Vec<String>,
    pub expected_format: String,
    /// Prefix of `affected_rows` with the offending values
    pub exact_locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_groups: Option<Vec<Vec<usize>>>,
}

impl Issue {
    /// Start building an issue for a table with `total_rows` rows.
    pub fn builder(
        issue_type: IssueType,
        severity: Severity,
        column: impl Into<String>,
        total_rows: usize,
    ) -> IssueBuilder {
        IssueBuilder::new(issue_type, severity, column, total_rows)
    }

    /// Whether `affected_rows` was truncated below `record_count`.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.affected_rows.len() < self.record_count
    }
}

/// Round to one decimal place, half away from zero.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of `total` that `count` represents, rounded to one decimal.
#[must_use]
pub fn impact_score(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to_tenth(count as f64 / total as f64 * 100.0)
}

/// Builder that derives the row-location fields of an [`Issue`].
#[derive(Debug)]
#[must_use]
pub struct IssueBuilder {
    issue_type: IssueType,
    severity: Severity,
    column: String,
    total_rows: usize,
    title: String,
    description: String,
    examples: Vec<String>,
    expected_format: String,
    row_cap: Option<usize>,
    location_cap: usize,
    duplicate_groups: Option<Vec<Vec<usize>>>,
}

impl IssueBuilder {
    /// Default number of exact locations kept per issue.
    pub const DEFAULT_LOCATION_CAP: usize = 20;

    fn new(
        issue_type: IssueType,
        severity: Severity,
        column: impl Into<String>,
        total_rows: usize,
    ) -> Self {
        Self {
            issue_type,
            severity,
            column: column.into(),
            total_rows,
            title: String::new(),
            description: String::new(),
            examples: Vec::new(),
            expected_format: String::new(),
            row_cap: None,
            location_cap: Self::DEFAULT_LOCATION_CAP,
            duplicate_groups: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn examples(mut self, examples: Vec<String>) -> Self {
        self.examples = examples;
        self
    }

    pub fn expected_format(mut self, expected: impl Into<String>) -> Self {
        self.expected_format = expected.into();
        self
    }

    /// Truncate `affected_rows` to at most `cap` entries.
    pub const fn row_cap(mut self, cap: usize) -> Self {
        self.row_cap = Some(cap);
        self
    }

    pub const fn location_cap(mut self, cap: usize) -> Self {
        self.location_cap = cap;
        self
    }

    /// Attach groups of mutually identical rows (already 1-based).
    pub fn duplicate_groups(mut self, groups: Vec<Vec<usize>>) -> Self {
        self.duplicate_groups = Some(groups);
        self
    }

    /// Finish the issue for the given 0-based row indices.
    ///
    /// `location_value` renders the offending value at a row index; it is
    /// called only for the rows kept in `exact_locations`.
    pub fn build<F>(self, indices: &[usize], location_value: F) -> Issue
    where
        F: Fn(usize) -> String,
    {
        let record_count = indices.len();
        let kept = self.row_cap.map_or(record_count, |cap| cap.min(record_count));
        let affected_rows: Vec<usize> = indices[..kept].iter().map(|&i| display_row(i)).collect();
        let exact_locations = indices
            .iter()
            .take(self.location_cap.min(kept))
            .map(|&i| Location {
                row: display_row(i),
                column: self.column.clone(),
                value: location_value(i),
            })
            .collect();

        Issue {
            issue_type: self.issue_type,
            severity: self.severity,
            column: self.column,
            title: self.title,
            description: self.description,
            record_count,
            impact_score: impact_score(record_count, self.total_rows),
            affected_rows,
            total_affected_rows: record_count,
            example_bad_values: self.examples,
            expected_format: self.expected_format,
            exact_locations,
            duplicate_groups: self.duplicate_groups,
        }
    }
}
