//! Report type definitions.

use crate::detect::DetectorFailure;
use crate::model::{Issue, Table};
use crate::quality::QualityScores;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Machine-readable JSON payload
    #[default]
    Json,
    /// Human-readable terminal summary
    Summary,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Result of scanning one table.
///
/// Serializes to exactly `{qualityScores, issues, summary}`; the remaining
/// fields feed the terminal summary only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub quality_scores: QualityScores,
    pub issues: Vec<Issue>,
    pub summary: String,
    #[serde(skip)]
    pub table_name: String,
    #[serde(skip)]
    pub row_count: usize,
    #[serde(skip)]
    pub column_count: usize,
    #[serde(skip)]
    pub failures: Vec<DetectorFailure>,
}

impl ScanReport {
    /// Assemble a report for a scanned table.
    #[must_use]
    pub fn new(
        table: &Table,
        table_name: impl Into<String>,
        issues: Vec<Issue>,
        quality_scores: QualityScores,
    ) -> Self {
        let summary = summary_line(issues.len(), table.column_count(), table.row_count());
        Self {
            quality_scores,
            issues,
            summary,
            table_name: table_name.into(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            failures: Vec::new(),
        }
    }

    /// Attach the detectors that failed during the scan.
    #[must_use]
    pub fn with_failures(mut self, failures: Vec<DetectorFailure>) -> Self {
        self.failures = failures;
        self
    }
}

/// One-line description of a scan.
#[must_use]
pub fn summary_line(issues: usize, columns: usize, rows: usize) -> String {
    format!("Detected {issues} data quality issues across {columns} columns and {rows} rows")
}

/// Failure payload written in place of a [`ScanReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
