//! Rule-based issue detection.
//!
//! The [`DetectionEngine`] runs an ordered list of independent [`Detector`]s
//! over one immutable [`Table`]. Each detector returns its own issue list;
//! the engine concatenates them in run order. A detector that fails is
//! contained: it contributes no issues, the failure is logged and recorded
//! in [`Detection::failures`], and every other detector still runs.

mod contact;
mod dates;
mod duplicates;
mod missing;
mod numeric;
mod placeholder;
mod whitespace;

pub use contact::{InvalidEmailDetector, InvalidPhoneDetector};
pub use dates::{
    DateFormatClass, FutureDateDetector, InconsistentDateFormatDetector, InvalidDateDetector,
    ObsoleteDateDetector, parse_date,
};
pub use duplicates::{DuplicateKeyDetector, DuplicateRowDetector};
pub use missing::MissingValueDetector;
pub use numeric::{
    NegativeValueDetector, OutlierDetector, ReferentialIntegrityDetector, TypeMismatchDetector,
    quartiles,
};
pub use placeholder::PlaceholderDetector;
pub use whitespace::WhitespaceDetector;

use crate::error::Result;
use crate::model::{Issue, IssueBuilder, IssueType, Severity, Table};
use crate::rules::{CompiledRules, RuleSet};
use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Detector identity
// ============================================================================

/// Stable identifier of a detector, in run order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorId {
    MissingValues,
    PlaceholderValues,
    DuplicateRows,
    DuplicateKeys,
    InvalidEmail,
    InvalidPhone,
    InvalidDate,
    FutureDate,
    ObsoleteDate,
    NegativeValues,
    StatisticalOutliers,
    Whitespace,
    InconsistentDateFormat,
    ReferentialIntegrity,
    TypeMismatch,
}

impl DetectorId {
    /// Every detector in its fixed run order.
    pub const ALL: [Self; 15] = [
        Self::MissingValues,
        Self::PlaceholderValues,
        Self::DuplicateRows,
        Self::DuplicateKeys,
        Self::InvalidEmail,
        Self::InvalidPhone,
        Self::InvalidDate,
        Self::FutureDate,
        Self::ObsoleteDate,
        Self::NegativeValues,
        Self::StatisticalOutliers,
        Self::Whitespace,
        Self::InconsistentDateFormat,
        Self::ReferentialIntegrity,
        Self::TypeMismatch,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingValues => "missing-values",
            Self::PlaceholderValues => "placeholder-values",
            Self::DuplicateRows => "duplicate-rows",
            Self::DuplicateKeys => "duplicate-keys",
            Self::InvalidEmail => "invalid-email",
            Self::InvalidPhone => "invalid-phone",
            Self::InvalidDate => "invalid-date",
            Self::FutureDate => "future-date",
            Self::ObsoleteDate => "obsolete-date",
            Self::NegativeValues => "negative-values",
            Self::StatisticalOutliers => "statistical-outliers",
            Self::Whitespace => "whitespace",
            Self::InconsistentDateFormat => "inconsistent-date-format",
            Self::ReferentialIntegrity => "referential-integrity",
            Self::TypeMismatch => "type-mismatch",
        }
    }

    /// Build the detector this identifier names.
    #[must_use]
    pub fn detector(self) -> Box<dyn Detector> {
        match self {
            Self::MissingValues => Box::new(MissingValueDetector),
            Self::PlaceholderValues => Box::new(PlaceholderDetector),
            Self::DuplicateRows => Box::new(DuplicateRowDetector),
            Self::DuplicateKeys => Box::new(DuplicateKeyDetector),
            Self::InvalidEmail => Box::new(InvalidEmailDetector),
            Self::InvalidPhone => Box::new(InvalidPhoneDetector),
            Self::InvalidDate => Box::new(InvalidDateDetector),
            Self::FutureDate => Box::new(FutureDateDetector),
            Self::ObsoleteDate => Box::new(ObsoleteDateDetector),
            Self::NegativeValues => Box::new(NegativeValueDetector),
            Self::StatisticalOutliers => Box::new(OutlierDetector),
            Self::Whitespace => Box::new(WhitespaceDetector),
            Self::InconsistentDateFormat => Box::new(InconsistentDateFormatDetector),
            Self::ReferentialIntegrity => Box::new(ReferentialIntegrityDetector),
            Self::TypeMismatch => Box::new(TypeMismatchDetector),
        }
    }
}

impl fmt::Display for DetectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Detector contract
// ============================================================================

/// Fault raised inside a single detector.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DetectorError {
    #[error("non-finite statistic for column '{column}': {statistic}")]
    NonFiniteStatistic { column: String, statistic: String },

    #[error("reference time {now} cannot be shifted back {years} years")]
    ClockOutOfRange { now: DateTime<Utc>, years: u32 },
}

/// Outcome of one detector run.
pub type DetectorResult = std::result::Result<Vec<Issue>, DetectorError>;

/// Everything a detector may read during a scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub table: &'a Table,
    pub table_name: &'a str,
    pub rules: &'a CompiledRules,
    /// Reference time for date recency checks
    pub now: DateTime<Utc>,
}

impl<'a> ScanContext<'a> {
    #[must_use]
    pub const fn new(
        table: &'a Table,
        table_name: &'a str,
        rules: &'a CompiledRules,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            table,
            table_name,
            rules,
            now,
        }
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.table.row_count()
    }

    /// Start an issue on `column`, sized against this table.
    pub fn issue(
        &self,
        issue_type: IssueType,
        severity: Severity,
        column: impl Into<String>,
    ) -> IssueBuilder {
        Issue::builder(issue_type, severity, column, self.total_rows())
            .location_cap(self.rules.thresholds.location_cap)
    }

    /// Rendered values of the first few affected rows.
    #[must_use]
    pub fn examples(&self, column: &str, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .take(self.rules.thresholds.example_cap)
            .map(|&i| self.table.cell(i, column).render())
            .collect()
    }

    /// Distinct rendered values of the affected rows, first-seen order.
    #[must_use]
    pub fn distinct_examples(&self, column: &str, indices: &[usize]) -> Vec<String> {
        let mut seen = IndexSet::new();
        for &i in indices {
            if seen.len() >= self.rules.thresholds.example_cap {
                break;
            }
            seen.insert(self.table.cell(i, column).render());
        }
        seen.into_iter().collect()
    }

    /// Render the cell at `(row, column)`.
    #[must_use]
    pub fn render(&self, row: usize, column: &str) -> String {
        self.table.cell(row, column).render()
    }
}

/// A single independent issue detector.
///
/// Detectors read the table through the [`ScanContext`] and never observe
/// each other's output.
pub trait Detector: Send + Sync {
    /// Stable identifier of this detector.
    fn id(&self) -> DetectorId;

    /// Scan the table and return the issues found.
    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult;
}

// ============================================================================
// Engine
// ============================================================================

/// A detector that failed during a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorFailure {
    pub detector: DetectorId,
    pub reason: String,
}

/// Result of running every enabled detector over a table.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Issues in detector run order
    pub issues: Vec<Issue>,
    /// Detectors that failed and contributed nothing
    pub failures: Vec<DetectorFailure>,
}

/// Ordered set of detectors sharing one compiled rule set.
pub struct DetectionEngine {
    rules: CompiledRules,
    detectors: Vec<Box<dyn Detector>>,
    now: Option<DateTime<Utc>>,
}

impl DetectionEngine {
    /// Engine running every detector in the fixed order.
    #[must_use]
    pub fn new(rules: CompiledRules) -> Self {
        Self {
            rules,
            detectors: DetectorId::ALL.iter().map(|id| id.detector()).collect(),
            now: None,
        }
    }

    /// Engine built from an uncompiled rule set.
    pub fn from_rules(rules: &RuleSet) -> Result<Self> {
        Ok(Self::new(rules.compile()?))
    }

    /// Skip the given detectors.
    #[must_use]
    pub fn without(mut self, disabled: &[DetectorId]) -> Self {
        self.detectors.retain(|d| !disabled.contains(&d.id()));
        self
    }

    /// Pin the reference time instead of reading the system clock.
    #[must_use]
    pub const fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Identifiers of the enabled detectors, in run order.
    pub fn detector_ids(&self) -> impl Iterator<Item = DetectorId> + '_ {
        self.detectors.iter().map(|d| d.id())
    }

    #[must_use]
    pub const fn rules(&self) -> &CompiledRules {
        &self.rules
    }

    /// Run every enabled detector over `table`.
    pub fn run(&self, table: &Table, table_name: &str) -> Detection {
        let now = self.now.unwrap_or_else(Utc::now);
        let ctx = ScanContext::new(table, table_name, &self.rules, now);
        let mut detection = Detection::default();

        tracing::info!(
            table = table_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "Scanning table"
        );

        if table.is_empty() {
            return detection;
        }

        for detector in &self.detectors {
            match detector.detect(&ctx) {
                Ok(issues) => {
                    tracing::debug!(detector = %detector.id(), issues = issues.len(), "Detector finished");
                    detection.issues.extend(issues);
                }
                Err(err) => {
                    tracing::warn!(detector = %detector.id(), error = %err, "Detector failed, skipping");
                    detection.failures.push(DetectorFailure {
                        detector: detector.id(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            issues = detection.issues.len(),
            failures = detection.failures.len(),
            "Detection complete"
        );
        detection
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new(CompiledRules::default())
    }
}

impl fmt::Debug for DetectionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionEngine")
            .field("detectors", &self.detector_ids().collect::<Vec<_>>())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// Run every detector with the built-in rules.
#[must_use]
pub fn detect(table: &Table, table_name: &str) -> Vec<Issue> {
    DetectionEngine::default().run(table, table_name).issues
}


#[cfg(test)]
mod tests {
    use super::test_support::fixed_now;
    use super::*;
    use crate::model::Cell;

    struct Failing;

    impl Detector for Failing {
        fn id(&self) -> DetectorId {
            DetectorId::StatisticalOutliers
        }

        fn detect(&self, _ctx: &ScanContext<'_>) -> DetectorResult {
            Err(DetectorError::NonFiniteStatistic {
                column: "x".to_string(),
                statistic: "Q1".to_string(),
            })
        }
    }

    #[test]
    fn test_detector_ids_in_run_order() {
        let engine = DetectionEngine::default();
        let ids: Vec<DetectorId> = engine.detector_ids().collect();
        assert_eq!(ids, DetectorId::ALL.to_vec());
        for id in DetectorId::ALL {
            assert_eq!(id.detector().id(), id);
        }
    }

    #[test]
    fn test_detector_id_serde_names() {
        let json = serde_json::to_string(&DetectorId::InconsistentDateFormat).unwrap();
        assert_eq!(json, "\"inconsistent-date-format\"");
        assert_eq!(DetectorId::TypeMismatch.to_string(), "type-mismatch");
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        let detection = DetectionEngine::default().run(&Table::default(), "empty");
        assert!(detection.issues.is_empty());
        assert!(detection.failures.is_empty());
    }

    #[test]
    fn test_failing_detector_is_contained() {
        let mut engine = DetectionEngine::default()
            .with_clock(fixed_now())
            .without(&DetectorId::ALL);
        engine.detectors.push(Box::new(Failing));
        engine.detectors.push(DetectorId::MissingValues.detector());

        let table = Table::from_column("x", vec![Cell::Null, Cell::Int(1)]);
        let detection = engine.run(&table, "t");

        assert_eq!(detection.failures.len(), 1);
        assert_eq!(detection.failures[0].detector, DetectorId::StatisticalOutliers);
        assert_eq!(detection.issues.len(), 1);
        assert_eq!(detection.issues[0].issue_type, IssueType::Missing);
    }

    #[test]
    fn test_disabled_detectors_are_skipped() {
        let table = Table::from_column("email", vec![Cell::text("nope"), Cell::Null]);
        let engine = DetectionEngine::default()
            .with_clock(fixed_now())
            .without(&[DetectorId::MissingValues]);
        let issues = engine.run(&table, "t").issues;
        assert!(issues.iter().all(|i| i.issue_type != IssueType::Missing));
        assert!(issues.iter().any(|i| i.title.contains("email")));
    }
}
