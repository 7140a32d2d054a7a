//! Quality dimension scorer.
//!
//! Aggregates a list of detected issues into seven dimension scores and a
//! weighted overall score. Scoring is a pure sum of per-issue deductions, so
//! the result does not depend on issue order.

use crate::model::{Issue, IssueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score every dimension starts from.
pub const MAX_SCORE: f64 = 100.0;

/// Named quality axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Accuracy,
    Completeness,
    Consistency,
    Uniqueness,
    Validity,
    Timeliness,
    Integrity,
}

impl Dimension {
    /// All dimensions in report order.
    pub const ALL: [Self; 7] = [
        Self::Accuracy,
        Self::Completeness,
        Self::Consistency,
        Self::Uniqueness,
        Self::Validity,
        Self::Timeliness,
        Self::Integrity,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Completeness => "completeness",
            Self::Consistency => "consistency",
            Self::Uniqueness => "uniqueness",
            Self::Validity => "validity",
            Self::Timeliness => "timeliness",
            Self::Integrity => "integrity",
        }
    }

    /// Weight of this dimension in the overall score.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Accuracy | Self::Completeness | Self::Validity => 0.20,
            Self::Consistency => 0.15,
            Self::Uniqueness | Self::Integrity => 0.10,
            Self::Timeliness => 0.05,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dimensions an issue type deducts from, with their multipliers.
#[must_use]
pub const fn deductions(issue_type: IssueType) -> &'static [(Dimension, f64)] {
    match issue_type {
        IssueType::Missing => &[(Dimension::Completeness, 0.5)],
        IssueType::Invalid => &[(Dimension::Validity, 0.3), (Dimension::Accuracy, 0.2)],
        IssueType::Duplicate => &[(Dimension::Uniqueness, 0.5)],
        IssueType::Inconsistent => &[(Dimension::Consistency, 0.3)],
        IssueType::Outlier => &[(Dimension::Accuracy, 0.1)],
        IssueType::Obsolete => &[(Dimension::Timeliness, 0.3)],
        IssueType::ReferentialIntegrity => &[(Dimension::Integrity, 0.4)],
    }
}

/// Quality grade based on the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityGrade {
    /// Excellent: 90-100
    A,
    /// Good: 80-89
    B,
    /// Fair: 70-79
    C,
    /// Poor: 60-69
    D,
    /// Failing: <60
    F,
}

impl QualityGrade {
    /// Create grade from score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// Get grade letter
    #[must_use]
    pub const fn letter(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Get grade description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Good",
            Self::C => "Fair",
            Self::D => "Poor",
            Self::F => "Failing",
        }
    }
}

/// Dimension scores (0-100, one decimal) and the weighted overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScores {
    pub accuracy: f64,
    pub completeness: f64,
    pub consistency: f64,
    pub uniqueness: f64,
    pub validity: f64,
    pub timeliness: f64,
    pub integrity: f64,
    pub overall_score: f64,
}

impl Default for QualityScores {
    fn default() -> Self {
        Self {
            accuracy: MAX_SCORE,
            completeness: MAX_SCORE,
            consistency: MAX_SCORE,
            uniqueness: MAX_SCORE,
            validity: MAX_SCORE,
            timeliness: MAX_SCORE,
            integrity: MAX_SCORE,
            overall_score: MAX_SCORE,
        }
    }
}

impl QualityScores {
    /// Score of one dimension.
    #[must_use]
    pub const fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Accuracy => self.accuracy,
            Dimension::Completeness => self.completeness,
            Dimension::Consistency => self.consistency,
            Dimension::Uniqueness => self.uniqueness,
            Dimension::Validity => self.validity,
            Dimension::Timeliness => self.timeliness,
            Dimension::Integrity => self.integrity,
        }
    }

    const fn get_mut(&mut self, dimension: Dimension) -> &mut f64 {
        match dimension {
            Dimension::Accuracy => &mut self.accuracy,
            Dimension::Completeness => &mut self.completeness,
            Dimension::Consistency => &mut self.consistency,
            Dimension::Uniqueness => &mut self.uniqueness,
            Dimension::Validity => &mut self.validity,
            Dimension::Timeliness => &mut self.timeliness,
            Dimension::Integrity => &mut self.integrity,
        }
    }

    /// Letter grade of the overall score.
    #[must_use]
    pub fn grade(&self) -> QualityGrade {
        QualityGrade::from_score(self.overall_score)
    }
}

/// Quality scorer over a fixed deduction table and fixed weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Score a list of issues.
    ///
    /// Impacts carry one decimal and multipliers and weights are exact
    /// decimals, so deductions are summed as integers and rounded once.
    #[must_use]
    pub fn score(&self, issues: &[Issue]) -> QualityScores {
        let mut deducted = [0i64; Dimension::ALL.len()];

        for issue in issues {
            let impact = to_fixed(issue.impact_score.clamp(0.0, MAX_SCORE), 10.0);
            for &(dimension, multiplier) in deductions(issue.issue_type) {
                deducted[dimension as usize] += impact * to_fixed(multiplier, 10.0);
            }
        }

        // Dimension scores in tenths, overall in thousandths
        let mut scores = QualityScores::default();
        let mut overall = 0i64;
        for dimension in Dimension::ALL {
            let hundredths = (to_fixed(MAX_SCORE, 100.0) - deducted[dimension as usize]).max(0);
            let tenths = round_div(hundredths, 10);
            *scores.get_mut(dimension) = tenths as f64 / 10.0;
            overall += tenths * to_fixed(dimension.weight(), 100.0);
        }
        scores.overall_score = round_div(overall, 100) as f64 / 10.0;

        tracing::debug!(
            overall = scores.overall_score,
            issues = issues.len(),
            "Quality scores computed"
        );
        scores
    }
}

/// `value` scaled by `scale` and rounded to an integer.
fn to_fixed(value: f64, scale: f64) -> i64 {
    (value * scale).round() as i64
}

/// Non-negative integer division rounding half up.
const fn round_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}
