//! **Data-quality issue detection and scoring for tabular records.**
//!
//! `dq-scan` takes a table (a list of records mapping column names to scalar
//! values), runs a fixed battery of heuristic detectors over it, and turns
//! the detected issues into seven quality-dimension scores plus a weighted
//! overall score.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the immutable [`Table`](model::Table) and the
//!   [`Issue`](model::Issue) records the detectors produce.
//! - **[`rules`]**: every heuristic vocabulary and threshold, loadable from
//!   YAML and compiled once into [`CompiledRules`](rules::CompiledRules).
//! - **[`detect`]**: the fifteen detectors and the
//!   [`DetectionEngine`](detect::DetectionEngine) that runs them in order.
//! - **[`quality`]**: the [`QualityScorer`](quality::QualityScorer) that maps
//!   issues to dimension scores.
//! - **[`reports`]**: JSON and terminal summary renderers.
//! - **[`pipeline`]**: read → detect → score → report plumbing shared by
//!   the CLI.
//! - **[`config`]**: YAML configuration discovery, merging and validation.
//!
//! ## Getting Started
//!
//! ```
//! use dq_scan::detect::DetectionEngine;
//! use dq_scan::pipeline::scan_payload;
//!
//! let raw = r#"{"data": [{"email": "a@b.com"}, {"email": "nope"}], "tableName": "users"}"#;
//! let report = scan_payload(&DetectionEngine::default(), raw).unwrap();
//!
//! assert_eq!(report.issues.len(), 1);
//! println!("{}", report.summary);
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Row counts and percentages move between usize and f64 throughout scoring
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod quality;
pub mod reports;
pub mod rules;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use detect::{DetectionEngine, Detector, DetectorId, detect};
pub use error::{DqError, ErrorContext, Result};
pub use model::{Cell, Issue, IssueType, Severity, Table};
pub use quality::{QualityGrade, QualityScorer, QualityScores};
pub use reports::{ReportFormat, ReportGenerator, ScanReport};
pub use rules::{CompiledRules, RuleSet};
