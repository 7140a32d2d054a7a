//! Data quality scoring.
//!
//! Turns the issue list of a scan into seven quality-dimension scores and a
//! weighted overall score.
//!
//! # Usage
//!
//! ```
//! use dq_scan::detect::detect;
//! use dq_scan::model::Table;
//! use dq_scan::quality::QualityScorer;
//!
//! let table = Table::from_column("price", vec![10i64, 12, -5]);
//! let issues = detect(&table, "products");
//! let scores = QualityScorer::new().score(&issues);
//!
//! println!("Overall score: {}/100 ({})", scores.overall_score, scores.grade().letter());
//! ```

mod scorer;

pub use scorer::{
    Dimension, MAX_SCORE, QualityGrade, QualityScorer, QualityScores, deductions,
};
