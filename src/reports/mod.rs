//! Report generation for scan results.
//!
//! - JSON: the machine-readable `{qualityScores, issues, summary}` payload
//! - Summary: compact terminal output with scores, grade and issues by severity

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{ErrorReport, ReportFormat, ScanReport, summary_line};

use crate::error::Result;

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a scan report
    fn generate(&self, report: &ScanReport) -> Result<String>;

    /// Get the output format
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat, pretty: bool, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new().pretty(pretty)),
        ReportFormat::Summary => {
            let reporter = SummaryReporter::new();
            if colored {
                Box::new(reporter)
            } else {
                Box::new(reporter.no_color())
            }
        }
    }
}
