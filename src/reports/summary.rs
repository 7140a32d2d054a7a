//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportFormat, ReportGenerator, ScanReport};
use crate::error::Result;
use crate::model::Severity;
use crate::quality::Dimension;

/// Issues listed per severity before eliding the rest.
const MAX_ISSUES_PER_SEVERITY: usize = 10;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "red",
        Severity::Medium => "yellow",
        Severity::Low => "dim",
    }
}

fn score_color(score: f64) -> &'static str {
    if score >= 90.0 {
        "green"
    } else if score >= 70.0 {
        "yellow"
    } else {
        "red"
    }
}

/// Summary reporter for shell output
#[derive(Debug, Clone, Copy)]
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(&self, report: &ScanReport) -> Result<String> {
        let mut lines = Vec::new();
        let scores = &report.quality_scores;
        let grade = scores.grade();

        // Header
        lines.push(self.color("Data Quality Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {} ({} rows × {} columns)",
            self.color("Table:", "cyan"),
            report.table_name,
            report.row_count,
            report.column_count
        ));
        lines.push(format!(
            "{}  {} {}",
            self.color("Score:", "cyan"),
            self.color(
                &format!("{:.1}/100", scores.overall_score),
                score_color(scores.overall_score)
            ),
            self.color(
                &format!("(Grade {}: {})", grade.letter(), grade.description()),
                "dim"
            )
        ));
        lines.push(String::new());

        // Dimensions
        lines.push(self.color("Dimensions:", "bold"));
        for dimension in Dimension::ALL {
            let value = scores.get(dimension);
            lines.push(format!(
                "  {:<14} {}",
                dimension.name(),
                self.color(&format!("{value:>5.1}"), score_color(value))
            ));
        }
        lines.push(String::new());

        // Issues by severity
        lines.push(self.color(&format!("Issues ({}):", report.issues.len()), "bold"));
        if report.issues.is_empty() {
            lines.push(format!("  {}", self.color("No issues found", "green")));
        }
        for severity in [Severity::Critical, Severity::High, Severity::Medium, Severity::Low] {
            let matching: Vec<_> = report
                .issues
                .iter()
                .filter(|issue| issue.severity == severity)
                .collect();
            if matching.is_empty() {
                continue;
            }

            lines.push(format!(
                "  {} {}",
                self.color(&severity.as_str().to_uppercase(), severity_color(severity)),
                self.color(&format!("({})", matching.len()), "dim")
            ));
            for issue in matching.iter().take(MAX_ISSUES_PER_SEVERITY) {
                lines.push(format!(
                    "    • {} {}",
                    issue.title,
                    self.color(
                        &format!("[{} rows, {:.1}%]", issue.record_count, issue.impact_score),
                        "dim"
                    )
                ));
            }
            if matching.len() > MAX_ISSUES_PER_SEVERITY {
                lines.push(format!(
                    "    {}",
                    self.color(
                        &format!("… and {} more", matching.len() - MAX_ISSUES_PER_SEVERITY),
                        "dim"
                    )
                ));
            }
        }

        // Detector failures
        if !report.failures.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Skipped detectors:", "bold"));
            for failure in &report.failures {
                lines.push(format!(
                    "  {} {}",
                    self.color(failure.detector.as_str(), "yellow"),
                    failure.reason
                ));
            }
        }

        lines.push(String::new());
        lines.push(self.color(&report.summary, "dim"));

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
