//! JSON report generator.

use super::{ErrorReport, ReportFormat, ReportGenerator, ScanReport};
use crate::error::{DqError, ReportErrorKind, Result};
use serde::Serialize;

/// JSON report generator
#[derive(Debug, Clone, Copy)]
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter (compact output)
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Render the failure payload.
    pub fn generate_error(&self, report: &ErrorReport) -> Result<String> {
        self.to_json(report)
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(|e| {
            DqError::report(
                "serializing scan report",
                ReportErrorKind::JsonSerializationError(e.to_string()),
            )
        })
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &ScanReport) -> Result<String> {
        self.to_json(report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
