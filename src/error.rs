//! Unified error types for dq-scan.
//!
//! Detector-local faults never surface here; they are contained by the
//! detection engine. These errors describe failures of the scan as a whole.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dq-scan operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DqError {
    /// The input payload is missing, empty or malformed
    #[error("{}", with_context(.context, .source))]
    Input {
        context: String,
        #[source]
        source: InputErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific input error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InputErrorKind {
    #[error("No data provided")]
    NoData,

    #[error("Empty data")]
    EmptyData,

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),
}

fn with_context(context: &str, source: &InputErrorKind) -> String {
    if context.is_empty() {
        source.to_string()
    } else {
        format!("{context}: {source}")
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for dq-scan operations
pub type Result<T> = std::result::Result<T, DqError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DqError {
    /// Create an input error with context
    pub fn input(context: impl Into<String>, source: InputErrorKind) -> Self {
        Self::Input {
            context: context.into(),
            source,
        }
    }

    /// Input stream was empty
    #[must_use]
    pub fn no_data() -> Self {
        Self::input("", InputErrorKind::NoData)
    }

    /// Payload carried no records
    #[must_use]
    pub fn empty_data() -> Self {
        Self::input("", InputErrorKind::EmptyData)
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Whether the error was caused by the caller's payload.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Input { .. })
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for DqError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DqError {
    fn from(err: serde_json::Error) -> Self {
        Self::input("", InputErrorKind::InvalidJson(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// chain of calls reads outermost first.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<DqError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: DqError, new_ctx: &str) -> DqError {
    match err {
        DqError::Input {
            context: existing,
            source,
        } => DqError::Input {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DqError::Report {
            context: existing,
            source,
        } => DqError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DqError::Io {
            path,
            message,
            source,
        } => DqError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        DqError::Config(msg) => DqError::Config(chain_context(new_ctx, &msg)),
        DqError::Validation(msg) => DqError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
