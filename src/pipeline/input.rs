//! Scan payload input.
//!
//! The payload is one JSON document `{"data": [...], "tableName": "..."}`
//! read from stdin or a file.

use crate::error::{DqError, ErrorContext, Result};
use crate::model::{Record, Table};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Table name used when the payload does not carry one.
pub const DEFAULT_TABLE_NAME: &str = "Unknown";

/// Parsed scan payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    #[serde(default)]
    pub data: Option<Vec<Record>>,
    #[serde(default)]
    pub table_name: Option<String>,
}

impl ScanRequest {
    /// Parse a payload document.
    ///
    /// Blank input is [`NoData`](crate::error::InputErrorKind::NoData); a
    /// missing, null or empty `data` array is
    /// [`EmptyData`](crate::error::InputErrorKind::EmptyData).
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(DqError::no_data());
        }
        let request: Self = serde_json::from_str(raw)?;
        if request.data.as_ref().is_none_or(Vec::is_empty) {
            return Err(DqError::empty_data());
        }
        Ok(request)
    }

    /// Table name, falling back to [`DEFAULT_TABLE_NAME`].
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.table_name.as_deref().unwrap_or(DEFAULT_TABLE_NAME)
    }

    /// Consume the request into the table and its name.
    #[must_use]
    pub fn into_table(self) -> (Table, String) {
        let name = self
            .table_name
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        (Table::new(self.data.unwrap_or_default()), name)
    }
}

/// Read the raw payload from a file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            tracing::debug!("Reading payload from {}", path.display());
            std::fs::read_to_string(path).map_err(|e| DqError::io(path, e))
        }
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading payload from stdin")?;
            Ok(raw)
        }
    }
}
