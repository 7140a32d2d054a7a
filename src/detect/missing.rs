//! Missing value detection.

use super::{Detector, DetectorId, DetectorResult, ScanContext};
use crate::model::{Cell, IssueType, Severity};

/// Flags null, blank and null-like cells in every column.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValueDetector;

fn is_missing(cell: &Cell) -> bool {
    match cell {
        Cell::Null => true,
        Cell::Text(s) if s.trim().is_empty() => true,
        other => {
            let rendered = other.render();
            ["nan", "none", "null"]
                .iter()
                .any(|word| rendered.eq_ignore_ascii_case(word))
        }
    }
}

impl Detector for MissingValueDetector {
    fn id(&self) -> DetectorId {
        DetectorId::MissingValues
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();
        let total = ctx.total_rows();

        for column in ctx.table.columns() {
            let indices: Vec<usize> = ctx
                .table
                .column_cells(column)
                .filter(|(_, cell)| is_missing(cell))
                .map(|(idx, _)| idx)
                .collect();
            if indices.is_empty() {
                continue;
            }

            let percent = indices.len() as f64 / total as f64 * 100.0;
            issues.push(
                ctx.issue(IssueType::Missing, Severity::from_percent(percent), column)
                    .title(format!("Missing values in {column}"))
                    .description(format!(
                        "Found {} missing/null/empty values in column {column} ({percent:.1}%)",
                        indices.len()
                    ))
                    .examples(vec!["NULL".into(), "empty".into(), String::new()])
                    .expected_format("Non-empty values")
                    .build(&indices, |_| "NULL/Empty".to_string()),
            );
        }

        Ok(issues)
    }
}
