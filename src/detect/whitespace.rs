//! Whitespace hygiene in text columns.

use super::{Detector, DetectorId, DetectorResult, ScanContext};
use crate::model::{Cell, ColumnKind, IssueType, Severity};

/// Flags text with leading/trailing whitespace or double spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceDetector;

fn has_whitespace_issue(cell: &Cell) -> bool {
    cell.as_text()
        .is_some_and(|s| s != s.trim() || s.contains("  "))
}

fn quoted(cell: &Cell) -> String {
    format!("\"{cell}\"")
}

impl Detector for WhitespaceDetector {
    fn id(&self) -> DetectorId {
        DetectorId::Whitespace
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in ctx.table.columns() {
            if ctx.table.column_kind(column) != ColumnKind::Text {
                continue;
            }

            let indices: Vec<usize> = ctx
                .table
                .column_cells(column)
                .filter(|(_, cell)| has_whitespace_issue(cell))
                .map(|(idx, _)| idx)
                .collect();
            if indices.len() <= ctx.rules.thresholds.whitespace_min_count {
                continue;
            }

            let examples = indices
                .iter()
                .take(ctx.rules.thresholds.example_cap)
                .map(|&i| quoted(ctx.table.cell(i, column)))
                .collect();

            issues.push(
                ctx.issue(IssueType::Inconsistent, Severity::Low, column)
                    .title(format!("Whitespace issues in {column}"))
                    .description(format!(
                        "Found {} values with leading/trailing spaces or excessive spacing",
                        indices.len()
                    ))
                    .examples(examples)
                    .expected_format("Trimmed text without extra spaces")
                    .build(&indices, |i| quoted(ctx.table.cell(i, column))),
            );
        }

        Ok(issues)
    }
}
