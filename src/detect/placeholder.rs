//! Placeholder value detection.

use super::{Detector, DetectorId, DetectorResult, ScanContext};
use crate::model::{ColumnKind, IssueType, Severity};

/// Flags sentinel strings such as `N/A` or `TBD` in text columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderDetector;

impl Detector for PlaceholderDetector {
    fn id(&self) -> DetectorId {
        DetectorId::PlaceholderValues
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();
        if ctx.rules.placeholder.is_none() {
            return Ok(issues);
        }

        for column in ctx.table.columns() {
            if ctx.table.column_kind(column) != ColumnKind::Text {
                continue;
            }

            let indices: Vec<usize> = ctx
                .table
                .column_cells(column)
                .filter(|(_, cell)| !cell.is_null() && ctx.rules.is_placeholder(&cell.render()))
                .map(|(idx, _)| idx)
                .collect();
            if indices.is_empty() {
                continue;
            }

            let examples = ctx.distinct_examples(column, &indices);
            let preview = examples
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");

            issues.push(
                ctx.issue(IssueType::Invalid, Severity::High, column)
                    .title(format!("Invalid placeholder values in {column}"))
                    .description(format!(
                        "Found {} placeholder/invalid values like {preview}",
                        indices.len()
                    ))
                    .examples(examples)
                    .expected_format("Valid data values (no placeholders)")
                    .build(&indices, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}
