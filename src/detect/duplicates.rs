//! Duplicate row and duplicate key detection.
//!
//! Rows and values are grouped by a hashable [`CellKey`](crate::model::CellKey)
//! so grouping is linear in the table size.

use super::{Detector, DetectorId, DetectorResult, ScanContext};
use crate::model::{ALL_COLUMNS, IssueType, Severity, display_row};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Flags rows whose entire content equals another row's.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateRowDetector;

/// Flags repeated values in identifier-like columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateKeyDetector;

/// Partition of duplicated rows into groups of mutually identical rows.
///
/// Groups are ordered by their first member and every group has at least
/// two rows. `rows` is the ascending union of all groups.
#[derive(Debug, Default)]
struct DuplicateGroups {
    groups: Vec<Vec<usize>>,
    rows: Vec<usize>,
}

fn group_rows<K, I>(keys: I) -> DuplicateGroups
where
    K: std::hash::Hash + Eq,
    I: IntoIterator<Item = (usize, K)>,
{
    let mut by_key: IndexMap<K, Vec<usize>> = IndexMap::new();
    for (idx, key) in keys {
        by_key.entry(key).or_default().push(idx);
    }

    let groups: Vec<Vec<usize>> = by_key.into_values().filter(|g| g.len() > 1).collect();
    let mut rows: Vec<usize> = groups.iter().flatten().copied().collect();
    rows.sort_unstable();
    DuplicateGroups { groups, rows }
}

impl Detector for DuplicateRowDetector {
    fn id(&self) -> DetectorId {
        DetectorId::DuplicateRows
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let table = ctx.table;
        let dupes = group_rows((0..table.row_count()).map(|idx| (idx, table.row_key(idx))));
        if dupes.rows.is_empty() {
            return Ok(Vec::new());
        }

        let display_groups: Vec<Vec<usize>> = dupes
            .groups
            .iter()
            .map(|g| g.iter().map(|&i| display_row(i)).collect())
            .collect();
        let group_of: HashMap<usize, usize> = dupes
            .groups
            .iter()
            .enumerate()
            .flat_map(|(gi, g)| g.iter().map(move |&i| (i, gi)))
            .collect();

        let count = dupes.rows.len();
        let severity = if count > 10 {
            Severity::High
        } else {
            Severity::Medium
        };
        let examples = display_groups
            .iter()
            .take(3)
            .map(|g| format!("Rows {g:?}"))
            .collect();
        let kept_groups = display_groups
            .iter()
            .take(ctx.rules.thresholds.duplicate_group_cap)
            .cloned()
            .collect();

        let issue = ctx
            .issue(IssueType::Duplicate, severity, ALL_COLUMNS)
            .title("Duplicate records detected")
            .description(format!(
                "Found {count} duplicate rows in {} groups",
                display_groups.len()
            ))
            .examples(examples)
            .expected_format("Unique records")
            .duplicate_groups(kept_groups)
            .build(&dupes.rows, |i| {
                group_of
                    .get(&i)
                    .map(|&gi| format!("Duplicate of rows {:?}", display_groups[gi]))
                    .unwrap_or_default()
            });

        Ok(vec![issue])
    }
}

impl Detector for DuplicateKeyDetector {
    fn id(&self) -> DetectorId {
        DetectorId::DuplicateKeys
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in ctx.table.columns() {
            if !ctx.rules.key_columns.matches(column) {
                continue;
            }

            let dupes = group_rows(
                ctx.table
                    .column_cells(column)
                    .filter(|(_, cell)| !cell.is_null())
                    .map(|(idx, cell)| (idx, cell.key())),
            );
            if dupes.rows.is_empty() {
                continue;
            }

            issues.push(
                ctx.issue(IssueType::Duplicate, Severity::High, column)
                    .title(format!("Duplicate values in {column}"))
                    .description(format!(
                        "Found {} duplicate values in {column} (should be unique)",
                        dupes.rows.len()
                    ))
                    .examples(ctx.distinct_examples(column, &dupes.rows))
                    .expected_format("Unique identifier values")
                    .build(&dupes.rows, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}
