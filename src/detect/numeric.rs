//! Numeric detectors: sign, range, spread and type checks.

use super::{Detector, DetectorError, DetectorId, DetectorResult, ScanContext};
use crate::model::{ColumnKind, Issue, IssueType, Severity};

/// Flags negative numbers in columns that count or price things.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeValueDetector;

/// Flags values beyond the IQR fences of a numeric column.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierDetector;

/// Flags foreign-key-shaped values outside the plausible id range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferentialIntegrityDetector;

/// Flags non-numeric values in columns whose names imply numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMismatchDetector;

impl Detector for NegativeValueDetector {
    fn id(&self) -> DetectorId {
        DetectorId::NegativeValues
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in ctx.table.columns() {
            if !ctx.rules.non_negative_columns.matches(column) {
                continue;
            }

            let indices: Vec<usize> = ctx
                .table
                .column_cells(column)
                .filter(|(_, cell)| cell.as_number().is_some_and(|n| n < 0.0))
                .map(|(idx, _)| idx)
                .collect();
            if indices.is_empty() {
                continue;
            }

            issues.push(
                ctx.issue(IssueType::Invalid, Severity::High, column)
                    .title(format!("Negative values in {column}"))
                    .description(format!(
                        "Found {} negative values where they should be positive/zero",
                        indices.len()
                    ))
                    .examples(ctx.examples(column, &indices))
                    .expected_format("Positive or zero values")
                    .build(&indices, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}

/// First and third quartiles by linear interpolation between order
/// statistics. Returns `None` for an empty slice.
///
/// `sorted` must be in ascending order.
#[must_use]
pub fn quartiles(sorted: &[f64]) -> Option<(f64, f64)> {
    if sorted.is_empty() {
        return None;
    }
    Some((quantile(sorted, 0.25), quantile(sorted, 0.75)))
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

impl OutlierDetector {
    /// Outlier issue for one numeric column, if any.
    ///
    /// A non-finite quartile or fence is a fault for this column only.
    fn scan_column(
        ctx: &ScanContext<'_>,
        column: &str,
    ) -> Result<Option<Issue>, DetectorError> {
        let thresholds = &ctx.rules.thresholds;
        if ctx.table.column_kind(column) != ColumnKind::Numeric
            || ctx.table.non_null_count(column) <= thresholds.outlier_min_values
        {
            return Ok(None);
        }

        let values: Vec<(usize, f64)> = ctx
            .table
            .column_cells(column)
            .filter_map(|(idx, cell)| cell.numeric_value().map(|v| (idx, v)))
            .filter(|(_, v)| !v.is_nan())
            .collect();
        let mut sorted: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
        sorted.sort_by(f64::total_cmp);

        let Some((q1, q3)) = quartiles(&sorted) else {
            return Ok(None);
        };
        let iqr = q3 - q1;
        let lower = q1 - thresholds.iqr_multiplier * iqr;
        let upper = q3 + thresholds.iqr_multiplier * iqr;
        let stats = [("Q1", q1), ("Q3", q3), ("lower", lower), ("upper", upper)];
        for (name, stat) in stats {
            if !stat.is_finite() {
                return Err(DetectorError::NonFiniteStatistic {
                    column: column.to_string(),
                    statistic: format!("{name}={stat}"),
                });
            }
        }

        let indices: Vec<usize> = values
            .iter()
            .filter(|(_, v)| *v < lower || *v > upper)
            .map(|(idx, _)| *idx)
            .collect();
        let max_count = ctx.total_rows() as f64 * thresholds.outlier_max_ratio;
        if indices.is_empty() || indices.len() as f64 >= max_count {
            return Ok(None);
        }

        tracing::debug!(column, q1, q3, lower, upper, outliers = indices.len(), "IQR fences");
        Ok(Some(
            ctx.issue(IssueType::Outlier, Severity::Low, column)
                .title(format!("Statistical outliers in {column}"))
                .description(format!(
                    "Found {} extreme values beyond {}×IQR (Q1={q1:.2}, Q3={q3:.2})",
                    indices.len(),
                    thresholds.iqr_multiplier
                ))
                .examples(ctx.examples(column, &indices))
                .expected_format(format!("Between {lower:.1} and {upper:.1}"))
                .build(&indices, |i| ctx.render(i, column)),
        ))
    }
}

impl Detector for OutlierDetector {
    fn id(&self) -> DetectorId {
        DetectorId::StatisticalOutliers
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in ctx.table.columns() {
            match Self::scan_column(ctx, column) {
                Ok(issue) => issues.extend(issue),
                Err(err) => {
                    tracing::warn!(detector = %self.id(), error = %err, "Skipping column");
                }
            }
        }

        Ok(issues)
    }
}

impl Detector for ReferentialIntegrityDetector {
    fn id(&self) -> DetectorId {
        DetectorId::ReferentialIntegrity
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let max_id = ctx.rules.thresholds.max_foreign_id;
        let mut issues = Vec::new();

        for column in ctx.table.columns() {
            for referenced in ctx.rules.referenced_tables(column) {
                let indices: Vec<usize> = ctx
                    .table
                    .column_cells(column)
                    .filter(|(_, cell)| cell.as_number().is_some_and(|n| n > max_id || n < 0.0))
                    .map(|(idx, _)| idx)
                    .collect();
                if indices.is_empty() {
                    continue;
                }

                issues.push(
                    ctx.issue(IssueType::ReferentialIntegrity, Severity::High, column)
                        .title(format!("Potential foreign key violations in {column}"))
                        .description(format!(
                            "Found {} IDs that appear out of valid range (referencing {referenced})",
                            indices.len()
                        ))
                        .examples(ctx.examples(column, &indices))
                        .expected_format(format!("Valid {referenced} IDs (1-{max_id})"))
                        .build(&indices, |i| ctx.render(i, column)),
                );
            }
        }

        Ok(issues)
    }
}

impl Detector for TypeMismatchDetector {
    fn id(&self) -> DetectorId {
        DetectorId::TypeMismatch
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in ctx.table.columns() {
            if !ctx.rules.numeric_columns.matches(column) {
                continue;
            }

            let indices: Vec<usize> = ctx
                .table
                .column_cells(column)
                .filter(|(_, cell)| {
                    !cell.is_null()
                        && cell.as_text() != Some("")
                        && cell.as_number().is_none()
                })
                .map(|(idx, _)| idx)
                .collect();
            if indices.is_empty() {
                continue;
            }

            issues.push(
                ctx.issue(IssueType::Invalid, Severity::Medium, column)
                    .title(format!("Data type mismatch in {column}"))
                    .description(format!(
                        "Found {} non-numeric values in column that should be numeric",
                        indices.len()
                    ))
                    .examples(ctx.examples(column, &indices))
                    .expected_format("Numeric values")
                    .build(&indices, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::test_support::{fixed_now, run};
    use crate::model::{Cell, Table};
    use crate::rules::RuleSet;

    #[test]
    fn test_negative_price_flagged() {
        let table = Table::from_column("price", vec![10i64, 12, 11, 13, -5]);
        let issues = run(&NegativeValueDetector, &table);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.issue_type, IssueType::Invalid);
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.affected_rows, vec![5]);
        assert_eq!(issue.example_bad_values, vec!["-5"]);
    }

    #[test]
    fn test_negative_coerces_text() {
        let table = Table::from_column(
            "Total",
            vec![Cell::text(" -3.5"), Cell::text("abc"), Cell::text("nan"), Cell::Null],
        );
        let issues = run(&NegativeValueDetector, &table);
        assert_eq!(issues[0].affected_rows, vec![1]);
    }

    #[test]
    fn test_quartiles_type_seven() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quartiles(&sorted), Some((1.75, 3.25)));
        assert_eq!(quartiles(&[5.0]), Some((5.0, 5.0)));
        assert_eq!(quartiles(&[]), None);
    }

    fn spread(extra: Vec<Cell>) -> Table {
        let mut values: Vec<Cell> = (1..=20).map(Cell::Int).collect();
        values.extend(extra);
        Table::from_column("reading", values)
    }

    #[test]
    fn test_outlier_bounds() {
        // Q1=6, Q3=16, IQR=10 => fences [-24, 46]
        let table = spread(vec![Cell::Int(1000)]);
        let issues = run(&OutlierDetector, &table);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.issue_type, IssueType::Outlier);
        assert_eq!(issue.severity, Severity::Low);
        assert_eq!(issue.affected_rows, vec![21]);
        assert!(issue.description.contains("Q1=6.00"));
    }

    #[test]
    fn test_outlier_ratio_limit() {
        let outliers = (0..3).map(|_| Cell::Int(10_000)).collect();
        assert!(run(&OutlierDetector, &spread(outliers)).is_empty());
    }

    #[test]
    fn test_outlier_needs_enough_values() {
        let table = Table::from_column("x", vec![1i64, 2, 3, 1000]);
        assert!(run(&OutlierDetector, &table).is_empty());
    }

    #[test]
    fn test_outlier_skips_text_columns() {
        let mut values: Vec<Cell> = (1..=20).map(Cell::Int).collect();
        values.push(Cell::text("1000"));
        let table = Table::from_column("x", values);
        assert!(run(&OutlierDetector, &table).is_empty());
    }

    #[test]
    fn test_outlier_non_finite_is_column_fault() {
        let mut values: Vec<Cell> = (1..=20).map(|i| Cell::Float(f64::from(i))).collect();
        values.extend((0..22).map(|_| Cell::Float(f64::INFINITY)));
        let table = Table::from_column("x", values);
        let rules = RuleSet::default().compile().unwrap();
        let ctx = ScanContext::new(&table, "test", &rules, fixed_now());

        let result = OutlierDetector::scan_column(&ctx, "x");
        assert!(matches!(result, Err(DetectorError::NonFiniteStatistic { .. })));
        assert!(OutlierDetector.detect(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_outlier_fault_keeps_other_columns() {
        // Q1=-1e308, Q3=1e308 overflows the fences of column a
        let rows = (0..20i64).map(|i| {
            let a = if i % 2 == 0 { 1e308 } else { -1e308 };
            let b = if i == 19 { 1000 } else { i };
            [("a", Cell::Float(a)), ("b", Cell::Int(b))]
        });
        let table = Table::from_rows(rows);

        let issues = run(&OutlierDetector, &table);
        let columns: Vec<&str> = issues.iter().map(|i| i.column.as_str()).collect();
        assert_eq!(columns, vec!["b"]);
        assert_eq!(issues[0].affected_rows, vec![20]);
    }

    #[test]
    fn test_referential_range() {
        let table = Table::from_column(
            "customerId",
            vec![Cell::Int(5), Cell::Int(-1), Cell::Int(100_001), Cell::text("x")],
        );
        let issues = run(&ReferentialIntegrityDetector, &table);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.issue_type, IssueType::ReferentialIntegrity);
        assert_eq!(issue.affected_rows, vec![2, 3]);
        assert_eq!(issue.expected_format, "Valid customer IDs (1-100000)");
        assert!(issue.description.contains("referencing customer"));
    }

    #[test]
    fn test_referential_one_issue_per_pattern() {
        let table = Table::from_column("userid_orderid", vec![-1i64]);
        let issues = run(&ReferentialIntegrityDetector, &table);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_type_mismatch() {
        let table = Table::from_column(
            "order_number",
            vec![
                Cell::text("12"),
                Cell::text("twelve"),
                Cell::text(""),
                Cell::text("  "),
                Cell::Null,
                Cell::Int(3),
                Cell::Bool(true),
            ],
        );
        let issues = run(&TypeMismatchDetector, &table);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].affected_rows, vec![2, 4]);
        assert_eq!(issues[0].severity, Severity::Medium);
    }
}
