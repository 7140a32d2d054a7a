//! Property-based tests for detection and scoring.
//!
//! Random tables and issue lists must keep the report invariants: row
//! numbering, location prefixes, impact arithmetic, duplicate partitions,
//! outlier fences and the score floor.

use dq_scan::detect::{DetectionEngine, quartiles};
use dq_scan::model::{
    Cell, Issue, IssueType, Severity, Table, display_row, impact_score, round_to_tenth,
};
use dq_scan::quality::{Dimension, QualityScorer};
use proptest::prelude::*;
use std::collections::HashSet;

const LOCATION_CAP: usize = 20;

fn cell_strategy() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Null),
        Just(Cell::Text(String::new())),
        (-50i64..50).prop_map(Cell::Int),
        (-50.0f64..50.0).prop_map(Cell::Float),
        "[a-c ]{0,4}".prop_map(Cell::Text),
        "[a-z]{1,6}@[a-z]{1,4}\\.(com|io)".prop_map(Cell::Text),
        any::<bool>().prop_map(Cell::Bool),
    ]
}

fn table_strategy() -> impl Strategy<Value = Table> {
    let columns = ["price", "email", "note", "item_id", "qty"];
    prop::collection::vec(prop::collection::vec(cell_strategy(), columns.len()), 0..40).prop_map(
        move |rows| {
            Table::from_rows(
                rows.into_iter()
                    .map(|cells| columns.iter().copied().zip(cells).collect::<Vec<_>>()),
            )
        },
    )
}

fn issue_type_strategy() -> impl Strategy<Value = IssueType> {
    prop_oneof![
        Just(IssueType::Missing),
        Just(IssueType::Invalid),
        Just(IssueType::Duplicate),
        Just(IssueType::Inconsistent),
        Just(IssueType::Outlier),
        Just(IssueType::Obsolete),
        Just(IssueType::ReferentialIntegrity),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn display_row_is_index_plus_one(index in 0usize..1_000_000) {
        prop_assert_eq!(display_row(index), index + 1);
    }

    #[test]
    fn issue_rows_and_locations_are_consistent(table in table_strategy()) {
        let total = table.row_count();
        let detection = DetectionEngine::default().run(&table, "random");

        if total == 0 {
            prop_assert!(detection.issues.is_empty());
        }
        for issue in &detection.issues {
            prop_assert_eq!(issue.total_affected_rows, issue.record_count);
            if !issue.is_truncated() {
                prop_assert_eq!(issue.affected_rows.len(), issue.record_count);
            }
            prop_assert!(issue.affected_rows.iter().all(|&row| row >= 1 && row <= total));

            let expected_len = issue.affected_rows.len().min(LOCATION_CAP);
            prop_assert_eq!(issue.exact_locations.len(), expected_len);
            for (location, row) in issue.exact_locations.iter().zip(&issue.affected_rows) {
                prop_assert_eq!(location.row, *row);
            }

            prop_assert_eq!(
                issue.impact_score,
                round_to_tenth(issue.record_count as f64 / total as f64 * 100.0)
            );
        }
    }

    #[test]
    fn duplicate_groups_partition_affected_rows(
        rows in prop::collection::vec((0u8..3, 0u8..2), 1..60)
    ) {
        let table = Table::from_rows(rows.iter().map(|(a, b)| {
            vec![("a", Cell::Int(i64::from(*a))), ("b", Cell::Int(i64::from(*b)))]
        }));
        let detection = DetectionEngine::default().run(&table, "dups");
        let row_issue = detection
            .issues
            .iter()
            .find(|i| i.issue_type == IssueType::Duplicate && i.column == "all");

        let Some(issue) = row_issue else {
            // No duplicates only when every row is distinct
            let distinct: HashSet<_> = rows.iter().collect();
            prop_assert_eq!(distinct.len(), rows.len());
            return Ok(());
        };

        let groups = issue.duplicate_groups.clone().unwrap_or_default();
        let mut seen = HashSet::new();
        for group in &groups {
            prop_assert!(group.len() >= 2);
            for row in group {
                prop_assert!(seen.insert(*row), "row {} in two groups", row);
            }
        }
        let affected: HashSet<_> = issue.affected_rows.iter().copied().collect();
        prop_assert_eq!(seen, affected);
    }

    #[test]
    fn outliers_are_exactly_outside_the_fences(
        values in prop::collection::vec(-1000i64..1000, 11..80)
    ) {
        let table = Table::from_column("measure", values.clone());
        let detection = DetectionEngine::default().run(&table, "stats");

        let mut sorted: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        sorted.sort_by(f64::total_cmp);
        let (q1, q3) = quartiles(&sorted).unwrap();
        let iqr = q3 - q1;
        let (lower, upper) = (q1 - 3.0 * iqr, q3 + 3.0 * iqr);
        let outside: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| (**v as f64) < lower || (**v as f64) > upper)
            .map(|(idx, _)| display_row(idx))
            .collect();

        let issue = detection.issues.iter().find(|i| i.issue_type == IssueType::Outlier);
        match issue {
            Some(issue) => prop_assert_eq!(&issue.affected_rows, &outside),
            None => prop_assert!(
                outside.is_empty() || outside.len() as f64 >= values.len() as f64 * 0.1
            ),
        }
    }

    #[test]
    fn scores_stay_within_bounds(
        specs in prop::collection::vec((issue_type_strategy(), 0usize..500, 1usize..200), 0..60)
    ) {
        let issues: Vec<Issue> = specs
            .iter()
            .map(|(issue_type, count, total)| {
                let indices: Vec<usize> = (0..*count).collect();
                Issue::builder(*issue_type, Severity::Low, "c", *total)
                    .build(&indices, |i| i.to_string())
            })
            .collect();

        let scores = QualityScorer::new().score(&issues);
        for dimension in Dimension::ALL {
            let value = scores.get(dimension);
            prop_assert!((0.0..=100.0).contains(&value), "{:?} = {}", dimension, value);
        }
        prop_assert!((0.0..=100.0).contains(&scores.overall_score));
    }

    #[test]
    fn scoring_is_order_independent(
        specs in prop::collection::vec((issue_type_strategy(), 1usize..40), 1..20)
    ) {
        let mut issues: Vec<Issue> = specs
            .iter()
            .map(|(issue_type, count)| {
                let indices: Vec<usize> = (0..*count).collect();
                Issue::builder(*issue_type, Severity::Low, "c", 39)
                    .build(&indices, |i| i.to_string())
            })
            .collect();

        let forward = QualityScorer::new().score(&issues);
        issues.reverse();
        let backward = QualityScorer::new().score(&issues);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn impact_score_matches_formula(count in 0usize..10_000, total in 1usize..10_000) {
        let exact = count as f64 / total as f64 * 100.0;
        let score = impact_score(count, total);
        prop_assert!((score - exact).abs() <= 0.05 + 1e-9);
        prop_assert_eq!(score, round_to_tenth(score));
    }
}

#[test]
fn dimension_weights_sum_to_one() {
    let sum: f64 = Dimension::ALL.iter().map(Dimension::weight).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}
