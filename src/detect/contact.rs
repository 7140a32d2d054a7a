//! Email and phone format validation.

use super::{Detector, DetectorId, DetectorResult, ScanContext};
use crate::model::{Issue, IssueType, Severity};
use crate::rules::KeywordSet;

/// Flags malformed addresses in email-like columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidEmailDetector;

/// Flags malformed numbers in phone-like columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidPhoneDetector;

/// Shape of one format check over the matching columns.
struct FormatCheck<'r> {
    kind: &'static str,
    noun: &'static str,
    expected: &'static str,
    is_valid: &'r dyn Fn(&str) -> bool,
}

fn check_format(
    ctx: &ScanContext<'_>,
    columns: &KeywordSet,
    check: &FormatCheck<'_>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for column in ctx.table.columns().filter(|c| columns.matches(c)) {
        let indices: Vec<usize> = ctx
            .table
            .column_cells(column)
            .filter(|(_, cell)| !cell.is_null_or_empty() && !(check.is_valid)(&cell.render()))
            .map(|(idx, _)| idx)
            .collect();
        if indices.is_empty() {
            continue;
        }

        issues.push(
            ctx.issue(IssueType::Invalid, Severity::Medium, column)
                .title(format!("Invalid {} format in {column}", check.kind))
                .description(format!("Found {} invalid {}", indices.len(), check.noun))
                .examples(ctx.examples(column, &indices))
                .expected_format(check.expected)
                .build(&indices, |i| ctx.render(i, column)),
        );
    }

    issues
}

impl Detector for InvalidEmailDetector {
    fn id(&self) -> DetectorId {
        DetectorId::InvalidEmail
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let is_valid = |value: &str| ctx.rules.email.is_match(value);
        Ok(check_format(
            ctx,
            &ctx.rules.email_columns,
            &FormatCheck {
                kind: "email",
                noun: "email addresses",
                expected: "user@domain.com",
                is_valid: &is_valid,
            },
        ))
    }
}

impl Detector for InvalidPhoneDetector {
    fn id(&self) -> DetectorId {
        DetectorId::InvalidPhone
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let is_valid = |value: &str| ctx.rules.is_valid_phone(value);
        Ok(check_format(
            ctx,
            &ctx.rules.phone_columns,
            &FormatCheck {
                kind: "phone",
                noun: "phone numbers",
                expected: "+[country code][number] (10-15 digits)",
                is_valid: &is_valid,
            },
        ))
    }
}
