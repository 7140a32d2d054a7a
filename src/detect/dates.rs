//! Date and time detectors.
//!
//! All comparisons happen in UTC against the scan's reference time. Integer
//! and float cells in date columns are Unix epoch seconds.

use super::{Detector, DetectorError, DetectorId, DetectorResult, ScanContext};
use crate::model::{Cell, ColumnKind, IssueType, Severity};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc,
};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M %p", "%I:%M:%S %p"];

/// Parse a cell as a point in time, relative to `now` for bare times.
///
/// Returns `None` when the cell cannot be read as a date. Null cells, NaN
/// floats and booleans are never dates.
#[must_use]
pub fn parse_date(cell: &Cell, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match cell {
        Cell::Null | Cell::Bool(_) => None,
        Cell::Int(secs) => DateTime::from_timestamp(*secs, 0),
        Cell::Float(secs) if secs.is_finite() => {
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9).round() as u32;
            DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        }
        Cell::Float(_) => None,
        Cell::Text(s) => parse_text(s.trim(), now),
    }
}

fn parse_text(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|f| DateTime::<FixedOffset>::parse_from_str(s, f).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt.and_utc());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(s, f).ok())
        .map(|time| now.date_naive().and_time(time).and_utc())
}

/// Value that should be checked as a date: non-null and non-empty.
fn is_candidate(cell: &Cell) -> bool {
    !cell.is_null_or_empty() && !matches!(cell, Cell::Float(f) if f.is_nan())
}

/// Parsed dates of one column, as `(row_index, parsed)` pairs.
fn parsed_cells<'a>(
    ctx: &ScanContext<'a>,
    column: &'a str,
) -> impl Iterator<Item = (usize, Option<DateTime<Utc>>)> + 'a {
    let now = ctx.now;
    ctx.table
        .column_cells(column)
        .filter(|(_, cell)| is_candidate(cell))
        .map(move |(idx, cell)| (idx, parse_date(cell, now)))
}

fn date_columns<'a>(ctx: &ScanContext<'a>) -> Vec<&'a str> {
    ctx.table
        .columns()
        .filter(|c| ctx.rules.date_columns.matches(c))
        .collect()
}

// ============================================================================
// Invalid, future and obsolete dates
// ============================================================================

/// Flags values in date-like columns that do not parse as dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidDateDetector;

/// Flags dates strictly after the reference time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FutureDateDetector;

/// Flags dates before the floor year or older than the obsolescence window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObsoleteDateDetector;

impl Detector for InvalidDateDetector {
    fn id(&self) -> DetectorId {
        DetectorId::InvalidDate
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in date_columns(ctx) {
            let indices: Vec<usize> = parsed_cells(ctx, column)
                .filter(|(_, parsed)| parsed.is_none())
                .map(|(idx, _)| idx)
                .collect();
            if indices.is_empty() {
                continue;
            }

            issues.push(
                ctx.issue(IssueType::Invalid, Severity::Medium, column)
                    .title(format!("Invalid date format in {column}"))
                    .description(format!("Found {} unparseable date values", indices.len()))
                    .examples(ctx.examples(column, &indices))
                    .expected_format("ISO 8601 (YYYY-MM-DD) or parseable date")
                    .build(&indices, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}

impl Detector for FutureDateDetector {
    fn id(&self) -> DetectorId {
        DetectorId::FutureDate
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in date_columns(ctx) {
            let indices: Vec<usize> = parsed_cells(ctx, column)
                .filter(|(_, parsed)| parsed.is_some_and(|dt| dt > ctx.now))
                .map(|(idx, _)| idx)
                .collect();
            if indices.is_empty() {
                continue;
            }

            issues.push(
                ctx.issue(IssueType::Inconsistent, Severity::Medium, column)
                    .title(format!("Future dates in {column}"))
                    .description(format!("Found {} dates in the future", indices.len()))
                    .examples(ctx.examples(column, &indices))
                    .expected_format("Dates not in the future")
                    .row_cap(ctx.rules.thresholds.capped_row_limit)
                    .build(&indices, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}

impl Detector for ObsoleteDateDetector {
    fn id(&self) -> DetectorId {
        DetectorId::ObsoleteDate
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let thresholds = &ctx.rules.thresholds;
        let years = thresholds.obsolete_years;
        let cutoff = TimeDelta::try_days(365 * i64::from(years))
            .and_then(|window| ctx.now.checked_sub_signed(window))
            .ok_or(DetectorError::ClockOutOfRange {
                now: ctx.now,
                years,
            })?;

        let mut issues = Vec::new();
        for column in date_columns(ctx) {
            let indices: Vec<usize> = parsed_cells(ctx, column)
                .filter(|(_, parsed)| {
                    parsed.is_some_and(|dt| {
                        dt <= ctx.now && (dt.year() < thresholds.obsolete_floor_year || dt < cutoff)
                    })
                })
                .map(|(idx, _)| idx)
                .collect();
            if indices.len() <= thresholds.obsolete_min_count {
                continue;
            }

            issues.push(
                ctx.issue(IssueType::Obsolete, Severity::Low, column)
                    .title(format!("Outdated timestamps in {column}"))
                    .description(format!(
                        "Found {} very old dates (>{years} years or before {})",
                        indices.len(),
                        thresholds.obsolete_floor_year
                    ))
                    .examples(ctx.examples(column, &indices))
                    .expected_format("Recent dates")
                    .row_cap(thresholds.capped_row_limit)
                    .build(&indices, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}

// ============================================================================
// Date sub-format consistency
// ============================================================================

static ISO_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("static regex"));
static US_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}").expect("static regex"));
static EU_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}").expect("static regex"));

/// Textual date layout, classified by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormatClass {
    /// `YYYY-MM-DD...`
    Iso,
    /// `MM/DD/YYYY...`
    Us,
    /// `DD-MM-YYYY...`
    Eu,
    Other,
}

impl DateFormatClass {
    #[must_use]
    pub fn classify(value: &str) -> Self {
        if ISO_PREFIX.is_match(value) {
            Self::Iso
        } else if US_PREFIX.is_match(value) {
            Self::Us
        } else if EU_PREFIX.is_match(value) {
            Self::Eu
        } else {
            Self::Other
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::Us => "US",
            Self::Eu => "EU",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for DateFormatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flags rows whose date layout differs from the column's majority layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct InconsistentDateFormatDetector;

impl Detector for InconsistentDateFormatDetector {
    fn id(&self) -> DetectorId {
        DetectorId::InconsistentDateFormat
    }

    fn detect(&self, ctx: &ScanContext<'_>) -> DetectorResult {
        let mut issues = Vec::new();

        for column in ctx.table.columns() {
            if !ctx.rules.date_format_columns.matches(column)
                || ctx.table.column_kind(column) != ColumnKind::Text
                || ctx.table.non_null_count(column) <= ctx.rules.thresholds.date_format_min_values
            {
                continue;
            }

            let mut classes: IndexMap<DateFormatClass, Vec<usize>> = IndexMap::new();
            for (idx, cell) in ctx.table.column_cells(column) {
                if !cell.is_null() {
                    let class = DateFormatClass::classify(&cell.render());
                    classes.entry(class).or_default().push(idx);
                }
            }
            if classes.len() < 2 {
                continue;
            }

            // Largest class wins; on ties the first seen keeps the lead.
            let mut majority = 0;
            for (pos, rows) in classes.values().enumerate() {
                if rows.len() > classes[majority].len() {
                    majority = pos;
                }
            }
            let mut indices: Vec<usize> = classes
                .values()
                .enumerate()
                .filter(|(pos, _)| *pos != majority)
                .flat_map(|(_, rows)| rows.iter().copied())
                .collect();
            indices.sort_unstable();

            let names = classes
                .keys()
                .map(DateFormatClass::as_str)
                .collect::<Vec<_>>()
                .join(", ");

            issues.push(
                ctx.issue(IssueType::Inconsistent, Severity::Medium, column)
                    .title(format!("Inconsistent date formats in {column}"))
                    .description(format!(
                        "Found {} different date formats. Formats: {names}",
                        classes.len()
                    ))
                    .examples(ctx.examples(column, &indices))
                    .expected_format("Consistent date format (preferably ISO 8601)")
                    .build(&indices, |i| ctx.render(i, column)),
            );
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::test_support::{fixed_now, run, run_with};
    use crate::model::Table;
    use crate::rules::{RuleSet, Thresholds};
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_common_layouts() {
        let now = fixed_now();
        let expect = utc(2023, 1, 15);
        for raw in [
            "2023-01-15",
            "2023/01/15",
            "01/15/2023",
            "15-01-2023",
            "15.01.2023",
            "January 15, 2023",
            "15 Jan 2023",
            "2023-01-15T00:00:00",
            "2023-01-15 00:00:00.000",
            "2023-01-15T00:00:00Z",
            "2023-01-15T02:00:00+02:00",
        ] {
            assert_eq!(parse_date(&Cell::text(raw), now), Some(expect), "{raw}");
        }
    }

    #[test]
    fn test_parse_us_with_meridiem() {
        let parsed = parse_date(&Cell::text("01/15/2023 02:30 PM"), fixed_now()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_time_uses_reference_day() {
        let parsed = parse_date(&Cell::text("08:15"), fixed_now()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 1, 8, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_epoch_seconds() {
        assert_eq!(
            parse_date(&Cell::Int(0), fixed_now()),
            Some(utc(1970, 1, 1))
        );
        assert_eq!(
            parse_date(&Cell::Float(86_400.0), fixed_now()),
            Some(utc(1970, 1, 2))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["not a date", "2023-13-45", "32/01/2023", "yesterday"] {
            assert_eq!(parse_date(&Cell::text(raw), fixed_now()), None, "{raw}");
        }
        assert_eq!(parse_date(&Cell::Bool(true), fixed_now()), None);
    }

    #[test]
    fn test_invalid_dates() {
        let table = Table::from_column(
            "order_date",
            vec![
                Cell::text("2023-01-15"),
                Cell::text("garbage"),
                Cell::Null,
                Cell::text(""),
                Cell::Bool(false),
            ],
        );
        let issues = run(&InvalidDateDetector, &table);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].affected_rows, vec![2, 5]);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(issues[0].issue_type, IssueType::Invalid);
    }

    #[test]
    fn test_future_dates_capped() {
        let mut values: Vec<Cell> = (0..150).map(|_| Cell::text("2099-01-01")).collect();
        values.push(Cell::text("2020-01-01"));
        let table = Table::from_column("ship_date", values);

        let issues = run(&FutureDateDetector, &table);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.issue_type, IssueType::Inconsistent);
        assert_eq!(issue.record_count, 150);
        assert_eq!(issue.total_affected_rows, 150);
        assert_eq!(issue.affected_rows.len(), 100);
        assert_eq!(issue.exact_locations.len(), 20);
    }

    #[test]
    fn test_obsolete_requires_more_than_min_count() {
        let old = |n: usize| -> Table {
            let mut values: Vec<Cell> = (0..n).map(|_| Cell::text("1850-03-01")).collect();
            values.push(Cell::text("2024-01-01"));
            Table::from_column("created_date", values)
        };

        assert!(run(&ObsoleteDateDetector, &old(5)).is_empty());

        let issues = run(&ObsoleteDateDetector, &old(6));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::Obsolete);
        assert_eq!(issues[0].severity, Severity::Low);
        assert_eq!(issues[0].record_count, 6);
    }

    #[test]
    fn test_obsolete_window() {
        // 1960 is older than 50 years before 2024-06-01, 1990 is not.
        let mut values: Vec<Cell> = (0..6).map(|_| Cell::text("1960-05-05")).collect();
        values.extend((0..6).map(|_| Cell::text("1990-05-05")));
        let table = Table::from_column("birth_date", values);
        let issues = run(&ObsoleteDateDetector, &table);
        assert_eq!(issues[0].affected_rows, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_obsolete_clock_out_of_range() {
        let rules = RuleSet {
            thresholds: Thresholds {
                obsolete_years: u32::MAX,
                ..Thresholds::default()
            },
            ..RuleSet::default()
        };
        let table = Table::from_column("date", vec!["2020-01-01"]);
        let result = run_with(&ObsoleteDateDetector, &table, &rules);
        assert!(matches!(result, Err(DetectorError::ClockOutOfRange { .. })));
    }

    #[test]
    fn test_classify() {
        assert_eq!(DateFormatClass::classify("2023-01-15"), DateFormatClass::Iso);
        assert_eq!(DateFormatClass::classify("01/15/2023"), DateFormatClass::Us);
        assert_eq!(DateFormatClass::classify("15-01-2023"), DateFormatClass::Eu);
        assert_eq!(DateFormatClass::classify("Jan 15"), DateFormatClass::Other);
    }

    #[test]
    fn test_inconsistent_minority_rows() {
        let mut values: Vec<Cell> = Vec::new();
        values.push(Cell::text("01/15/2023"));
        values.extend((0..8).map(|_| Cell::text("2023-01-15")));
        values.push(Cell::text("15-01-2023"));
        values.push(Cell::text("01/16/2023"));
        let table = Table::from_column("event_date", values);

        let issues = run(&InconsistentDateFormatDetector, &table);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.affected_rows, vec![1, 10, 11]);
        assert_eq!(
            issue.description,
            "Found 3 different date formats. Formats: US, ISO, EU"
        );
    }

    #[test]
    fn test_inconsistent_tie_keeps_first_seen() {
        let mut values: Vec<Cell> = (0..6).map(|_| Cell::text("2023-01-15")).collect();
        values.extend((0..6).map(|_| Cell::text("01/15/2023")));
        let table = Table::from_column("date", values);
        let issues = run(&InconsistentDateFormatDetector, &table);
        assert_eq!(issues[0].affected_rows, (7..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_inconsistent_needs_enough_values() {
        let values: Vec<Cell> = ["2023-01-15", "01/15/2023"]
            .iter()
            .map(|s| Cell::text(*s))
            .collect();
        let table = Table::from_column("date", values);
        assert!(run(&InconsistentDateFormatDetector, &table).is_empty());
    }
}
