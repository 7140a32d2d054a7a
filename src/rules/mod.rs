//! Heuristic rule tables for the detectors.
//!
//! Every vocabulary the detectors use (placeholder words, column-name
//! keywords, the foreign-key map, validation patterns) and every numeric
//! threshold lives in a [`RuleSet`]. A rule set is plain data that can be
//! loaded from YAML; [`RuleSet::compile`] turns it into [`CompiledRules`]
//! with every regex built exactly once.

use crate::error::{DqError, Result};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configurable vocabularies and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RuleSet {
    /// Regex fragments for placeholder values, matched case-insensitively
    /// anywhere in the rendered cell
    pub placeholder_patterns: Vec<String>,
    /// Column keywords marking identifier columns that must be unique
    pub key_column_keywords: Vec<String>,
    /// Column keywords marking email columns
    pub email_column_keywords: Vec<String>,
    /// Column keywords marking phone columns
    pub phone_column_keywords: Vec<String>,
    /// Column keywords marking date/time columns
    pub date_column_keywords: Vec<String>,
    /// Column keywords for the date sub-format consistency check
    pub date_format_column_keywords: Vec<String>,
    /// Column keywords for columns that must not hold negative values
    pub non_negative_keywords: Vec<String>,
    /// Column keywords for columns that must hold numbers
    pub numeric_keywords: Vec<String>,
    /// Foreign-key column pattern to referenced table name
    pub foreign_keys: IndexMap<String, String>,
    /// Valid email address pattern
    pub email_pattern: String,
    /// Characters stripped from phone numbers before validation
    pub phone_separators: String,
    /// Valid phone number pattern, after stripping separators
    pub phone_pattern: String,
    /// Numeric limits
    pub thresholds: Thresholds,
}

/// Numeric limits used by the detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Thresholds {
    /// Exact locations kept per issue
    pub location_cap: usize,
    /// Example values kept per issue
    pub example_cap: usize,
    /// Duplicate groups kept per row-duplicate issue
    pub duplicate_group_cap: usize,
    /// Affected rows kept for date recency issues
    pub capped_row_limit: usize,
    /// Obsolete dates are reported only above this count
    pub obsolete_min_count: usize,
    /// Whitespace issues are reported only above this count
    pub whitespace_min_count: usize,
    /// Outliers are computed only above this many non-null values
    pub outlier_min_values: usize,
    /// IQR fence multiplier
    pub iqr_multiplier: f64,
    /// Outliers are reported only below this share of rows
    pub outlier_max_ratio: f64,
    /// Dates older than this many years are obsolete
    pub obsolete_years: u32,
    /// Dates before this year are obsolete
    pub obsolete_floor_year: i32,
    /// Largest plausible foreign-key value
    pub max_foreign_id: f64,
    /// Date sub-formats are compared only above this many non-null values
    pub date_format_min_values: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            location_cap: 20,
            example_cap: 5,
            duplicate_group_cap: 50,
            capped_row_limit: 100,
            obsolete_min_count: 5,
            whitespace_min_count: 5,
            outlier_min_values: 10,
            iqr_multiplier: 3.0,
            outlier_max_ratio: 0.1,
            obsolete_years: 50,
            obsolete_floor_year: 1900,
            max_foreign_id: 100_000.0,
            date_format_min_values: 10,
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        let foreign_keys = [
            ("productid", "product"),
            ("customerid", "customer"),
            ("orderid", "order"),
            ("warehouseid", "warehouse"),
            ("inventoryid", "inventory"),
            ("userid", "user"),
            ("categoryid", "category"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            placeholder_patterns: words(&[
                r"BAD_\w+",
                r"INVALID\w*",
                "N/A",
                "NA",
                "NONE",
                "UNKNOWN",
                "TBD",
                "TODO",
                "XXX",
                "###",
                "---",
                "PLACEHOLDER",
                "TEMP",
                "TEST",
                "DUMMY",
            ]),
            key_column_keywords: words(&["id", "code", "sku"]),
            email_column_keywords: words(&["email"]),
            phone_column_keywords: words(&["phone"]),
            date_column_keywords: words(&["date", "time"]),
            date_format_column_keywords: words(&["date"]),
            non_negative_keywords: words(&[
                "price", "amount", "quantity", "count", "total", "qty", "cost", "balance", "age",
            ]),
            numeric_keywords: words(&[
                "id", "count", "number", "qty", "quantity", "amount", "price",
            ]),
            foreign_keys,
            email_pattern: r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$".to_string(),
            phone_separators: r"[-\s().]".to_string(),
            phone_pattern: r"^\+?\d{10,15}$".to_string(),
            thresholds: Thresholds::default(),
        }
    }
}

impl RuleSet {
    /// Compile every pattern once.
    ///
    /// An invalid pattern is a configuration error naming the offending rule.
    pub fn compile(&self) -> Result<CompiledRules> {
        let placeholder = if self.placeholder_patterns.is_empty() {
            None
        } else {
            let joined = self.placeholder_patterns.join("|");
            Some(
                RegexBuilder::new(&joined)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| invalid_pattern("placeholder_patterns", &joined, &e))?,
            )
        };

        let email = Regex::new(&self.email_pattern)
            .map_err(|e| invalid_pattern("email_pattern", &self.email_pattern, &e))?;
        let phone_separators = Regex::new(&self.phone_separators)
            .map_err(|e| invalid_pattern("phone_separators", &self.phone_separators, &e))?;
        let phone = Regex::new(&self.phone_pattern)
            .map_err(|e| invalid_pattern("phone_pattern", &self.phone_pattern, &e))?;

        Ok(CompiledRules {
            placeholder,
            email,
            phone_separators,
            phone,
            key_columns: KeywordSet::new(&self.key_column_keywords),
            email_columns: KeywordSet::new(&self.email_column_keywords),
            phone_columns: KeywordSet::new(&self.phone_column_keywords),
            date_columns: KeywordSet::new(&self.date_column_keywords),
            date_format_columns: KeywordSet::new(&self.date_format_column_keywords),
            non_negative_columns: KeywordSet::new(&self.non_negative_keywords),
            numeric_columns: KeywordSet::new(&self.numeric_keywords),
            foreign_keys: self
                .foreign_keys
                .iter()
                .map(|(pattern, table)| (pattern.to_lowercase(), table.clone()))
                .collect(),
            thresholds: self.thresholds.clone(),
        })
    }
}

fn invalid_pattern(rule: &str, pattern: &str, err: &regex::Error) -> DqError {
    DqError::config(format!("Invalid {rule} regex '{pattern}': {err}"))
}

/// Case-insensitive column-name keyword matcher.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Whether any keyword occurs in the column name.
    #[must_use]
    pub fn matches(&self, column: &str) -> bool {
        let lower = column.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Rule set with every pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    /// `None` when the placeholder vocabulary is empty
    pub placeholder: Option<Regex>,
    pub email: Regex,
    pub phone_separators: Regex,
    pub phone: Regex,
    pub key_columns: KeywordSet,
    pub email_columns: KeywordSet,
    pub phone_columns: KeywordSet,
    pub date_columns: KeywordSet,
    pub date_format_columns: KeywordSet,
    pub non_negative_columns: KeywordSet,
    pub numeric_columns: KeywordSet,
    /// Lowercased foreign-key pattern to referenced table
    pub foreign_keys: Vec<(String, String)>,
    pub thresholds: Thresholds,
}

impl CompiledRules {
    /// Referenced tables for every foreign-key pattern the column matches.
    pub fn referenced_tables<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a str> {
        let lower = column.to_lowercase();
        self.foreign_keys
            .iter()
            .filter(move |(pattern, _)| lower.contains(pattern.as_str()))
            .map(|(_, table)| table.as_str())
    }

    /// Whether a rendered value looks like a placeholder.
    #[must_use]
    pub fn is_placeholder(&self, rendered: &str) -> bool {
        self.placeholder
            .as_ref()
            .is_some_and(|re| re.is_match(rendered))
    }

    /// Whether a phone value is valid once separators are removed.
    #[must_use]
    pub fn is_valid_phone(&self, raw: &str) -> bool {
        let cleaned = self.phone_separators.replace_all(raw, "");
        self.phone.is_match(&cleaned)
    }
}

impl Default for CompiledRules {
    fn default() -> Self {
        // The built-in patterns are constants covered by the rule tests
        RuleSet::default()
            .compile()
            .expect("built-in rule patterns")
    }
}
