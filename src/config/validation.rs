//! Configuration validation.

use super::types::{AppConfig, BehaviorConfig};
use crate::quality::MAX_SCORE;
use crate::rules::{RuleSet, Thresholds};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.rules.validate();
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for RuleSet {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.thresholds.validate();
        if let Err(e) = self.compile() {
            errors.push(ConfigError::new("rules", e.to_string()));
        }
        if self.foreign_keys.keys().any(|pattern| pattern.trim().is_empty()) {
            errors.push(ConfigError::new(
                "rules.foreign_keys",
                "Foreign-key column patterns must not be empty",
            ));
        }
        errors
    }
}

impl Validatable for Thresholds {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("rules.thresholds.location_cap", self.location_cap),
            ("rules.thresholds.example_cap", self.example_cap),
            ("rules.thresholds.duplicate_group_cap", self.duplicate_group_cap),
            ("rules.thresholds.capped_row_limit", self.capped_row_limit),
        ] {
            if value == 0 {
                errors.push(ConfigError::new(field, "Must be greater than 0"));
            }
        }

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            errors.push(ConfigError::new(
                "rules.thresholds.iqr_multiplier",
                format!("Must be a positive number, got {}", self.iqr_multiplier),
            ));
        }
        if !(self.outlier_max_ratio > 0.0 && self.outlier_max_ratio <= 1.0) {
            errors.push(ConfigError::new(
                "rules.thresholds.outlier_max_ratio",
                format!("Must be in (0, 1], got {}", self.outlier_max_ratio),
            ));
        }
        if !(self.max_foreign_id.is_finite() && self.max_foreign_id >= 1.0) {
            errors.push(ConfigError::new(
                "rules.thresholds.max_foreign_id",
                format!("Must be at least 1, got {}", self.max_foreign_id),
            ));
        }
        if self.obsolete_years == 0 {
            errors.push(ConfigError::new(
                "rules.thresholds.obsolete_years",
                "Must be greater than 0",
            ));
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(min_score) = self.min_score
            && !(0.0..=MAX_SCORE).contains(&min_score)
        {
            errors.push(ConfigError::new(
                "behavior.min_score",
                format!("Must be between 0 and {MAX_SCORE}, got {min_score}"),
            ));
        }
        errors
    }
}
