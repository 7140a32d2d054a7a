//! Configuration module for dq-scan.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.dq-scan.yaml` file in your project root or `~/.config/dq-scan/`:
//!
//! ```yaml
//! detectors:
//!   disabled: [statistical-outliers]
//! rules:
//!   thresholds:
//!     location_cap: 10
//! behavior:
//!   min_score: 80
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{AppConfig, AppConfigBuilder, BehaviorConfig, DetectorConfig, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, load_config_file,
    load_or_default,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// The schema documents every option accepted in `.dq-scan.yaml`.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    // A derived schema is plain maps and strings, which always serialize
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
