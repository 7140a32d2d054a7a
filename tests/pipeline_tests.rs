//! Pipeline and CLI integration tests.
//!
//! These tests exercise the full read → detect → score → report pipeline,
//! error handling paths, and the CLI command handlers with real files.

use dq_scan::cli::{ConfigView, run_config, run_scan, scan_with_config};
use dq_scan::config::{AppConfig, load_config_file};
use dq_scan::detect::DetectorId;
use dq_scan::pipeline::{OutputTarget, exit_codes, read_input, write_output};
use dq_scan::reports::ReportFormat;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

const PRODUCTS: &str = r#"{
  "tableName": "products",
  "data": [
    {"sku": "A-1", "price": 10, "quantity": 3},
    {"sku": "A-2", "price": 12, "quantity": 1},
    {"sku": "A-3", "price": -4, "quantity": "many"},
    {"sku": "A-3", "price": 9, "quantity": 2}
  ]
}"#;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn scan_to_file(config: AppConfig, input: &Path, dir: &TempDir) -> (i32, String) {
    let out = dir.path().join("report.out");
    let config = AppConfig {
        output: dq_scan::config::OutputConfig {
            file: Some(out.clone()),
            ..config.output
        },
        ..config
    };
    let code = run_scan(&config, Some(input)).expect("handler should not fail");
    let content = std::fs::read_to_string(&out).unwrap_or_default();
    (code, content)
}

// ============================================================================
// Scan Handler
// ============================================================================

mod scan_handler {
    use super::*;

    #[test]
    fn json_report_written_to_file() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(&dir, "products.json", PRODUCTS);

        let (code, content) = scan_to_file(AppConfig::default(), &input, &dir);
        assert_eq!(code, exit_codes::SUCCESS);

        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(
            value["summary"],
            "Detected 3 data quality issues across 3 columns and 4 rows"
        );
        let columns: Vec<_> = value["issues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["column"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(columns, vec!["sku", "price", "quantity"]);
    }

    #[test]
    fn compact_by_default_pretty_on_request() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(&dir, "products.json", PRODUCTS);

        let (_, compact) = scan_to_file(AppConfig::default(), &input, &dir);
        assert_eq!(compact.trim_end().lines().count(), 1);

        let pretty = AppConfig::builder().pretty(true).build();
        let (_, pretty) = scan_to_file(pretty, &input, &dir);
        assert!(pretty.lines().count() > 10);
    }

    #[test]
    fn summary_format_is_plain_in_files() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(&dir, "products.json", PRODUCTS);

        let config = AppConfig::builder()
            .output_format(ReportFormat::Summary)
            .build();
        let (code, content) = scan_to_file(config, &input, &dir);
        assert_eq!(code, exit_codes::SUCCESS);
        assert!(content.starts_with("Data Quality Summary"));
        assert!(content.contains("Table:  products (4 rows × 3 columns)"));
        assert!(!content.contains("\x1b["));
    }

    #[test]
    fn min_score_gate() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(&dir, "products.json", PRODUCTS);

        let lenient = AppConfig::builder().min_score(Some(10.0)).build();
        assert_eq!(scan_to_file(lenient, &input, &dir).0, exit_codes::SUCCESS);

        let strict = AppConfig::builder().min_score(Some(99.9)).build();
        assert_eq!(
            scan_to_file(strict, &input, &dir).0,
            exit_codes::BELOW_MIN_SCORE
        );
    }

    #[test]
    fn input_errors_exit_with_error_code() {
        let dir = TempDir::new().unwrap();
        for (name, content) in [
            ("empty.json", ""),
            ("no_rows.json", r#"{"data": []}"#),
            ("broken.json", "{\"data\": ["),
        ] {
            let input = write_fixture(&dir, name, content);
            let (code, report) = scan_to_file(AppConfig::default(), &input, &dir);
            assert_eq!(code, exit_codes::ERROR, "{name}");
            assert!(report.is_empty(), "{name} must not write a report");
        }
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (code, _) = scan_to_file(
            AppConfig::default(),
            &dir.path().join("does-not-exist.json"),
            &dir,
        );
        assert_eq!(code, exit_codes::ERROR);
    }
}

// ============================================================================
// Configuration Files
// ============================================================================

mod config_files {
    use super::*;

    const CONFIG: &str = "\
detectors:
  disabled: [duplicate-keys, type-mismatch]
rules:
  non_negative_keywords: [quantity]
output:
  pretty: true
";

    #[test]
    fn config_file_shapes_the_scan() {
        let dir = TempDir::new().unwrap();
        let config_path = write_fixture(&dir, ".dq-scan.yaml", CONFIG);
        let config = load_config_file(&config_path).unwrap();

        assert_eq!(
            config.detectors.disabled,
            vec![DetectorId::DuplicateKeys, DetectorId::TypeMismatch]
        );

        let report = scan_with_config(&config, PRODUCTS).unwrap();
        // price is no longer a non-negative column; quantity holds no negatives
        assert!(report.issues.is_empty());
    }

    #[test]
    fn cli_overrides_layer_over_file() {
        let dir = TempDir::new().unwrap();
        let config_path = write_fixture(&dir, ".dq-scan.yaml", CONFIG);

        let cli = AppConfig::builder()
            .disable(DetectorId::MissingValues)
            .min_score(Some(50.0))
            .build();
        let (config, loaded_from) = AppConfig::from_file_with_overrides(Some(&config_path), &cli);

        assert_eq!(loaded_from.as_deref(), Some(config_path.as_path()));
        assert!(config.output.pretty);
        assert_eq!(config.behavior.min_score, Some(50.0));
        assert_eq!(config.detectors.disabled.len(), 3);
    }

    #[test]
    fn invalid_rule_pattern_fails_the_scan() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(&dir, "products.json", PRODUCTS);
        let mut config = AppConfig::default();
        config.rules.placeholder_patterns = vec!["(".to_string()];

        assert!(scan_with_config(&config, PRODUCTS).is_err());
        assert_eq!(scan_to_file(config, &input, &dir).0, exit_codes::ERROR);
    }

    #[test]
    fn config_views() {
        let schema = run_config(ConfigView::Schema, None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert!(parsed["properties"]["detectors"].is_object());

        let example = run_config(ConfigView::Example, None).unwrap();
        let config: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}

// ============================================================================
// Input / Output Stages
// ============================================================================

mod io_stages {
    use super::*;

    #[test]
    fn read_then_write_roundtrip_through_files() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(&dir, "in.json", PRODUCTS);
        assert_eq!(read_input(Some(&input)).unwrap(), PRODUCTS);

        let out = dir.path().join("out.txt");
        write_output("hello", &OutputTarget::File(out.clone()), false).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "hello\n");
    }
}
