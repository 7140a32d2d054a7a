//! Scan command handler.
//!
//! Implements the `scan` subcommand: read a payload, detect, score and
//! write the report.

use crate::config::{AppConfig, Validatable};
use crate::detect::DetectionEngine;
use crate::error::{DqError, Result as DqResult};
use crate::pipeline::{
    OutputTarget, exit_codes, read_input, scan_payload, should_use_color, write_output,
};
use crate::reports::{ErrorReport, JsonReporter, ScanReport, create_reporter};
use anyhow::Result;
use std::path::Path;

/// Build the detection engine a configuration describes.
///
/// Invalid configuration is a validation error listing every problem.
pub fn build_engine(config: &AppConfig) -> DqResult<DetectionEngine> {
    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(DqError::validation(messages.join("; ")));
    }
    Ok(DetectionEngine::from_rules(&config.rules)?.without(&config.detectors.disabled))
}

/// Scan a raw payload under a configuration.
pub fn scan_with_config(config: &AppConfig, raw: &str) -> DqResult<ScanReport> {
    let engine = build_engine(config)?;
    scan_payload(&engine, raw)
}

/// Run the scan command, returning the desired exit code.
///
/// Every failure on the scan path is reported as `{"error": "..."}` on
/// stdout with [`exit_codes::ERROR`]. The caller is responsible for calling
/// `std::process::exit()` with the returned code when it is non-zero.
pub fn run_scan(config: &AppConfig, input: Option<&Path>) -> Result<i32> {
    match execute(config, input) {
        Ok(code) => Ok(code),
        Err(e) => {
            tracing::error!("Scan failed: {e}");
            let payload = JsonReporter::new().generate_error(&ErrorReport::new(e.to_string()))?;
            write_output(&payload, &OutputTarget::Stdout, true)?;
            Ok(exit_codes::ERROR)
        }
    }
}

fn execute(config: &AppConfig, input: Option<&Path>) -> DqResult<i32> {
    let raw = read_input(input)?;
    let report = scan_with_config(config, &raw)?;

    let target = OutputTarget::from_option(config.output.file.clone());
    let colored = should_use_color(config.output.no_color) && target.is_terminal();
    let reporter = create_reporter(config.output.format, config.output.pretty, colored);
    let rendered = reporter.generate(&report)?;
    write_output(&rendered, &target, config.behavior.quiet)?;

    if let Some(threshold) = config.behavior.min_score
        && report.quality_scores.overall_score < threshold
    {
        tracing::error!(
            "Quality score {:.1} is below minimum threshold {:.1}",
            report.quality_scores.overall_score,
            threshold
        );
        return Ok(exit_codes::BELOW_MIN_SCORE);
    }

    Ok(exit_codes::SUCCESS)
}
