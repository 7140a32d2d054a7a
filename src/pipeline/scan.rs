//! Detection and scoring stage.

use super::input::ScanRequest;
use crate::detect::DetectionEngine;
use crate::error::Result;
use crate::model::Table;
use crate::quality::QualityScorer;
use crate::reports::ScanReport;

/// Run detection and scoring over an already loaded table.
#[must_use]
pub fn scan_table(engine: &DetectionEngine, table: &Table, table_name: &str) -> ScanReport {
    let detection = engine.run(table, table_name);
    let scores = QualityScorer::new().score(&detection.issues);

    tracing::info!(
        table = table_name,
        overall = scores.overall_score,
        grade = scores.grade().letter(),
        "Scan complete"
    );

    ScanReport::new(table, table_name, detection.issues, scores).with_failures(detection.failures)
}

/// Parse a raw payload and scan it.
pub fn scan_payload(engine: &DetectionEngine, raw: &str) -> Result<ScanReport> {
    let (table, table_name) = ScanRequest::parse(raw)?.into_table();
    Ok(scan_table(engine, &table, &table_name))
}
