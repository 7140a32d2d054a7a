#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz payload parsing and the full detection pass.
///
/// Arbitrary UTF-8 goes through `scan_payload`; malformed documents must
/// come back as errors and well-formed ones must scan without panicking.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let engine = dq_scan::detect::DetectionEngine::default();
        let _ = dq_scan::pipeline::scan_payload(&engine, s);
    }
});
