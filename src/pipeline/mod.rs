//! Pipeline orchestration for scans.
//!
//! Shared read → detect → score → report logic used by the CLI handlers.

mod input;
mod output;
mod scan;

pub use input::{DEFAULT_TABLE_NAME, ScanRequest, read_input};
pub use output::{OutputTarget, should_use_color, write_output};
pub use scan::{scan_payload, scan_table};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - scan completed
    pub const SUCCESS: i32 = 0;
    /// An error occurred (bad input, IO, configuration)
    pub const ERROR: i32 = 1;
    /// Overall score fell below the requested minimum
    pub const BELOW_MIN_SCORE: i32 = 2;
}
