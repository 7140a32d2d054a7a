//! CLI command handlers.
//!
//! Testable handlers invoked by main.rs, one per subcommand.

mod config;
mod scan;

pub use config::{ConfigView, run_config};
pub use scan::{build_engine, run_scan, scan_with_config};
