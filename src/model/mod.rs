//! Table and issue data model.
//!
//! The [`Table`] is loaded once and never mutated; detectors read it and
//! produce [`Issue`] values that are never changed after creation.

mod issue;
mod table;

pub use issue::{
    ALL_COLUMNS, Issue, IssueBuilder, IssueType, Location, Severity, impact_score,
    round_to_tenth,
};
pub use table::{Cell, CellKey, ColumnKind, Record, Table, display_row};
