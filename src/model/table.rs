//! In-memory table model.
//!
//! A [`Table`] is an immutable, ordered sequence of records. Columns are the
//! union of record keys in first-seen order, and a record that lacks a column
//! holds [`Cell::Null`] for it.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed scalar value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Cell {
    /// Absent or null
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text, including the empty string
    Text(String),
}

impl Cell {
    /// Create a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null or the empty string.
    #[must_use]
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Borrow the text content of a text cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Lenient numeric coercion.
    ///
    /// Text is trimmed and parsed as a float; anything that does not parse
    /// is simply not numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Numeric value of an Int or Float cell, without coercing text.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Render the cell as display text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Hashable key used for equality grouping.
    #[must_use]
    pub fn key(&self) -> CellKey {
        match self {
            Self::Null => CellKey::Null,
            Self::Bool(b) => CellKey::Bool(*b),
            Self::Int(i) => CellKey::number(*i as f64),
            Self::Float(f) => CellKey::number(*f),
            Self::Text(s) => CellKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{x:.1}")
            }
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<serde_json::Value> for Cell {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            Value::String(s) => Self::Text(s),
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Text(nested.to_string()),
        }
    }
}

impl From<Cell> for serde_json::Value {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Null => Self::Null,
            Cell::Bool(b) => Self::Bool(b),
            Cell::Int(i) => Self::from(i),
            Cell::Float(f) => serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number),
            Cell::Text(s) => Self::String(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Hashable equality key for a cell.
///
/// Integers and floats with the same value share a key, and all nulls are
/// equal to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Bool(bool),
    Number(u64),
    Text(String),
}

impl CellKey {
    fn number(value: f64) -> Self {
        // -0.0 == 0.0, and every NaN is the same missing value
        if value.is_nan() {
            Self::Null
        } else if value == 0.0 {
            Self::Number(0.0_f64.to_bits())
        } else {
            Self::Number(value.to_bits())
        }
    }
}

/// Storage kind of a column, inferred from its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-null cell is an integer or a float
    Numeric,
    /// Every cell is a boolean, with no nulls
    Boolean,
    /// Anything else, including mixed and all-null columns
    Text,
}

/// One row of the table.
pub type Record = IndexMap<String, Cell>;

/// Convert a 0-based row index into the 1-based display row number.
#[must_use]
pub const fn display_row(index: usize) -> usize {
    index + 1
}

static NULL_CELL: Cell = Cell::Null;

/// Immutable tabular dataset.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: IndexSet<String>,
    records: Vec<Record>,
}

impl Table {
    /// Build a table from records, collecting columns in first-seen order.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        let mut columns = IndexSet::new();
        for record in &records {
            for name in record.keys() {
                if !columns.contains(name) {
                    columns.insert(name.clone());
                }
            }
        }
        Self { columns, records }
    }

    /// Build a table from rows of `(column, cell)` pairs.
    pub fn from_rows<I, R, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Cell>,
    {
        let records = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect::<Record>()
            })
            .collect();
        Self::new(records)
    }

    /// Build a single-column table.
    pub fn from_column<I, V>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        Self::from_rows(values.into_iter().map(|v| {
            let cell: Cell = v.into();
            [(name.to_string(), cell)]
        }))
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Cell at `(row, column)`; missing keys read as null.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> &Cell {
        self.records
            .get(row)
            .and_then(|record| record.get(column))
            .unwrap_or(&NULL_CELL)
    }

    /// Iterate a column as `(row_index, cell)` pairs.
    pub fn column_cells<'a>(&'a self, column: &'a str) -> impl Iterator<Item = (usize, &'a Cell)> {
        self.records
            .iter()
            .enumerate()
            .map(move |(idx, record)| (idx, record.get(column).unwrap_or(&NULL_CELL)))
    }

    /// Number of non-null cells in a column.
    #[must_use]
    pub fn non_null_count(&self, column: &str) -> usize {
        self.column_cells(column).filter(|(_, c)| !c.is_null()).count()
    }

    /// Infer the storage kind of a column.
    #[must_use]
    pub fn column_kind(&self, column: &str) -> ColumnKind {
        let mut numeric = 0usize;
        let mut booleans = 0usize;
        let mut nulls = 0usize;
        let mut other = 0usize;
        for (_, cell) in self.column_cells(column) {
            match cell {
                Cell::Null => nulls += 1,
                Cell::Int(_) | Cell::Float(_) => numeric += 1,
                Cell::Bool(_) => booleans += 1,
                Cell::Text(_) => other += 1,
            }
        }

        if other == 0 && booleans == 0 && numeric > 0 {
            ColumnKind::Numeric
        } else if other == 0 && numeric == 0 && nulls == 0 && booleans > 0 {
            ColumnKind::Boolean
        } else {
            ColumnKind::Text
        }
    }

    /// Equality key of a whole row across all columns.
    #[must_use]
    pub fn row_key(&self, row: usize) -> Vec<CellKey> {
        self.columns
            .iter()
            .map(|column| self.cell(row, column).key())
            .collect()
    }
}
