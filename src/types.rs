//! Core data model: decoded cells, tables and chart kinds.

use crate::data::{DecodeError, DecodeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a decoded table, unique per ingestion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(Uuid);

impl TableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of an upload task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Cells
// ============================================================================

/// A single decoded cell value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Empty,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Render the cell as text
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                // Format nicely: no trailing zeros for whole numbers
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Numeric value of a `Number` cell. Other variants are not coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) | CellValue::Boolean(_) | CellValue::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

// ============================================================================
// Table
// ============================================================================

/// One decoded sheet: a header row plus at least one data row.
///
/// Tables are immutable once built. Rows keep the sheet's native order and
/// may be shorter than `headers`; use [`Table::cell`] to read missing
/// trailing cells as `Empty`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Table {
    id: TableId,
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, rejecting one without data rows
    pub fn new(
        id: TableId,
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> DecodeResult<Self> {
        if rows.is_empty() {
            return Err(DecodeError::InsufficientData {
                rows: usize::from(!headers.is_empty()),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            headers,
            rows,
        })
    }

    /// Build a table from a sheet grid whose first row holds the headers.
    ///
    /// Trailing `Empty` cells are dropped from every row, so the header count
    /// is the header row's own width rather than the sheet's. Header cells
    /// are coerced to text.
    pub fn from_grid(
        id: TableId,
        name: impl Into<String>,
        grid: Vec<Vec<CellValue>>,
    ) -> DecodeResult<Self> {
        if grid.len() < 2 {
            return Err(DecodeError::InsufficientData { rows: grid.len() });
        }
        let mut grid = grid.into_iter().map(trim_trailing_empty);
        let headers = grid
            .next()
            .map(|row| row.iter().map(CellValue::to_text).collect())
            .unwrap_or_default();
        Self::new(id, name, headers, grid.collect())
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Position of the first header named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `col`), `Empty` when the row is too short or absent
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Human-readable shape, e.g. "2 rows, 3 columns"
    pub fn summary(&self) -> String {
        format!("{} rows, {} columns", self.row_count(), self.column_count())
    }
}

fn trim_trailing_empty(mut row: Vec<CellValue>) -> Vec<CellValue> {
    let len = row.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1);
    row.truncate(len);
    row
}

// ============================================================================
// Chart Kinds
// ============================================================================

/// Types of charts a table can be projected into
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
            ChartKind::Scatter => "Scatter",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Scatter => "Scatter Plot",
        }
    }

    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Bar,
            ChartKind::Line,
            ChartKind::Pie,
            ChartKind::Scatter,
        ]
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::all()
            .iter()
            .copied()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown chart kind: {s}"))
    }
}
