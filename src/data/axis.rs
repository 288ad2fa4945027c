//! Axis selection for chart building
//!
//! Keeps the X and Y column choices legal: both name existing headers when
//! the table has them, and Y is never offered the column chosen for X.

use crate::types::Table;
use serde::{Deserialize, Serialize};

/// Header names chosen for the X and Y axes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x: String,
    pub y: String,
}

impl AxisSelection {
    /// First header on X, second on Y; empty names when a header is missing
    pub fn default_for(table: &Table) -> Self {
        let headers = table.headers();
        Self {
            x: headers.first().cloned().unwrap_or_default(),
            y: headers.get(1).cloned().unwrap_or_default(),
        }
    }

    /// Choose a new X column.
    ///
    /// When Y currently names the new X column, Y moves to the first
    /// remaining candidate (or is cleared when none exists).
    pub fn set_x(&mut self, table: &Table, x: impl Into<String>) {
        self.x = x.into();
        if self.y == self.x {
            self.y = y_candidates(table.headers(), &self.x)
                .first()
                .map(|h| (*h).to_string())
                .unwrap_or_default();
        }
    }

    /// Choose a new Y column. Returns `false` and keeps the current choice
    /// when `y` is not a candidate for the current X.
    pub fn set_y(&mut self, table: &Table, y: &str) -> bool {
        if !y_candidates(table.headers(), &self.x).contains(&y) {
            return false;
        }
        self.y = y.to_string();
        true
    }

    /// Both axes resolve to columns of `table`
    pub fn is_complete(&self, table: &Table) -> bool {
        table.column_index(&self.x).is_some() && table.column_index(&self.y).is_some()
    }
}

/// Headers offered for the Y axis: every header except those named `x`
pub fn y_candidates<'a>(headers: &'a [String], x: &str) -> Vec<&'a str> {
    headers
        .iter()
        .map(String::as_str)
        .filter(|h| *h != x)
        .collect()
}
