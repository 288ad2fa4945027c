//! Spreadsheet decoding and chart projection
//!
//! This module turns uploaded workbook bytes into [`Table`](crate::types::Table)s
//! and tables into chart-ready series.
//!
//! ## Error Handling
//!
//! Decoding returns `DecodeResult<T>`:
//! - `Corrupt`: bytes are not a readable `.xls` / `.xlsx` workbook
//! - `InsufficientData`: fewer than a header row plus one data row
//!
//! Projection never fails; unknown columns give an empty series.

mod axis;
mod chart_engine;
mod decoder;
mod error;
mod format;

pub use axis::*;
pub use chart_engine::*;
pub use decoder::*;
pub use error::*;
pub use format::*;
