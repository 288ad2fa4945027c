//! Spreadsheet ingestion and chart projection.
//!
//! Uploaded `.xls` / `.xlsx` files are decoded into immutable [`types::Table`]s
//! by the [`upload`] lifecycle, kept in a [`registry::TableRegistry`], and
//! projected on demand into bar, line, pie or scatter series with
//! [`data::project`].

pub mod constants;
pub mod data;
pub mod perf;
pub mod registry;
pub mod settings;
pub mod types;
pub mod upload;
