//! Single test binary entry point.
//!
//! All tests are compiled into one binary to keep linking overhead low.
//!
//! Structure:
//! - helpers: in-memory workbook fixtures
//! - integration: upload-to-chart workflows
//! - unit: single-component tests

mod unit;
