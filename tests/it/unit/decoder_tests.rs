//! Unit tests for spreadsheet decoding.

use crate::helpers::{
    numbered_xlsx, region_sales_xls, region_sales_xlsx, xlsx_bytes, xlsx_with_sheets,
};
use chartsheet::data::{
    DecodeError, DecodeStage, SpreadsheetFormat, decode_spreadsheet, decode_spreadsheet_with,
};
use chartsheet::types::CellValue;
use std::ops::ControlFlow;

#[test]
fn test_decode_region_sales() {
    let table = decode_spreadsheet(&region_sales_xlsx(), "sales.xlsx").unwrap();

    assert_eq!(table.name(), "sales.xlsx");
    assert_eq!(table.headers(), &["Region", "Sales"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(0, 0), &CellValue::from("North"));
    assert_eq!(table.cell(0, 1), &CellValue::Number(100.0));
    assert_eq!(table.cell(1, 1), &CellValue::Number(150.0));
    assert_eq!(table.summary(), "2 rows, 2 columns");
}

#[test]
fn test_row_count_matches_data_rows() {
    for n in [1, 3, 40] {
        let table = decode_spreadsheet(&numbered_xlsx(n), "n.xlsx").unwrap();
        assert_eq!(table.row_count(), n);
        assert_eq!(table.column_count(), 2);
    }
}

#[test]
fn test_decode_legacy_xls() {
    let table = decode_spreadsheet(&region_sales_xls(), "sales.xls").unwrap();

    assert_eq!(table.headers(), &["Region", "Sales"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.cell(0, 0), &CellValue::from("North"));
    assert_eq!(table.cell(1, 1), &CellValue::Number(150.0));
    assert_eq!(table.summary(), "2 rows, 2 columns");
}

#[test]
fn test_legacy_content_under_xlsx_name() {
    let mut detected = None;
    let table = decode_spreadsheet_with(&region_sales_xls(), "renamed.xlsx", |stage| {
        if let DecodeStage::Detected(format) = stage {
            detected = Some(format);
        }
        ControlFlow::Continue(())
    })
    .unwrap();

    assert_eq!(detected, Some(SpreadsheetFormat::Xls));
    assert_eq!(table.headers(), &["Region", "Sales"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_header_width_ignores_wider_data_rows() {
    let bytes = xlsx_bytes(vec![row!["A", "B"], row!["x", 1.0, "extra"]]);
    let table = decode_spreadsheet(&bytes, "wide.xlsx").unwrap();

    assert_eq!(table.headers(), &["A", "B"]);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.summary(), "1 rows, 2 columns");
    assert_eq!(table.cell(0, 2), &CellValue::from("extra"));
}

#[test]
fn test_header_only_is_insufficient() {
    let bytes = xlsx_bytes(vec![row!["Region", "Sales"]]);
    let err = decode_spreadsheet(&bytes, "header.xlsx").unwrap_err();
    assert!(matches!(err, DecodeError::InsufficientData { rows: 1 }));
}

#[test]
fn test_empty_sheet_is_insufficient() {
    let bytes = xlsx_bytes(vec![]);
    let err = decode_spreadsheet(&bytes, "empty.xlsx").unwrap_err();
    assert!(matches!(err, DecodeError::InsufficientData { rows: 0 }));
}

#[test]
fn test_garbage_is_corrupt() {
    let inputs: [&[u8]; 3] = [b"", b"Region,Sales\nNorth,100", b"PK\x03\x04\x00\x00garbage"];
    for bytes in inputs {
        let err = decode_spreadsheet(bytes, "bad.xlsx").unwrap_err();
        assert!(matches!(err, DecodeError::Corrupt(_)), "{bytes:?}");
    }
}

#[test]
fn test_format_follows_content_not_extension() {
    let table = decode_spreadsheet(&region_sales_xlsx(), "renamed.xls").unwrap();
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_only_first_sheet_is_read() {
    let bytes = xlsx_with_sheets(&[
        ("Summary", vec![row!["Region", "Sales"], row!["North", 100.0]]),
        ("Detail", vec![row!["Other"], row!["x"], row!["y"]]),
    ]);
    let table = decode_spreadsheet(&bytes, "two.xlsx").unwrap();
    assert_eq!(table.headers(), &["Region", "Sales"]);
    assert_eq!(table.row_count(), 1);
}

#[test]
fn test_blank_rows_are_kept() {
    let bytes = xlsx_bytes(vec![
        row!["Region", "Sales"],
        row!["North", 100.0],
        vec![],
        row!["South", 150.0],
    ]);
    let table = decode_spreadsheet(&bytes, "gaps.xlsx").unwrap();

    assert_eq!(table.row_count(), 3);
    assert!(table.rows()[1].iter().all(CellValue::is_empty));
    assert_eq!(table.cell(1, 0), &CellValue::Empty);
    assert_eq!(table.cell(2, 0), &CellValue::from("South"));
}

#[test]
fn test_mixed_cells_and_numeric_headers() {
    let bytes = xlsx_bytes(vec![
        row!["Name", 2024.0, "Active"],
        row!["Alice", 3.5, true],
        row!["Bob"],
    ]);
    let table = decode_spreadsheet(&bytes, "mixed.xlsx").unwrap();

    assert_eq!(table.headers(), &["Name", "2024", "Active"]);
    assert_eq!(table.cell(0, 1), &CellValue::Number(3.5));
    assert_eq!(table.cell(0, 2), &CellValue::Boolean(true));
    assert_eq!(table.cell(1, 1), &CellValue::Empty);
    assert_eq!(table.cell(1, 2), &CellValue::Empty);
}

#[test]
fn test_each_decode_gets_a_fresh_id() {
    let bytes = region_sales_xlsx();
    let a = decode_spreadsheet(&bytes, "sales.xlsx").unwrap();
    let b = decode_spreadsheet(&bytes, "sales.xlsx").unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.rows(), b.rows());
}

#[test]
fn test_checkpoints_report_stages() {
    let mut stages = Vec::new();
    decode_spreadsheet_with(&region_sales_xlsx(), "sales.xlsx", |stage| {
        stages.push(stage);
        ControlFlow::Continue(())
    })
    .unwrap();

    assert!(matches!(stages[0], DecodeStage::Detected(_)));
    assert_eq!(stages[1], DecodeStage::WorkbookOpened { sheets: 1 });
    assert_eq!(stages[2], DecodeStage::SheetLoaded { rows: 3, columns: 2 });
    assert_eq!(stages.last(), Some(&DecodeStage::RowsConverted { rows: 3 }));
}

#[test]
fn test_checkpoint_break_cancels_after_open() {
    let err = decode_spreadsheet_with(&region_sales_xlsx(), "sales.xlsx", |stage| {
        if matches!(stage, DecodeStage::SheetLoaded { .. }) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .unwrap_err();
    assert!(matches!(err, DecodeError::Cancelled));
}
