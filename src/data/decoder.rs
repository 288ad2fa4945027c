//! Spreadsheet decoding
//!
//! Turns raw `.xls` / `.xlsx` bytes into a [`Table`]. Only the first sheet
//! (in declared workbook order) is read; its used range becomes a grid whose
//! first row is the header row.
//!
//! Decoding is atomic: callers get either a complete table or an error.

use crate::constants::{DECODE_CHECKPOINT_ROWS, SLOW_DECODE_MS};
use crate::data::error::{DecodeError, DecodeResult};
use crate::data::format::SpreadsheetFormat;
use crate::perf::ScopedTimer;
use crate::types::{CellValue, Table, TableId};
use calamine::{Data, Range, Reader, Xls, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::ops::ControlFlow;

/// Progress points reported by [`decode_spreadsheet_with`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeStage {
    /// Container identified from the content
    Detected(SpreadsheetFormat),
    /// Workbook parsed, with its sheet count
    WorkbookOpened { sheets: usize },
    /// First sheet's used range loaded
    SheetLoaded { rows: usize, columns: usize },
    /// Rows converted so far
    RowsConverted { rows: usize },
}

/// Decode spreadsheet bytes into a table
pub fn decode_spreadsheet(bytes: &[u8], filename: &str) -> DecodeResult<Table> {
    decode_spreadsheet_with(bytes, filename, |_| ControlFlow::Continue(()))
}

/// Decode spreadsheet bytes, reporting each stage to `checkpoint`.
///
/// Returning `ControlFlow::Break(())` from the checkpoint abandons the
/// decode with [`DecodeError::Cancelled`].
pub fn decode_spreadsheet_with<F>(
    bytes: &[u8],
    filename: &str,
    mut checkpoint: F,
) -> DecodeResult<Table>
where
    F: FnMut(DecodeStage) -> ControlFlow<()>,
{
    let _timer = ScopedTimer::new("decode_spreadsheet", SLOW_DECODE_MS);

    let format = SpreadsheetFormat::sniff(bytes).ok_or_else(|| {
        DecodeError::Corrupt("content is neither an .xls nor an .xlsx workbook".to_string())
    })?;
    check(&mut checkpoint, DecodeStage::Detected(format))?;

    let cursor = Cursor::new(bytes);
    let range = match format {
        SpreadsheetFormat::Xls => {
            let workbook = Xls::new(cursor)?;
            first_sheet_range(workbook, &mut checkpoint)?
        }
        SpreadsheetFormat::Xlsx => {
            let workbook = Xlsx::new(cursor)?;
            first_sheet_range(workbook, &mut checkpoint)?
        }
    };

    let Some(range) = range else {
        return Err(DecodeError::InsufficientData { rows: 0 });
    };
    let (height, width) = range.get_size();
    check(
        &mut checkpoint,
        DecodeStage::SheetLoaded {
            rows: height,
            columns: width,
        },
    )?;
    if height < 2 {
        return Err(DecodeError::InsufficientData { rows: height });
    }

    let mut grid = Vec::with_capacity(height);
    for row in range.rows() {
        grid.push(row.iter().map(convert_cell).collect::<Vec<_>>());
        if grid.len() % DECODE_CHECKPOINT_ROWS == 0 {
            check(&mut checkpoint, DecodeStage::RowsConverted { rows: grid.len() })?;
        }
    }
    check(&mut checkpoint, DecodeStage::RowsConverted { rows: grid.len() })?;

    let table = Table::from_grid(TableId::new(), filename, grid)?;
    tracing::debug!(
        filename,
        format = format.extension(),
        rows = table.row_count(),
        columns = table.column_count(),
        "Decoded spreadsheet"
    );
    Ok(table)
}

/// Load the used range of the workbook's first sheet.
///
/// Returns `None` for a workbook without sheets.
fn first_sheet_range<R, RS, F>(
    mut workbook: R,
    checkpoint: &mut F,
) -> DecodeResult<Option<Range<Data>>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    DecodeError: From<R::Error>,
    F: FnMut(DecodeStage) -> ControlFlow<()>,
{
    let names = workbook.sheet_names();
    check(checkpoint, DecodeStage::WorkbookOpened { sheets: names.len() })?;

    let Some(first) = names.first() else {
        return Ok(None);
    };
    let range = workbook.worksheet_range(first)?;
    Ok(Some(range))
}

fn check<F>(checkpoint: &mut F, stage: DecodeStage) -> DecodeResult<()>
where
    F: FnMut(DecodeStage) -> ControlFlow<()>,
{
    match checkpoint(stage) {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(()) => Err(DecodeError::Cancelled),
    }
}

/// Map a calamine cell onto the table's cell model.
///
/// Dates stay as their serial number; no number formatting is applied.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
