//! Spreadsheet container detection
//!
//! Uploads are screened by their declared type before reading, and the
//! decoder then picks a reader from the content's magic bytes.

use serde::Serialize;
use std::path::Path;

/// OLE compound file signature used by legacy `.xls` workbooks
const XLS_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Zip local file header signature used by `.xlsx` workbooks
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Supported spreadsheet containers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SpreadsheetFormat {
    /// Legacy binary workbook
    Xls,
    /// Zip-packaged XML workbook
    Xlsx,
}

impl SpreadsheetFormat {
    pub const XLS_MIME: &'static str = "application/vnd.ms-excel";
    pub const XLSX_MIME: &'static str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

    /// Detect the container from leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&XLS_MAGIC) {
            Some(Self::Xls)
        } else if bytes.starts_with(&ZIP_MAGIC) {
            Some(Self::Xlsx)
        } else {
            None
        }
    }

    pub fn from_mime(content_type: &str) -> Option<Self> {
        // Ignore parameters such as "; charset=binary"
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(Self::XLS_MIME) {
            Some(Self::Xls)
        } else if essence.eq_ignore_ascii_case(Self::XLSX_MIME) {
            Some(Self::Xlsx)
        } else {
            None
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "xls" => Some(Self::Xls),
                "xlsx" => Some(Self::Xlsx),
                _ => None,
            })
    }

    /// Resolve the declared type of an upload.
    ///
    /// A file is accepted when either its content type or its extension
    /// names a supported container.
    pub fn from_declared(content_type: Option<&str>, filename: &str) -> Option<Self> {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| Self::from_filename(filename))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Xls => Self::XLS_MIME,
            Self::Xlsx => Self::XLSX_MIME,
        }
    }
}
