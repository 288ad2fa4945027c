//! Error types for decoding and uploads
//!
//! Every error here is per-file: it ends up as the message of a failed
//! upload task and never affects sibling uploads or registered tables.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while turning spreadsheet bytes into a table
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Bytes are neither a legacy nor a zip-packaged workbook, or the
    /// container is malformed
    #[error("Failed to parse the Excel file: {0}")]
    Corrupt(String),

    /// Fewer than two rows (header plus one data row) were found
    #[error("File must contain a header row and at least one data row (found {rows})")]
    InsufficientData { rows: usize },

    /// A decode checkpoint asked to stop
    #[error("Decoding cancelled")]
    Cancelled,
}

/// Result type alias for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can fail an upload task
#[derive(Error, Debug)]
pub enum UploadError {
    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes (max {max} bytes)")]
    SizeExceeded { size: u64, max: u64 },

    /// Declared type is not a supported spreadsheet format
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Decoder rejected the bytes
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Reading the upload source failed
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Decode did not finish in time
    #[error("Decoding timed out after {0:?}")]
    TimedOut(Duration),

    /// Task was cancelled or removed
    #[error("Upload cancelled")]
    Cancelled,

    /// The blocking decode worker panicked or was aborted
    #[error("Decode worker failed: {0}")]
    Worker(String),
}

/// Result type alias for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

impl From<calamine::XlsError> for DecodeError {
    fn from(e: calamine::XlsError) -> Self {
        DecodeError::Corrupt(e.to_string())
    }
}

impl From<calamine::XlsxError> for DecodeError {
    fn from(e: calamine::XlsxError) -> Self {
        DecodeError::Corrupt(e.to_string())
    }
}
