//! Upload task state machine
//!
//! `Uploading(0..=90) -> Processing(95) -> Completed(100) | Failed`
//!
//! Completed and Failed are terminal: once reached, no further transition
//! changes the task.

use crate::constants::{COMPLETE_PROGRESS, PROCESSING_PROGRESS, UPLOAD_PROGRESS_CEILING};
use crate::types::{TableId, TaskId};
use serde::Serialize;

/// Lifecycle state of an upload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Uploading => "Uploading...",
            UploadStatus::Processing => "Processing...",
            UploadStatus::Completed => "Completed",
            UploadStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Failed)
    }
}

/// Snapshot of one submitted file's progress
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UploadTask {
    pub id: TaskId,
    pub filename: String,
    /// Declared size of the source in bytes
    pub source_len: u64,
    pub status: UploadStatus,
    /// 0..=100
    pub progress: u8,
    pub result_table_id: Option<TableId>,
    /// Summary on completion, error message on failure
    pub message: Option<String>,
}

impl UploadTask {
    pub fn new(id: TaskId, filename: impl Into<String>, source_len: u64) -> Self {
        Self {
            id,
            filename: filename.into(),
            source_len,
            status: UploadStatus::Uploading,
            progress: 0,
            result_table_id: None,
            message: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Raise upload progress. Returns `true` if the task changed.
    ///
    /// Progress never decreases and is capped below the processing checkpoint.
    pub fn advance_upload(&mut self, progress: u8) -> bool {
        let progress = progress.min(UPLOAD_PROGRESS_CEILING);
        if self.status != UploadStatus::Uploading || progress <= self.progress {
            return false;
        }
        self.progress = progress;
        true
    }

    /// Enter the decode stage. Returns `true` if the task changed.
    pub fn begin_processing(&mut self) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        self.status = UploadStatus::Processing;
        self.progress = PROCESSING_PROGRESS;
        true
    }

    /// Record a successful decode. Returns `true` if the task changed.
    pub fn complete(&mut self, table_id: TableId, summary: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = UploadStatus::Completed;
        self.progress = COMPLETE_PROGRESS;
        self.result_table_id = Some(table_id);
        self.message = Some(summary.into());
        true
    }

    /// Record a failure. Returns `true` if the task changed.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = UploadStatus::Failed;
        self.progress = 0;
        self.message = Some(message.into());
        true
    }
}

/// Upload progress for `read` of `total` bytes, scaled to `0..=90`
pub fn upload_progress(read: u64, total: u64) -> u8 {
    let ceiling = u64::from(UPLOAD_PROGRESS_CEILING);
    if total == 0 {
        return UPLOAD_PROGRESS_CEILING;
    }
    let scaled = read.saturating_mul(ceiling) / total;
    scaled.min(ceiling) as u8
}
