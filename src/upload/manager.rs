//! Upload manager
//!
//! Owns every in-flight and finished [`UploadTask`], keyed by task id. Each
//! submitted file runs as its own tokio task:
//!
//! 1. validate declared size and type (no bytes read on rejection)
//! 2. read the source in chunks, publishing byte-derived progress
//! 3. decode on a blocking worker, bounded by the configured timeout
//! 4. register the table and complete, or fail with the error message
//!
//! Status snapshots are published on a broadcast channel. Tasks are
//! independent: a failure only ever touches its own entry.

use crate::constants::STATUS_CHANNEL_CAPACITY;
use crate::data::{
    DecodeError, SpreadsheetFormat, UploadError, UploadResult, decode_spreadsheet_with,
};
use crate::perf::measure;
use crate::registry::TableRegistry;
use crate::settings::UploadSettings;
use crate::types::{Table, TaskId};
use crate::upload::cancel::CancelHandle;
use crate::upload::task::{UploadTask, upload_progress};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, trace, warn};

/// A file handed over by the upload collaborator
pub struct UploadFile {
    pub filename: String,
    /// MIME type declared by the client, if any
    pub content_type: Option<String>,
    /// Size declared by the client, used for validation and progress
    pub declared_size: u64,
    source: Box<dyn AsyncRead + Send + Unpin>,
}

impl UploadFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        declared_size: u64,
        source: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            declared_size,
            source: Box::new(source),
        }
    }

    /// An upload whose bytes are already in memory
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let len = bytes.len() as u64;
        Self::new(filename, None, len, Cursor::new(bytes))
    }

    /// An upload streamed from a file on disk
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(filename, None, len, file))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Handle to a submitted upload
pub struct UploadHandle {
    pub id: TaskId,
    join: JoinHandle<UploadTask>,
}

impl UploadHandle {
    /// Wait for the task to reach a terminal state
    pub async fn wait(self) -> Result<UploadTask, JoinError> {
        self.join.await
    }
}

struct TaskEntry {
    task: UploadTask,
    cancel: CancelHandle,
}

#[derive(Default)]
struct TaskList {
    entries: HashMap<TaskId, TaskEntry>,
    /// Submission order of the ids in `entries`
    order: Vec<TaskId>,
}

struct Inner {
    tasks: RwLock<TaskList>,
    registry: Arc<TableRegistry>,
    settings: UploadSettings,
    events: broadcast::Sender<UploadTask>,
}

/// Tracks uploads from raw bytes to a registered table
#[derive(Clone)]
pub struct UploadManager {
    inner: Arc<Inner>,
}

impl UploadManager {
    pub fn new(registry: Arc<TableRegistry>, settings: UploadSettings) -> Self {
        let (events, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                tasks: RwLock::new(TaskList::default()),
                registry,
                settings,
                events,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<TableRegistry> {
        &self.inner.registry
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.inner.settings
    }

    /// Receive a snapshot on every status or progress change
    pub fn subscribe(&self) -> broadcast::Receiver<UploadTask> {
        self.inner.events.subscribe()
    }

    /// Start tracking and processing a file.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, file: UploadFile) -> UploadHandle {
        let id = TaskId::new();
        let task = UploadTask::new(id, file.filename.clone(), file.declared_size);
        let cancel = CancelHandle::new();
        {
            let mut tasks = self.inner.tasks.write();
            tasks.entries.insert(
                id,
                TaskEntry {
                    task: task.clone(),
                    cancel: cancel.clone(),
                },
            );
            tasks.order.push(id);
        }
        debug!(task_id = %id, filename = %task.filename, "Upload submitted");
        self.inner.publish(&task);

        let inner = Arc::clone(&self.inner);
        let join = tokio::spawn(async move { inner.run(task, file, cancel).await });
        UploadHandle { id, join }
    }

    /// Submit several files; each is processed independently
    pub fn submit_all(&self, files: impl IntoIterator<Item = UploadFile>) -> Vec<UploadHandle> {
        files.into_iter().map(|file| self.submit(file)).collect()
    }

    pub fn task(&self, id: TaskId) -> Option<UploadTask> {
        self.inner.tasks.read().entries.get(&id).map(|e| e.task.clone())
    }

    /// All tracked tasks in submission order
    pub fn tasks(&self) -> Vec<UploadTask> {
        let tasks = self.inner.tasks.read();
        tasks
            .order
            .iter()
            .filter_map(|id| tasks.entries.get(id).map(|e| e.task.clone()))
            .collect()
    }

    /// Cancel an in-flight upload. Returns `false` for unknown or finished tasks.
    pub fn cancel(&self, id: TaskId) -> bool {
        let tasks = self.inner.tasks.read();
        match tasks.entries.get(&id) {
            Some(entry) if !entry.task.is_terminal() => {
                entry.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Stop tracking a task, cancelling it if still in flight
    pub fn remove(&self, id: TaskId) -> Option<UploadTask> {
        let entry = {
            let mut tasks = self.inner.tasks.write();
            tasks.order.retain(|existing| *existing != id);
            tasks.entries.remove(&id)
        }?;
        entry.cancel.cancel();
        debug!(task_id = %id, "Upload removed");
        Some(entry.task)
    }
}

impl Inner {
    /// Store and broadcast a task snapshot, unless the task was removed
    fn publish(&self, task: &UploadTask) {
        {
            let mut tasks = self.tasks.write();
            match tasks.entries.get_mut(&task.id) {
                Some(entry) => entry.task = task.clone(),
                None => return,
            }
        }
        // No subscribers is fine
        let _ = self.events.send(task.clone());
    }

    async fn run(&self, mut task: UploadTask, file: UploadFile, cancel: CancelHandle) -> UploadTask {
        let outcome = match self.ingest(&mut task, file, &cancel).await {
            Ok(table) => self.commit(&mut task, table, &cancel),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!(task_id = %task.id, filename = %task.filename, error = %e, "Upload failed");
            task.fail(e.to_string());
        }
        self.publish(&task);
        task
    }

    /// Register a decoded table and complete the task.
    ///
    /// Runs under the task list lock, so `cancel` and `remove` either land
    /// before (and the table is dropped) or see a completed task.
    fn commit(&self, task: &mut UploadTask, table: Table, cancel: &CancelHandle) -> UploadResult<()> {
        let mut tasks = self.tasks.write();
        let entry = match tasks.entries.get_mut(&task.id) {
            Some(entry) if !cancel.is_cancelled() => entry,
            _ => return Err(UploadError::Cancelled),
        };
        let table_id = table.id();
        let summary = table.summary();
        self.registry.insert(table);
        info!(task_id = %task.id, table_id = %table_id, filename = %task.filename, %summary, "Upload completed");
        task.complete(table_id, summary);
        entry.task = task.clone();
        Ok(())
    }

    async fn ingest(
        &self,
        task: &mut UploadTask,
        file: UploadFile,
        cancel: &CancelHandle,
    ) -> UploadResult<Table> {
        self.validate(&file)?;

        let UploadFile {
            filename,
            declared_size,
            mut source,
            ..
        } = file;
        let max = self.settings.max_file_bytes;
        let capacity = declared_size.min(max) as usize;
        let mut bytes = Vec::with_capacity(capacity);
        let mut chunk = vec![0u8; self.settings.read_chunk_bytes.max(1)];

        loop {
            let n = tokio::select! {
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                read = source.read(&mut chunk) => read?,
            };
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..n]);
            let size = bytes.len() as u64;
            if size > max {
                return Err(UploadError::SizeExceeded { size, max });
            }
            if task.advance_upload(upload_progress(size, declared_size)) {
                trace!(task_id = %task.id, progress = task.progress, "Upload progress");
                self.publish(task);
            }
        }

        if task.begin_processing() {
            debug!(task_id = %task.id, bytes = bytes.len(), "Decoding");
            self.publish(task);
        }

        let decode_cancel = cancel.clone();
        let task_id = task.id;
        let decode = tokio::task::spawn_blocking(move || {
            let (result, elapsed_ms) = measure(|| {
                decode_spreadsheet_with(&bytes, &filename, |stage| {
                    trace!(task_id = %task_id, ?stage, "Decode checkpoint");
                    if decode_cancel.is_cancelled() {
                        ControlFlow::Break(())
                    } else {
                        ControlFlow::Continue(())
                    }
                })
            });
            debug!(task_id = %task_id, elapsed_ms = format!("{:.2}", elapsed_ms), "Decode finished");
            result
        });

        let timeout = self.settings.decode_timeout();
        let table = tokio::select! {
            _ = cancel.cancelled() => return Err(UploadError::Cancelled),
            outcome = tokio::time::timeout(timeout, decode) => match outcome {
                Err(_) => {
                    // Stop the worker at its next checkpoint
                    cancel.cancel();
                    return Err(UploadError::TimedOut(timeout));
                }
                Ok(Err(join)) => return Err(UploadError::Worker(join.to_string())),
                Ok(Ok(Err(DecodeError::Cancelled))) => return Err(UploadError::Cancelled),
                Ok(Ok(result)) => result?,
            },
        };
        Ok(table)
    }

    /// Pre-decode checks on declared metadata
    fn validate(&self, file: &UploadFile) -> UploadResult<()> {
        let max = self.settings.max_file_bytes;
        if file.declared_size > max {
            return Err(UploadError::SizeExceeded {
                size: file.declared_size,
                max,
            });
        }
        if SpreadsheetFormat::from_declared(file.content_type.as_deref(), &file.filename).is_none() {
            let declared = file
                .content_type
                .clone()
                .unwrap_or_else(|| file.filename.clone());
            return Err(UploadError::UnsupportedFormat(declared));
        }
        Ok(())
    }
}
