//! Application-wide constants.
//!
//! Centralizes limits and progress checkpoints so the upload lifecycle,
//! settings defaults and tests agree on the same numbers.

// ============================================================================
// Upload Limits
// ============================================================================

/// Maximum accepted upload size in bytes (10 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Default chunk size used when reading an upload source
pub const DEFAULT_READ_CHUNK_BYTES: usize = 64 * 1024;

/// Default upper bound on a single decode, in milliseconds
pub const DEFAULT_DECODE_TIMEOUT_MS: u64 = 30_000;

/// Capacity of the upload status broadcast channel
pub const STATUS_CHANNEL_CAPACITY: usize = 256;

// ============================================================================
// Progress Checkpoints
// ============================================================================

/// Highest progress reported while bytes are still being read
pub const UPLOAD_PROGRESS_CEILING: u8 = 90;

/// Progress reported while the decoder is running
pub const PROCESSING_PROGRESS: u8 = 95;

/// Progress of a completed task
pub const COMPLETE_PROGRESS: u8 = 100;

// ============================================================================
// Decoding
// ============================================================================

/// Number of converted rows between two decode checkpoints
pub const DECODE_CHECKPOINT_ROWS: usize = 1024;

/// Decode duration (ms) above which a slow-operation warning is logged
pub const SLOW_DECODE_MS: f64 = 500.0;

// ============================================================================
// Logging
// ============================================================================

/// Environment variable holding the tracing filter for the binary
pub const LOG_ENV_VAR: &str = "CHARTSHEET_LOG";

/// Tracing filter used when neither the environment nor settings provide one
pub const DEFAULT_LOG_FILTER: &str = "info";
