//! Upload lifecycle
//!
//! Per-file asynchronous processing from raw bytes to a registered table,
//! with progress reporting and cancellation.

mod cancel;
mod manager;
mod task;

pub use cancel::*;
pub use manager::*;
pub use task::*;
