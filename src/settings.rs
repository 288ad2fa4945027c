//! Settings loaded from a JSON file.
//!
//! Every field has a default, so a partial (or empty) settings file is
//! valid. Unknown fields are ignored.

use crate::constants::{
    DEFAULT_DECODE_TIMEOUT_MS, DEFAULT_LOG_FILTER, DEFAULT_READ_CHUNK_BYTES, MAX_UPLOAD_BYTES,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub upload: UploadSettings,
    /// Tracing filter directive, e.g. "info" or "chartsheet=debug"
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upload: UploadSettings::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Limits applied to every upload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Largest accepted file, in bytes
    pub max_file_bytes: u64,
    /// Upper bound on decoding a single file, in milliseconds
    pub decode_timeout_ms: u64,
    /// Chunk size used when reading an upload source
    pub read_chunk_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_UPLOAD_BYTES,
            decode_timeout_ms: DEFAULT_DECODE_TIMEOUT_MS,
            read_chunk_bytes: DEFAULT_READ_CHUNK_BYTES,
        }
    }
}

impl UploadSettings {
    pub fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode_timeout_ms)
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(settings.sanitized())
    }

    /// Load settings, falling back to defaults when the file is absent or invalid
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Replace zero values that would make uploads unusable
    fn sanitized(mut self) -> Self {
        if self.upload.read_chunk_bytes == 0 {
            self.upload.read_chunk_bytes = DEFAULT_READ_CHUNK_BYTES;
        }
        if self.upload.decode_timeout_ms == 0 {
            self.upload.decode_timeout_ms = DEFAULT_DECODE_TIMEOUT_MS;
        }
        self
    }
}

/// Default settings location: `<config dir>/chartsheet/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chartsheet").join("settings.json"))
}
