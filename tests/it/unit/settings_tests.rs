//! Unit tests for settings loading.

use chartsheet::constants::{DEFAULT_DECODE_TIMEOUT_MS, DEFAULT_READ_CHUNK_BYTES, MAX_UPLOAD_BYTES};
use chartsheet::settings::{Settings, UploadSettings, default_settings_path};
use std::time::Duration;
use tempfile::TempDir;

fn write_settings(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("settings.json");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.upload.max_file_bytes, 10 * 1024 * 1024);
    assert_eq!(settings.upload.max_file_bytes, MAX_UPLOAD_BYTES);
    assert_eq!(settings.upload.decode_timeout(), Duration::from_secs(30));
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, r#"{ "upload": { "max_file_bytes": 2048 }, "extra": 1 }"#);

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.upload.max_file_bytes, 2048);
    assert_eq!(settings.upload.read_chunk_bytes, DEFAULT_READ_CHUNK_BYTES);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn test_zero_values_are_replaced() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(
        &dir,
        r#"{ "upload": { "read_chunk_bytes": 0, "decode_timeout_ms": 0 } }"#,
    );

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.upload.read_chunk_bytes, DEFAULT_READ_CHUNK_BYTES);
    assert_eq!(settings.upload.decode_timeout_ms, DEFAULT_DECODE_TIMEOUT_MS);
}

#[test]
fn test_invalid_file_errors_with_path() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, "{ not json");

    let err = Settings::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("settings.json"));

    assert_eq!(Settings::load_or_default(Some(&path)), Settings::default());
}

#[test]
fn test_missing_file_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    assert!(Settings::load(&path).is_err());
    assert_eq!(Settings::load_or_default(Some(&path)), Settings::default());
    assert_eq!(Settings::load_or_default(None), Settings::default());
}

#[test]
fn test_settings_serialize_back() {
    let settings = Settings {
        upload: UploadSettings {
            max_file_bytes: 1,
            decode_timeout_ms: 5_000,
            read_chunk_bytes: 16,
        },
        log_filter: "chartsheet=debug".to_string(),
    };
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, &serde_json::to_string(&settings).unwrap());
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn test_default_path_is_under_app_dir() {
    if let Some(path) = default_settings_path() {
        assert!(path.ends_with("chartsheet/settings.json"));
    }
}

#[test]
fn test_sub_second_decode_timeout() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, r#"{ "upload": { "decode_timeout_ms": 250 } }"#);

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.upload.decode_timeout(), Duration::from_millis(250));
}
