//! File-level tests for tonegen-config.

use tempfile::TempDir;
use tonegen_config::{ConfigError, ToneConfig};

#[test]
fn save_then_load_preserves_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = ToneConfig::default();
    config.audio.device = Some("USB Audio".into());
    config.audio.buffer_size = 256;
    config.timing.retune_glide_ms = 5.0;
    config.scope.refresh_hz = 30;
    config.save(&path).unwrap();

    let loaded = ToneConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn load_or_default_prefers_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[scope]\nrefresh_hz = 120\n").unwrap();

    let config = ToneConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.scope.refresh_hz, 120);
    assert_eq!(config.audio.sample_rate, 48000);
}

#[test]
fn missing_explicit_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = ToneConfig::load_or_default(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }), "got {err}");
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[audio]\nbuffer_size = 0\n").unwrap();
    let err = ToneConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("audio.buffer_size"), "got {err}");
}
