//! Configuration File Integration Tests
//!
//! The show/set/reset flow behind `design-studio config`.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use design_studio::{AppConfig, AppError, ConfigService, SettingsUpdate};

#[test]
fn test_set_then_reset_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings").join("config.json");

    let mut service = ConfigService::load(&path).unwrap();
    assert_eq!(service.get_config(), &AppConfig::default());
    assert!(!path.exists());

    let updated = service
        .update_config(SettingsUpdate {
            workspace_root: Some(PathBuf::from("studio")),
            preview_port: Some(4300),
            max_iterations: Some(4),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(updated.preview.port, 4300);
    assert!(path.exists());

    let saved = ConfigService::load(&path).unwrap();
    assert_eq!(saved.get_config().agent.max_iterations, 4);
    let effective = saved.resolved(Path::new("/srv/app"));
    assert_eq!(effective.preview.port, 4300);
    assert!(effective.preview_root.is_absolute());

    service.reset().unwrap();
    let restored = ConfigService::load(&path).unwrap();
    assert_eq!(restored.get_config(), &AppConfig::default());
}

#[test]
fn test_invalid_update_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut service = ConfigService::load(&path).unwrap();

    let err = service
        .update_config(SettingsUpdate {
            preview_port: Some(0),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(!path.exists());
}
