//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - App config loading, saving and per-field defaults
//! - The on-disk layout of the settings file
//! - Rejection of invalid persisted settings

use camino::Utf8PathBuf;
use optps2::models::{AppConfig, CanonicalSettings, RenderingBackend, ResolutionScale};
use optps2::{ConfigManager, PersistenceError, SettingsPersistence};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(
        manager.settings_path(),
        config_path.join("OptPS2 Settings.yaml").as_path()
    );
}

#[test]
fn test_load_default_app_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let config = manager.load_app_config().unwrap();

    assert_eq!(config.app.splash_duration(), Duration::from_secs(6));
    assert_eq!(config.app.detection_timeout(), Duration::from_secs(5));
    assert_eq!(config.app.simulated_latency(), Duration::from_secs(2));
    assert_eq!(config.app.log_directory, "logs");
    assert!(!config.app.debug_mode);
    assert!(!config.app.json_logs);
}

#[test]
fn test_app_config_yaml_keys() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(
        config_path.join("OptPS2 Config.yaml"),
        "OptPS2_Config:\n  Splash Duration Ms: 3000\n  JSON Logs: true\n  Log Directory: /tmp/optps2\n",
    )
    .unwrap();

    let config = manager.load_app_config().unwrap();
    assert_eq!(config.app.splash_duration_ms, 3000);
    assert!(config.app.json_logs);
    assert_eq!(config.app.log_directory, "/tmp/optps2");
    assert_eq!(config.app.detection_timeout_ms, 5000);
}

#[test]
fn test_invalid_app_config_is_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(
        config_path.join("OptPS2 Config.yaml"),
        "OptPS2_Config:\n  Splash Duration Ms: soon\n",
    )
    .unwrap();

    let err = manager.load_app_config().unwrap_err();
    assert!(err.to_string().contains("Failed to parse app config"));
}

#[test]
fn test_save_app_config_round_trip() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut config = AppConfig::default();
    config.app.console_logging = false;
    manager.save_app_config(&config).unwrap();

    let contents = fs::read_to_string(config_path.join("OptPS2 Config.yaml")).unwrap();
    assert!(contents.contains("OptPS2_Config"));
    assert!(contents.contains("Console Logging: false"));
    assert_eq!(manager.load_app_config().unwrap(), config);
}

#[test]
fn test_settings_file_uses_canonical_tokens() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let settings = CanonicalSettings {
        resolution_scale: ResolutionScale::X3,
        rendering_backend: RenderingBackend::OpenGl,
        ..CanonicalSettings::default()
    };
    manager.save(&settings).unwrap();

    let contents = fs::read_to_string(manager.settings_path()).unwrap();
    assert!(contents.contains("OptPS2_Settings"));
    assert!(contents.contains("Resolution Scale: 3x"));
    assert!(contents.contains("Rendering Backend: opengl"));

    assert_eq!(manager.load().unwrap(), Some(settings));
}

#[test]
fn test_hand_edited_settings_with_missing_optional_fields() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(
        manager.settings_path(),
        "OptPS2_Settings:\n  Resolution Scale: 1x\n  Texture Quality: low\n  Anti Aliasing: off\n  Anisotropic Filtering: '0x'\n  Rendering Backend: software\n  FPS Limit: 30\n",
    )
    .unwrap();

    let settings = manager.load().unwrap().unwrap();
    assert_eq!(settings.resolution_scale, ResolutionScale::X1);
    assert_eq!(settings.fps_limit, 30);
    assert!(settings.audio_enabled);
    assert_eq!(settings.preset_name, "Balanced");
}

#[test]
fn test_unknown_enum_token_is_parse_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    fs::write(
        manager.settings_path(),
        "OptPS2_Settings:\n  Resolution Scale: 4x\n  Texture Quality: low\n  Anti Aliasing: off\n  Anisotropic Filtering: '0x'\n  Rendering Backend: software\n  FPS Limit: 30\n",
    )
    .unwrap();

    let err = manager.load().unwrap_err();
    assert!(matches!(err, PersistenceError::Parse { .. }));
}

#[test]
fn test_blank_storage_path_is_parse_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let settings = CanonicalSettings {
        custom_storage_path: Utf8PathBuf::from("  "),
        ..CanonicalSettings::default()
    };
    manager.save(&settings).unwrap();

    assert!(matches!(
        manager.load(),
        Err(PersistenceError::Parse { .. })
    ));
}
