use crate::models::{AppConfig, CanonicalSettings, SettingsFile};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use thiserror::Error;

/// Errors from reading or writing persisted settings.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    #[error("Persisted settings are invalid: {0}")]
    Invalid(String),
}

/// Storage for [`CanonicalSettings`] between sessions.
pub trait SettingsPersistence: Send + Sync {
    /// Load persisted settings. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<CanonicalSettings>, PersistenceError>;

    fn save(&self, settings: &CanonicalSettings) -> Result<(), PersistenceError>;
}

/// Configuration manager for loading and saving YAML configuration files.
///
/// Manages two files inside the data directory:
/// - App config (`OptPS2 Config.yaml`): startup timings, logging preferences
/// - Settings (`OptPS2 Settings.yaml`): the user's emulator settings
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    app_config_path: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing configuration files (e.g., "OptPS2 Data")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            app_config_path: config_dir.join("OptPS2 Config.yaml"),
            settings_path: config_dir.join("OptPS2 Settings.yaml"),
            config_dir,
        })
    }

    /// Load the app configuration file.
    ///
    /// # Returns
    /// The loaded AppConfig, or default if file doesn't exist
    pub fn load_app_config(&self) -> Result<AppConfig> {
        if !self.app_config_path.exists() {
            tracing::warn!(
                "App config file not found at {}, using defaults",
                self.app_config_path
            );
            return Ok(AppConfig::default());
        }

        let file_contents = fs::read_to_string(&self.app_config_path)
            .with_context(|| format!("Failed to read app config: {}", self.app_config_path))?;

        let config: AppConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse app config: {}", self.app_config_path))?;

        tracing::info!("Loaded app config from {}", self.app_config_path);
        Ok(config)
    }

    /// Save the app configuration file.
    pub fn save_app_config(&self, config: &AppConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize app config to YAML")?;

        fs::write(&self.app_config_path, yaml_string)
            .with_context(|| format!("Failed to write app config: {}", self.app_config_path))?;

        tracing::info!("Saved app config to {}", self.app_config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

impl SettingsPersistence for ConfigManager {
    fn load(&self) -> Result<Option<CanonicalSettings>, PersistenceError> {
        if !self.settings_path.exists() {
            tracing::debug!("No saved settings at {}", self.settings_path);
            return Ok(None);
        }

        let file_contents =
            fs::read_to_string(&self.settings_path).map_err(|source| PersistenceError::Io {
                path: self.settings_path.clone(),
                source,
            })?;

        let file: SettingsFile =
            serde_yaml_ng::from_str(&file_contents).map_err(|e| PersistenceError::Parse {
                path: self.settings_path.clone(),
                message: e.to_string(),
            })?;

        // Deserialization only checks enum membership; ranges are checked here.
        file.settings
            .validate()
            .map_err(|message| PersistenceError::Parse {
                path: self.settings_path.clone(),
                message,
            })?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(Some(file.settings))
    }

    fn save(&self, settings: &CanonicalSettings) -> Result<(), PersistenceError> {
        let file = SettingsFile {
            settings: settings.clone(),
        };
        let yaml_string = serde_yaml_ng::to_string(&file)
            .map_err(|e| PersistenceError::Serialize(e.to_string()))?;

        fs::write(&self.settings_path, yaml_string).map_err(|source| PersistenceError::Io {
            path: self.settings_path.clone(),
            source,
        })?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AntiAliasing, ResolutionScale};
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(root.join("OptPS2 Data")).unwrap();
        assert!(manager.config_dir().exists());
    }

    #[test]
    fn test_missing_app_config_uses_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let config = manager.load_app_config().unwrap();
        assert_eq!(config.app.splash_duration_ms, 6000);
        assert!(config.app.console_logging);
    }

    #[test]
    fn test_load_save_app_config() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut config = AppConfig::default();
        config.app.debug_mode = true;
        config.app.detection_timeout_ms = 1500;
        manager.save_app_config(&config).unwrap();

        assert_eq!(manager.load_app_config().unwrap(), config);
    }

    #[test]
    fn test_partial_app_config_fills_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(
            manager.config_dir().join("OptPS2 Config.yaml"),
            "OptPS2_Config:\n  Debug Mode: true\n",
        )
        .unwrap();

        let config = manager.load_app_config().unwrap();
        assert!(config.app.debug_mode);
        assert_eq!(config.app.simulated_latency_ms, 2000);
    }

    #[test]
    fn test_settings_round_trip() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(SettingsPersistence::load(&manager).unwrap().is_none());

        let settings = CanonicalSettings {
            resolution_scale: ResolutionScale::X3,
            anti_aliasing: AntiAliasing::Smaa,
            fps_limit: 45,
            ..CanonicalSettings::default()
        };
        SettingsPersistence::save(&manager, &settings).unwrap();

        assert_eq!(SettingsPersistence::load(&manager).unwrap(), Some(settings));
    }

    #[test]
    fn test_settings_out_of_range_is_parse_error() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = CanonicalSettings {
            fps_limit: 144,
            ..CanonicalSettings::default()
        };
        SettingsPersistence::save(&manager, &settings).unwrap();

        let err = SettingsPersistence::load(&manager).unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
    }

    #[test]
    fn test_settings_garbage_is_parse_error() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.settings_path(), "OptPS2_Settings: [1, 2").unwrap();

        let err = SettingsPersistence::load(&manager).unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
    }
}
