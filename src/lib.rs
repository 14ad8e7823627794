// OptPS2 - Device-aware settings optimizer for a PS2 emulator front-end
//
// This is the library crate containing the core business logic and data structures.
// The binary crate (main.rs) runs the startup sequence and reports the result.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ConfigManager, PersistenceError, SettingsPersistence};
pub use models::{AppConfig, CanonicalSettings, DeviceProfile, PresetCatalog, PresetId};
pub use state::{SettingField, SettingValue, SettingsChange, SettingsError, SettingsStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
