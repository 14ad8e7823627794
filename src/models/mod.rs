//! Data models for the OptPS2 front-end core.
//!
//! - [`DeviceProfile`]: result of a device compatibility check, built from a [`SignalReading`]
//! - [`CanonicalSettings`]: the normalized, enum-typed emulator configuration
//! - [`PresetCatalog`]: the five built-in performance presets as display strings
//! - [`Game`]: entries of the bundled game library
//! - [`AppConfig`]: startup timings and logging preferences from `OptPS2 Config.yaml`
//!
//! Models carry no behaviour beyond construction and validation; the services and the
//! [`SettingsStore`](crate::state::SettingsStore) own all decisions.

pub mod config;
pub mod device;
pub mod game;
pub mod preset;
pub mod settings;

pub use config::{AppConfig, AppSettings, SettingsFile};
pub use device::{DeviceProfile, SignalReading, Tier, TierHint};
pub use game::{Game, Region, builtin_games, compatibility_color, search_games};
pub use preset::{PresetCatalog, PresetDefinition, PresetId};
pub use settings::{
    AntiAliasing, Anisotropy, AudioBuffering, CanonicalSettings, FPS_LIMIT_RANGE,
    RenderingBackend, ResolutionScale, TextureQuality, UnknownVariant,
};
