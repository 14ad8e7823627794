// Settings state module
//
// This module provides the SettingsStore which holds the current CanonicalSettings,
// applies presets and manual overrides, and emits change events for the screens.

use crate::config::{PersistenceError, SettingsPersistence};
use crate::metrics;
use crate::models::settings::UnknownVariant;
use crate::models::{CanonicalSettings, FPS_LIMIT_RANGE, PresetCatalog, PresetId};
use crate::services::PresetNormalizer;
use camino::Utf8PathBuf;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockWriteGuard};
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors raised by [`SettingsStore`] mutations. State is unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid value {value} for {field}: {reason}")]
    InvalidValue {
        field: SettingField,
        value: String,
        reason: String,
    },

    #[error("Unknown setting: {0}")]
    UnknownField(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

static GLOBAL_STORE: OnceLock<SettingsStore> = OnceLock::new();

/// A manually editable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    ResolutionScale,
    TextureQuality,
    AntiAliasing,
    Anisotropy,
    RenderingBackend,
    FpsLimit,
    AudioEnabled,
    AudioBuffering,
    RumbleEnabled,
    UseCustomControls,
    UsePhoneStorage,
    CustomStoragePath,
}

impl SettingField {
    pub const ALL: [SettingField; 12] = [
        SettingField::ResolutionScale,
        SettingField::TextureQuality,
        SettingField::AntiAliasing,
        SettingField::Anisotropy,
        SettingField::RenderingBackend,
        SettingField::FpsLimit,
        SettingField::AudioEnabled,
        SettingField::AudioBuffering,
        SettingField::RumbleEnabled,
        SettingField::UseCustomControls,
        SettingField::UsePhoneStorage,
        SettingField::CustomStoragePath,
    ];

    /// Field name as used by the settings form.
    pub fn name(self) -> &'static str {
        match self {
            SettingField::ResolutionScale => "resolutionScale",
            SettingField::TextureQuality => "textureQuality",
            SettingField::AntiAliasing => "antiAliasing",
            SettingField::Anisotropy => "anisotropy",
            SettingField::RenderingBackend => "renderingBackend",
            SettingField::FpsLimit => "fpsLimit",
            SettingField::AudioEnabled => "audioEnabled",
            SettingField::AudioBuffering => "audioBuffering",
            SettingField::RumbleEnabled => "rumbleEnabled",
            SettingField::UseCustomControls => "useCustomControls",
            SettingField::UsePhoneStorage => "usePhoneStorage",
            SettingField::CustomStoragePath => "customStoragePath",
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingField {
    type Err = SettingsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        SettingField::ALL
            .into_iter()
            .find(|field| field.name() == name)
            .ok_or_else(|| SettingsError::UnknownField(name.to_string()))
    }
}

/// A value submitted for a [`SettingField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl SettingValue {
    fn as_text(&self) -> Result<&str, String> {
        match self {
            SettingValue::Text(text) => Ok(text),
            _ => Err("expected text".to_string()),
        }
    }

    fn as_number(&self) -> Result<i64, String> {
        match self {
            SettingValue::Number(n) => Ok(*n),
            _ => Err("expected a number".to_string()),
        }
    }

    fn as_flag(&self) -> Result<bool, String> {
        match self {
            SettingValue::Flag(flag) => Ok(*flag),
            _ => Err("expected true or false".to_string()),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(text) => write!(f, "{:?}", text),
            SettingValue::Number(n) => write!(f, "{}", n),
            SettingValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Number(i64::from(value))
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Number(i64::from(value))
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Flag(value)
    }
}

/// Change events emitted when settings are modified
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsChange {
    /// A preset overwrote the graphics fields
    PresetApplied { preset: PresetId, name: String },

    /// Resolution, textures, filtering, backend or fps changed
    GraphicsChanged,

    /// Audio toggle or buffering changed
    AudioChanged,

    /// Vibration or custom control layout changed
    ControlsChanged,

    /// Storage location changed
    StorageChanged,

    /// Settings were restored to defaults
    SettingsReset,

    /// Settings were replaced by persisted ones
    SettingsLoaded,
}

#[derive(Debug, Clone, PartialEq)]
struct StoreState {
    settings: CanonicalSettings,
    selected_preset: PresetId,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            settings: CanonicalSettings::default(),
            selected_preset: PresetId::Balanced,
        }
    }
}

/// Holder of the current [`CanonicalSettings`] with event emission
///
/// - Presets flow catalog → [`PresetNormalizer`] → store and only touch graphics fields
/// - Manual updates are validated; a rejected value leaves the settings untouched
/// - Every mutation is synchronous and last-writer-wins
/// - Listeners subscribe to [`SettingsChange`] events via a tokio broadcast channel
///
/// Clones share the same underlying settings.
pub struct SettingsStore {
    state: Arc<RwLock<StoreState>>,
    changes_tx: broadcast::Sender<SettingsChange>,
    catalog: PresetCatalog,
}

impl SettingsStore {
    /// Create a store holding the default (Balanced) settings
    pub fn new() -> Self {
        Self::from_valid(CanonicalSettings::default())
    }

    /// Create a store starting from `settings`
    ///
    /// # Errors
    /// [`SettingsError::InvalidSettings`] if a field is out of range (fps limit, blank path)
    pub fn with_settings(settings: CanonicalSettings) -> Result<Self, SettingsError> {
        settings.validate().map_err(SettingsError::InvalidSettings)?;
        Ok(Self::from_valid(settings))
    }

    /// The process-wide store. Every call returns a handle to the same settings.
    pub fn global() -> SettingsStore {
        GLOBAL_STORE.get_or_init(SettingsStore::new).clone()
    }

    fn from_valid(settings: CanonicalSettings) -> Self {
        let (changes_tx, _) = broadcast::channel(64);
        let selected_preset = settings
            .preset_name
            .parse()
            .unwrap_or(PresetId::Balanced);
        Self {
            state: Arc::new(RwLock::new(StoreState {
                settings,
                selected_preset,
            })),
            changes_tx,
            catalog: PresetCatalog::standard(),
        }
    }

    /// Get a copy of the current settings
    pub fn snapshot(&self) -> CanonicalSettings {
        self.read(|settings| settings.clone())
    }

    /// Execute a function with read access to the settings
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CanonicalSettings) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state.settings)
    }

    /// The preset card currently highlighted
    pub fn selected_preset(&self) -> PresetId {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .selected_preset
    }

    /// Subscribe to settings change events
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes_tx.subscribe()
    }

    /// Apply a built-in preset
    ///
    /// Overwrites the graphics fields and the preset name; audio, controls and storage
    /// are left as they are.
    pub fn apply_preset(&self, id: PresetId) -> Vec<SettingsChange> {
        let preset = self.catalog.get(id);
        let normalized = PresetNormalizer::normalize(preset);

        let mut changes = self.update(|state| {
            normalized.apply_to(&mut state.settings);
            state.settings.preset_name = preset.name.to_string();
            state.selected_preset = id;
        });

        let event = SettingsChange::PresetApplied {
            preset: id,
            name: preset.name.to_string(),
        };
        let _ = self.changes_tx.send(event.clone());
        changes.push(event);

        metrics::global().record_preset_applied();
        tracing::info!("Applied {} preset: {}", preset.name, preset.description);

        changes
    }

    /// Apply a preset given by key ("battery") or display name ("Battery Saver")
    pub fn apply_preset_by_name(&self, name: &str) -> Result<Vec<SettingsChange>, SettingsError> {
        let id = name
            .parse::<PresetId>()
            .map_err(SettingsError::UnknownPreset)?;
        Ok(self.apply_preset(id))
    }

    /// Set a single field after validating the value
    ///
    /// # Errors
    /// [`SettingsError::InvalidValue`] if the value has the wrong type, is not one of
    /// the field's canonical values, or is out of range. The settings are unchanged.
    pub fn set(
        &self,
        field: SettingField,
        value: impl Into<SettingValue>,
    ) -> Result<Vec<SettingsChange>, SettingsError> {
        let value = value.into();

        let result = self.try_update(|state| {
            assign(&mut state.settings, field, &value).map_err(|reason| {
                SettingsError::InvalidValue {
                    field,
                    value: value.to_string(),
                    reason,
                }
            })
        });

        match &result {
            Ok(_) => tracing::debug!("Set {} = {}", field, value),
            Err(e) => {
                metrics::global().record_setting_rejected();
                tracing::warn!("Rejected setting update: {}", e);
            }
        }

        result
    }

    /// Set a field by its form name ("fpsLimit", "antiAliasing", ...)
    pub fn set_by_name(
        &self,
        name: &str,
        value: impl Into<SettingValue>,
    ) -> Result<Vec<SettingsChange>, SettingsError> {
        let field = name.parse::<SettingField>()?;
        self.set(field, value)
    }

    /// Restore the default settings and select Balanced
    pub fn reset(&self) -> Vec<SettingsChange> {
        let mut changes = self.update(|state| *state = StoreState::default());

        let _ = self.changes_tx.send(SettingsChange::SettingsReset);
        changes.push(SettingsChange::SettingsReset);

        tracing::info!("Settings reset to defaults");
        changes
    }

    /// Save the current settings
    ///
    /// A failed save is returned to the caller; the in-memory settings stay as they are.
    pub fn save(&self, persistence: &dyn SettingsPersistence) -> Result<(), PersistenceError> {
        persistence.save(&self.snapshot())?;
        metrics::global().record_settings_saved();
        tracing::info!("Settings saved");
        Ok(())
    }

    /// Replace the settings with persisted ones, if any exist
    ///
    /// # Returns
    /// `Ok(true)` if settings were loaded, `Ok(false)` if nothing was persisted yet
    ///
    /// # Errors
    /// [`PersistenceError::Invalid`] if the backend hands back out-of-range values; the
    /// current settings are kept.
    pub fn load(&self, persistence: &dyn SettingsPersistence) -> Result<bool, PersistenceError> {
        let Some(settings) = persistence.load()? else {
            return Ok(false);
        };

        if let Err(message) = settings.validate() {
            tracing::warn!("Refusing persisted settings: {}", message);
            return Err(PersistenceError::Invalid(message));
        }

        let selected_preset = settings
            .preset_name
            .parse()
            .unwrap_or(PresetId::Balanced);
        let mut changes = self.update(|state| {
            state.settings = settings;
            state.selected_preset = selected_preset;
        });

        let _ = self.changes_tx.send(SettingsChange::SettingsLoaded);
        changes.push(SettingsChange::SettingsLoaded);

        tracing::info!(
            "Loaded persisted settings (preset {}, {} change events)",
            selected_preset,
            changes.len()
        );
        Ok(true)
    }

    fn update<F>(&self, update_fn: F) -> Vec<SettingsChange>
    where
        F: FnOnce(&mut StoreState),
    {
        let mut state = self.write();
        let old_settings = state.settings.clone();
        update_fn(&mut state);
        self.emit_changes(&old_settings, &state.settings)
    }

    /// Apply `update_fn` to a copy and commit it only if it succeeds.
    fn try_update<F>(&self, update_fn: F) -> Result<Vec<SettingsChange>, SettingsError>
    where
        F: FnOnce(&mut StoreState) -> Result<(), SettingsError>,
    {
        let mut state = self.write();
        let mut candidate = state.clone();
        update_fn(&mut candidate)?;

        let old_settings = std::mem::replace(&mut *state, candidate).settings;
        Ok(self.emit_changes(&old_settings, &state.settings))
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit_changes(&self, old: &CanonicalSettings, new: &CanonicalSettings) -> Vec<SettingsChange> {
        let changes = detect_changes(old, new);
        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.changes_tx.send(change.clone());
        }
        changes
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            changes_tx: self.changes_tx.clone(),
            catalog: self.catalog,
        }
    }
}

/// Detect which groups of fields changed between two settings
fn detect_changes(old: &CanonicalSettings, new: &CanonicalSettings) -> Vec<SettingsChange> {
    let mut changes = Vec::new();

    if old.resolution_scale != new.resolution_scale
        || old.texture_quality != new.texture_quality
        || old.anti_aliasing != new.anti_aliasing
        || old.anisotropy != new.anisotropy
        || old.rendering_backend != new.rendering_backend
        || old.fps_limit != new.fps_limit
    {
        changes.push(SettingsChange::GraphicsChanged);
    }

    if old.audio_enabled != new.audio_enabled || old.audio_buffering != new.audio_buffering {
        changes.push(SettingsChange::AudioChanged);
    }

    if old.rumble_enabled != new.rumble_enabled
        || old.use_custom_controls != new.use_custom_controls
    {
        changes.push(SettingsChange::ControlsChanged);
    }

    if old.use_phone_storage != new.use_phone_storage
        || old.custom_storage_path != new.custom_storage_path
    {
        changes.push(SettingsChange::StorageChanged);
    }

    changes
}

fn parse_canonical<T>(value: &SettingValue) -> Result<T, String>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.as_text()?.parse().map_err(|e: UnknownVariant| e.to_string())
}

/// Write `value` into `field`, validating type, enum membership and range.
fn assign(
    settings: &mut CanonicalSettings,
    field: SettingField,
    value: &SettingValue,
) -> Result<(), String> {
    match field {
        SettingField::ResolutionScale => settings.resolution_scale = parse_canonical(value)?,
        SettingField::TextureQuality => settings.texture_quality = parse_canonical(value)?,
        SettingField::AntiAliasing => settings.anti_aliasing = parse_canonical(value)?,
        SettingField::Anisotropy => settings.anisotropy = parse_canonical(value)?,
        SettingField::RenderingBackend => settings.rendering_backend = parse_canonical(value)?,
        SettingField::AudioBuffering => settings.audio_buffering = parse_canonical(value)?,
        SettingField::FpsLimit => {
            let fps = value.as_number()?;
            let (min, max) = (*FPS_LIMIT_RANGE.start(), *FPS_LIMIT_RANGE.end());
            if fps < i64::from(min) || fps > i64::from(max) {
                return Err(format!("must be between {} and {}", min, max));
            }
            settings.fps_limit = fps as u32;
        }
        SettingField::AudioEnabled => settings.audio_enabled = value.as_flag()?,
        SettingField::RumbleEnabled => settings.rumble_enabled = value.as_flag()?,
        SettingField::UseCustomControls => settings.use_custom_controls = value.as_flag()?,
        SettingField::UsePhoneStorage => settings.use_phone_storage = value.as_flag()?,
        SettingField::CustomStoragePath => {
            let path = value.as_text()?.trim();
            if path.is_empty() {
                return Err("path must not be blank".to_string());
            }
            settings.custom_storage_path = Utf8PathBuf::from(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AntiAliasing, Anisotropy, AudioBuffering, RenderingBackend, ResolutionScale,
        TextureQuality,
    };

    #[test]
    fn test_new_store_has_balanced_defaults() {
        let store = SettingsStore::new();
        assert_eq!(store.snapshot(), CanonicalSettings::default());
        assert_eq!(store.selected_preset(), PresetId::Balanced);
    }

    #[test]
    fn test_apply_preset_overwrites_graphics_only() {
        let store = SettingsStore::new();
        store.set(SettingField::AudioEnabled, false).unwrap();
        store.set(SettingField::CustomStoragePath, "/sdcard/ps2").unwrap();

        let changes = store.apply_preset(PresetId::Quality);

        assert_eq!(
            changes,
            vec![
                SettingsChange::GraphicsChanged,
                SettingsChange::PresetApplied {
                    preset: PresetId::Quality,
                    name: "Quality".to_string(),
                },
            ]
        );

        let settings = store.snapshot();
        assert_eq!(settings.resolution_scale, ResolutionScale::X3);
        assert_eq!(settings.texture_quality, TextureQuality::High);
        assert_eq!(settings.anti_aliasing, AntiAliasing::Smaa);
        assert_eq!(settings.anisotropy, Anisotropy::X16);
        assert_eq!(settings.preset_name, "Quality");
        assert!(!settings.audio_enabled);
        assert_eq!(settings.custom_storage_path, "/sdcard/ps2");
        assert_eq!(store.selected_preset(), PresetId::Quality);
    }

    #[test]
    fn test_reapplying_same_preset_only_emits_preset_event() {
        let store = SettingsStore::new();
        let changes = store.apply_preset(PresetId::Balanced);
        assert_eq!(changes.len(), 1);
        assert!(matches!(changes[0], SettingsChange::PresetApplied { .. }));
    }

    #[test]
    fn test_set_fps_limit_range() {
        let store = SettingsStore::new();

        let err = store.set(SettingField::FpsLimit, 10).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidValue {
                field: SettingField::FpsLimit,
                ..
            }
        ));
        assert_eq!(store.read(|s| s.fps_limit), 60);

        let changes = store.set(SettingField::FpsLimit, 45).unwrap();
        assert_eq!(changes, vec![SettingsChange::GraphicsChanged]);
        assert_eq!(store.read(|s| s.fps_limit), 45);

        assert!(store.set(SettingField::FpsLimit, 61).is_err());
        assert!(store.set(SettingField::FpsLimit, 15).is_ok());
        assert!(store.set(SettingField::FpsLimit, 60).is_ok());
    }

    #[test]
    fn test_set_rejects_display_strings_and_wrong_types() {
        let store = SettingsStore::new();

        assert!(
            store
                .set(SettingField::RenderingBackend, "Hardware (Vulkan)")
                .is_err()
        );
        assert!(store.set(SettingField::TextureQuality, 3).is_err());
        assert!(store.set(SettingField::AudioEnabled, "yes").is_err());
        assert!(store.set(SettingField::CustomStoragePath, "   ").is_err());

        assert_eq!(store.snapshot(), CanonicalSettings::default());
    }

    #[test]
    fn test_set_opengl_manually() {
        let store = SettingsStore::new();
        store.set(SettingField::RenderingBackend, "opengl").unwrap();
        assert_eq!(
            store.read(|s| s.rendering_backend),
            RenderingBackend::OpenGl
        );
    }

    #[test]
    fn test_manual_override_keeps_preset_name() {
        let store = SettingsStore::new();
        store.apply_preset(PresetId::Performance);
        store.set(SettingField::TextureQuality, "high").unwrap();

        assert_eq!(store.read(|s| s.preset_name.clone()), "Performance");
        assert_eq!(store.selected_preset(), PresetId::Performance);
    }

    #[test]
    fn test_set_by_name() {
        let store = SettingsStore::new();
        let changes = store.set_by_name("audioBuffering", "large").unwrap();
        assert_eq!(changes, vec![SettingsChange::AudioChanged]);
        assert_eq!(store.read(|s| s.audio_buffering), AudioBuffering::Large);

        assert_eq!(
            store.set_by_name("volume", 3),
            Err(SettingsError::UnknownField("volume".to_string()))
        );
    }

    #[test]
    fn test_apply_preset_by_name() {
        let store = SettingsStore::new();
        store.apply_preset_by_name("Battery Saver").unwrap();
        assert_eq!(store.read(|s| s.fps_limit), 30);

        assert_eq!(
            store.apply_preset_by_name("turbo"),
            Err(SettingsError::UnknownPreset("turbo".to_string()))
        );
    }

    #[test]
    fn test_reset() {
        let store = SettingsStore::new();
        store.apply_preset(PresetId::BatterySaver);
        store.set(SettingField::UseCustomControls, true).unwrap();

        let changes = store.reset();

        assert!(changes.contains(&SettingsChange::GraphicsChanged));
        assert!(changes.contains(&SettingsChange::ControlsChanged));
        assert_eq!(changes.last(), Some(&SettingsChange::SettingsReset));
        assert_eq!(store.snapshot(), CanonicalSettings::default());
        assert_eq!(store.selected_preset(), PresetId::Balanced);
    }

    #[test]
    fn test_subscribe_to_changes() {
        let store = SettingsStore::new();
        let mut rx = store.subscribe();

        store.set(SettingField::RumbleEnabled, false).unwrap();

        assert_eq!(rx.try_recv(), Ok(SettingsChange::ControlsChanged));
    }

    #[test]
    fn test_clone_shares_settings() {
        let store1 = SettingsStore::new();
        let store2 = store1.clone();

        store1.set(SettingField::UsePhoneStorage, false).unwrap();

        assert!(!store2.read(|s| s.use_phone_storage));
    }

    #[test]
    fn test_with_settings_rejects_out_of_range() {
        let settings = CanonicalSettings {
            fps_limit: 999,
            ..CanonicalSettings::default()
        };
        assert!(matches!(
            SettingsStore::with_settings(settings),
            Err(SettingsError::InvalidSettings(_))
        ));

        let settings = CanonicalSettings {
            custom_storage_path: Utf8PathBuf::from(""),
            ..CanonicalSettings::default()
        };
        assert!(SettingsStore::with_settings(settings).is_err());
    }

    #[test]
    fn test_with_settings_selects_named_preset() {
        let settings = CanonicalSettings {
            preset_name: "Quality".to_string(),
            ..CanonicalSettings::default()
        };
        let store = SettingsStore::with_settings(settings).unwrap();
        assert_eq!(store.selected_preset(), PresetId::Quality);
    }

    #[test]
    fn test_global_handles_share_settings() {
        let a = SettingsStore::global();
        let b = SettingsStore::global();
        assert!(Arc::ptr_eq(&a.state, &b.state));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in SettingField::ALL {
            assert_eq!(field.name().parse::<SettingField>(), Ok(field));
        }
    }
}
