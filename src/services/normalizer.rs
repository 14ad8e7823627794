//! Preset normalization.
//!
//! Preset cards describe their settings with free-form display strings
//! ("2x Native (960p)", "Hardware (Vulkan)"). [`PresetNormalizer`] maps them onto
//! canonical values with a fixed rule per field:
//!
//! | field | rule |
//! |---|---|
//! | resolution | starts with `1x` → `1x`; starts with `2x` → `2x`; otherwise `3x` |
//! | texture | lower-cased value |
//! | anti-aliasing | `off` (any case) → `off`; otherwise lower-cased value |
//! | anisotropy | `Off` → `0x`; otherwise the value as written |
//! | backend | contains `vulkan` (any case) → `vulkan`; otherwise `software` |
//! | fps | copied |
//!
//! Normalization never fails. Texture, anti-aliasing and anisotropy strings that do not
//! name a canonical value fall back to the Balanced value for that field. No display
//! string maps to `opengl`. The fps cap is not range-checked here; every built-in preset
//! already lies inside [`FPS_LIMIT_RANGE`](crate::models::FPS_LIMIT_RANGE).

use crate::models::{
    AntiAliasing, Anisotropy, CanonicalSettings, PresetDefinition, RenderingBackend,
    ResolutionScale, TextureQuality,
};

/// The graphics fields a preset controls, in canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetSettings {
    pub resolution_scale: ResolutionScale,
    pub texture_quality: TextureQuality,
    pub anti_aliasing: AntiAliasing,
    pub anisotropy: Anisotropy,
    pub rendering_backend: RenderingBackend,
    pub fps_limit: u32,
}

impl PresetSettings {
    /// Overwrite the preset-controlled fields of `settings`, leaving the rest alone.
    pub fn apply_to(&self, settings: &mut CanonicalSettings) {
        settings.resolution_scale = self.resolution_scale;
        settings.texture_quality = self.texture_quality;
        settings.anti_aliasing = self.anti_aliasing;
        settings.anisotropy = self.anisotropy;
        settings.rendering_backend = self.rendering_backend;
        settings.fps_limit = self.fps_limit;
    }
}

/// Maps preset display strings to canonical setting values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetNormalizer;

impl PresetNormalizer {
    pub fn normalize(preset: &PresetDefinition) -> PresetSettings {
        let fallback = CanonicalSettings::default();

        PresetSettings {
            resolution_scale: Self::resolution(preset.resolution),
            texture_quality: preset
                .texture_quality
                .to_lowercase()
                .parse()
                .unwrap_or(fallback.texture_quality),
            anti_aliasing: Self::anti_aliasing(preset.anti_aliasing)
                .unwrap_or(fallback.anti_aliasing),
            anisotropy: Self::anisotropy(preset.anisotropic_filtering)
                .unwrap_or(fallback.anisotropy),
            rendering_backend: Self::backend(preset.rendering),
            fps_limit: preset.fps_limit,
        }
    }

    fn resolution(display: &str) -> ResolutionScale {
        if display.starts_with("1x") {
            ResolutionScale::X1
        } else if display.starts_with("2x") {
            ResolutionScale::X2
        } else {
            ResolutionScale::X3
        }
    }

    fn anti_aliasing(display: &str) -> Option<AntiAliasing> {
        let lowered = display.to_lowercase();
        if lowered == "off" {
            Some(AntiAliasing::Off)
        } else {
            lowered.parse().ok()
        }
    }

    fn anisotropy(display: &str) -> Option<Anisotropy> {
        if display == "Off" {
            Some(Anisotropy::X0)
        } else {
            display.parse().ok()
        }
    }

    fn backend(display: &str) -> RenderingBackend {
        if display.to_lowercase().contains("vulkan") {
            RenderingBackend::Vulkan
        } else {
            RenderingBackend::Software
        }
    }
}
