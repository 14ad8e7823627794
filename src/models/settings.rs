use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Inclusive range accepted for the frame rate cap.
pub const FPS_LIMIT_RANGE: RangeInclusive<u32> = 15..=60;

/// Default storage location on the phone's shared storage.
pub const DEFAULT_STORAGE_PATH: &str = "/storage/emulated/0/PS2Emulator";

/// Raised when a string is not one of an enum's canonical values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{value:?} is not a valid {kind} (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

// Every canonical setting enum serializes to, displays as and parses from the exact
// lower-case token used in the settings file. Display strings ("Hardware (Vulkan)") never parse.
macro_rules! setting_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in menu order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical token for this value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: value.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }
    };
}

setting_enum! {
    /// Internal resolution multiplier (1x = 480p native).
    pub enum ResolutionScale {
        X1 => "1x",
        X2 => "2x",
        X3 => "3x",
    }
}

setting_enum! {
    pub enum TextureQuality {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

setting_enum! {
    pub enum AntiAliasing {
        Off => "off",
        Fxaa => "fxaa",
        Smaa => "smaa",
    }
}

setting_enum! {
    /// Anisotropic filtering level; `0x` means disabled.
    pub enum Anisotropy {
        X0 => "0x",
        X2 => "2x",
        X4 => "4x",
        X8 => "8x",
        X16 => "16x",
    }
}

setting_enum! {
    pub enum RenderingBackend {
        Software => "software",
        OpenGl => "opengl",
        Vulkan => "vulkan",
    }
}

setting_enum! {
    /// Audio buffer size; smaller buffers trade stutter for latency.
    pub enum AudioBuffering {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

/// The normalized configuration consumed by the rest of the emulator.
///
/// Every field holds one of its enumerated values; preset display strings are turned
/// into these values by [`crate::services::PresetNormalizer`] before they get here.
/// The [`Default`] is the Balanced preset plus the stock audio, controls and storage options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSettings {
    // Graphics
    #[serde(rename = "Resolution Scale")]
    pub resolution_scale: ResolutionScale,

    #[serde(rename = "Texture Quality")]
    pub texture_quality: TextureQuality,

    #[serde(rename = "Anti Aliasing")]
    pub anti_aliasing: AntiAliasing,

    #[serde(rename = "Anisotropic Filtering")]
    pub anisotropy: Anisotropy,

    #[serde(rename = "Rendering Backend")]
    pub rendering_backend: RenderingBackend,

    #[serde(rename = "FPS Limit")]
    pub fps_limit: u32,

    // Audio
    #[serde(rename = "Audio Enabled", default = "default_true")]
    pub audio_enabled: bool,

    #[serde(rename = "Audio Buffering", default = "default_audio_buffering")]
    pub audio_buffering: AudioBuffering,

    // Controls
    #[serde(rename = "Rumble Enabled", default = "default_true")]
    pub rumble_enabled: bool,

    #[serde(rename = "Custom Controls", default)]
    pub use_custom_controls: bool,

    // Storage
    #[serde(rename = "Use Phone Storage", default = "default_true")]
    pub use_phone_storage: bool,

    #[serde(rename = "Custom Storage Path", default = "default_storage_path")]
    pub custom_storage_path: Utf8PathBuf,

    /// Name of the last preset applied (manual overrides leave it alone).
    #[serde(rename = "Preset Name", default = "default_preset_name")]
    pub preset_name: String,
}

impl Default for CanonicalSettings {
    fn default() -> Self {
        Self {
            resolution_scale: ResolutionScale::X2,
            texture_quality: TextureQuality::Medium,
            anti_aliasing: AntiAliasing::Fxaa,
            anisotropy: Anisotropy::X2,
            rendering_backend: RenderingBackend::Vulkan,
            fps_limit: 60,
            audio_enabled: true,
            audio_buffering: AudioBuffering::Medium,
            rumble_enabled: true,
            use_custom_controls: false,
            use_phone_storage: true,
            custom_storage_path: default_storage_path(),
            preset_name: default_preset_name(),
        }
    }
}

impl CanonicalSettings {
    /// Check the constraints serde cannot express.
    ///
    /// Enum fields are valid by construction; this covers the fps range and the
    /// storage path, which must not be blank.
    pub fn validate(&self) -> Result<(), String> {
        if !FPS_LIMIT_RANGE.contains(&self.fps_limit) {
            return Err(format!(
                "fps limit {} outside {}..={}",
                self.fps_limit,
                FPS_LIMIT_RANGE.start(),
                FPS_LIMIT_RANGE.end()
            ));
        }
        if self.custom_storage_path.as_str().trim().is_empty() {
            return Err("custom storage path is blank".to_string());
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_audio_buffering() -> AudioBuffering {
    AudioBuffering::Medium
}

fn default_storage_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_STORAGE_PATH)
}

fn default_preset_name() -> String {
    "Balanced".to_string()
}
