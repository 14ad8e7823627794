use std::fmt;
use std::str::FromStr;

/// Identifier of a built-in performance preset.
///
/// Variants are declared in catalog order, which is also the order the presets are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetId {
    BatterySaver,
    Balanced,
    Performance,
    Quality,
    Custom,
}

impl PresetId {
    pub const ALL: [PresetId; 5] = [
        PresetId::BatterySaver,
        PresetId::Balanced,
        PresetId::Performance,
        PresetId::Quality,
        PresetId::Custom,
    ];

    /// Short key used by the settings screen ("battery", "balanced", ...).
    pub fn key(self) -> &'static str {
        match self {
            PresetId::BatterySaver => "battery",
            PresetId::Balanced => "balanced",
            PresetId::Performance => "performance",
            PresetId::Quality => "quality",
            PresetId::Custom => "custom",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PresetId {
    type Err = String;

    /// Accepts the short key or the display name, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        PresetId::ALL
            .into_iter()
            .find(|id| {
                id.key().eq_ignore_ascii_case(wanted)
                    || PRESETS[id.index()].name.eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| value.to_string())
    }
}

/// A named bundle of display-oriented configuration strings.
///
/// The strings are what the preset card shows; they are not canonical values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDefinition {
    pub id: PresetId,
    pub name: &'static str,
    pub description: &'static str,
    pub resolution: &'static str,
    pub texture_quality: &'static str,
    pub anti_aliasing: &'static str,
    pub anisotropic_filtering: &'static str,
    pub cpu_allocation: &'static str,
    pub rendering: &'static str,
    pub fps_limit: u32,
}

static PRESETS: [PresetDefinition; 5] = [
    PresetDefinition {
        id: PresetId::BatterySaver,
        name: "Battery Saver",
        description: "Lower settings to preserve battery life",
        resolution: "1x Native (480p)",
        texture_quality: "Low",
        anti_aliasing: "Off",
        anisotropic_filtering: "Off",
        cpu_allocation: "2 Cores",
        rendering: "Software",
        fps_limit: 30,
    },
    PresetDefinition {
        id: PresetId::Balanced,
        name: "Balanced",
        description: "Good balance between performance and quality",
        resolution: "2x Native (960p)",
        texture_quality: "Medium",
        anti_aliasing: "FXAA",
        anisotropic_filtering: "2x",
        cpu_allocation: "4 Cores",
        rendering: "Hardware (Vulkan)",
        fps_limit: 60,
    },
    PresetDefinition {
        id: PresetId::Performance,
        name: "Performance",
        description: "Prioritize frame rates",
        resolution: "2x Native (960p)",
        texture_quality: "Medium",
        anti_aliasing: "Off",
        anisotropic_filtering: "Off",
        cpu_allocation: "All Cores",
        rendering: "Hardware (Vulkan)",
        fps_limit: 60,
    },
    PresetDefinition {
        id: PresetId::Quality,
        name: "Quality",
        description: "Best visual quality at cost of performance",
        resolution: "3x Native (1440p)",
        texture_quality: "High",
        anti_aliasing: "SMAA",
        anisotropic_filtering: "16x",
        cpu_allocation: "All Cores",
        rendering: "Hardware (Vulkan)",
        fps_limit: 60,
    },
    PresetDefinition {
        id: PresetId::Custom,
        name: "Custom",
        description: "User-defined settings",
        resolution: "2x Native (960p)",
        texture_quality: "Medium",
        anti_aliasing: "FXAA",
        anisotropic_filtering: "8x",
        cpu_allocation: "4 Cores",
        rendering: "Hardware (Vulkan)",
        fps_limit: 60,
    },
];

/// The ordered, immutable set of built-in presets.
#[derive(Debug, Clone, Copy)]
pub struct PresetCatalog {
    presets: &'static [PresetDefinition],
}

impl PresetCatalog {
    /// The five built-in presets: Battery Saver, Balanced, Performance, Quality, Custom.
    pub const fn standard() -> Self {
        Self { presets: &PRESETS }
    }

    pub fn get(&self, id: PresetId) -> &'static PresetDefinition {
        &self.presets[id.index()]
    }

    /// Look up a preset by its key or display name.
    pub fn find(&self, name: &str) -> Option<&'static PresetDefinition> {
        name.parse::<PresetId>().ok().map(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static PresetDefinition> + use<> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
