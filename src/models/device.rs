use serde::{Deserialize, Serialize};
use std::fmt;

/// Score reported for devices whose tier cannot be determined.
pub const UNKNOWN_TIER_SCORE: u8 = 30;

/// Label used for any device attribute the signal source could not provide.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Coarse device-capability bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    HighEnd,
    MidEnd,
    Unknown,
}

impl Tier {
    /// Inclusive performance score range for the tier.
    pub fn score_range(self) -> (u8, u8) {
        match self {
            Tier::HighEnd => (85, 99),
            Tier::MidEnd => (60, 79),
            Tier::Unknown => (UNKNOWN_TIER_SCORE, UNKNOWN_TIER_SCORE),
        }
    }

    /// Tier implied by a reading. Without a vendor match the hint is ignored.
    pub fn for_reading(reading: &SignalReading) -> Tier {
        match (reading.vendor_match, reading.tier_hint) {
            (true, TierHint::High) => Tier::HighEnd,
            (true, TierHint::Mid) => Tier::MidEnd,
            _ => Tier::Unknown,
        }
    }

    /// Number of distinct scores in the tier's range.
    pub fn score_span(self) -> u32 {
        let (low, high) = self.score_range();
        u32::from(high - low) + 1
    }

    /// Snapdragon series the tier corresponds to.
    pub fn series_label(self) -> &'static str {
        match self {
            Tier::HighEnd => "8xx",
            Tier::MidEnd => "7xx",
            Tier::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::HighEnd => f.write_str("high-end"),
            Tier::MidEnd => f.write_str("mid-range"),
            Tier::Unknown => f.write_str("unknown"),
        }
    }
}

/// Tier suggested by the signal source, before the classifier applies its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierHint {
    High,
    Mid,
    Unknown,
}

/// Raw device signals as reported by a [`crate::services::SignalSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalReading {
    pub vendor_match: bool,
    pub tier_hint: TierHint,
    pub processor_name: String,
    pub device_model: String,
    pub ram_label: String,
}

/// Result of a device compatibility check.
///
/// Created by [`crate::services::CompatibilityClassifier`] and never mutated afterwards.
/// The constructors uphold the tier/score invariant:
/// - `is_compatible == vendor_match`
/// - `HighEnd` scores in 85..=99, `MidEnd` in 60..=79, `Unknown` is exactly 30
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub is_compatible: bool,
    pub vendor_match: bool,
    pub tier: Tier,
    pub processor_name: String,
    pub performance_score: u8,
    pub device_model: String,
    pub ram_label: String,
    pub check_complete: bool,
}

impl DeviceProfile {
    /// Build a profile from a reading.
    ///
    /// A reading without a vendor match is always `Unknown`, whatever its hint says.
    /// `score_offset` positions the score inside the tier's range and is reduced modulo
    /// the range width, so any value yields a valid score.
    pub fn from_reading(reading: &SignalReading, score_offset: u32) -> Self {
        let tier = Tier::for_reading(reading);
        let (low, _) = tier.score_range();
        let performance_score = low + (score_offset % tier.score_span()) as u8;

        Self {
            is_compatible: reading.vendor_match,
            vendor_match: reading.vendor_match,
            tier,
            processor_name: reading.processor_name.clone(),
            performance_score,
            device_model: reading.device_model.clone(),
            ram_label: reading.ram_label.clone(),
            check_complete: true,
        }
    }

    /// Completed profile used when no reading could be obtained.
    pub fn unknown() -> Self {
        Self {
            is_compatible: false,
            vendor_match: false,
            tier: Tier::Unknown,
            processor_name: UNKNOWN_LABEL.to_string(),
            performance_score: UNKNOWN_TIER_SCORE,
            device_model: UNKNOWN_LABEL.to_string(),
            ram_label: UNKNOWN_LABEL.to_string(),
            check_complete: true,
        }
    }

    /// Whether the tier/score invariant holds.
    pub fn is_consistent(&self) -> bool {
        let (low, high) = self.tier.score_range();
        self.is_compatible == self.vendor_match
            && (low..=high).contains(&self.performance_score)
            && (self.vendor_match || self.tier == Tier::Unknown)
    }

    pub fn headline(&self) -> &'static str {
        if self.vendor_match {
            "Compatible Snapdragon Device Detected"
        } else {
            "Non-Snapdragon Device Detected"
        }
    }

    /// Warning shown for devices outside the supported processor families.
    pub fn compatibility_warning(&self) -> Option<&'static str> {
        (!self.vendor_match).then_some(
            "This emulator is optimized for Snapdragon 7xx and 8xx devices. \
             Performance may be poor on your current device.",
        )
    }

    /// Colour class of the estimated-performance bar.
    pub fn score_color(&self) -> &'static str {
        match self.performance_score {
            80.. => "bg-green-500",
            60..=79 => "bg-yellow-500",
            40..=59 => "bg-orange-500",
            _ => "bg-red-500",
        }
    }
}
