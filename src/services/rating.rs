use serde::{Deserialize, Serialize};
use std::fmt;

/// Compatibility rating bucket.
///
/// Declared best to worst, which is also the display order of the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingLabel {
    Perfect,
    Playable,
    HasIssues,
    Problematic,
}

impl RatingLabel {
    pub const ALL: [RatingLabel; 4] = [
        RatingLabel::Perfect,
        RatingLabel::Playable,
        RatingLabel::HasIssues,
        RatingLabel::Problematic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RatingLabel::Perfect => "Perfect",
            RatingLabel::Playable => "Playable",
            RatingLabel::HasIssues => "Has Issues",
            RatingLabel::Problematic => "Problematic",
        }
    }

    pub fn color_class(self) -> &'static str {
        match self {
            RatingLabel::Perfect => "bg-green-500 text-white",
            RatingLabel::Playable => "bg-blue-500 text-white",
            RatingLabel::HasIssues => "bg-yellow-500 text-white",
            RatingLabel::Problematic => "bg-red-500 text-white",
        }
    }
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge shown next to a compatibility percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBadge {
    pub label: RatingLabel,
    pub color_class: &'static str,
}

/// Bucket a compatibility percentage.
///
/// | percent | label |
/// |---|---|
/// | 90 and up | Perfect |
/// | 80–89 | Playable |
/// | 70–79 | Has Issues |
/// | below 70 | Problematic |
///
/// Values above 100 are treated as Perfect.
pub fn classify(percent: u8) -> RatingBadge {
    let label = match percent {
        90.. => RatingLabel::Perfect,
        80..=89 => RatingLabel::Playable,
        70..=79 => RatingLabel::HasIssues,
        _ => RatingLabel::Problematic,
    };
    RatingBadge {
        label,
        color_class: label.color_class(),
    }
}
