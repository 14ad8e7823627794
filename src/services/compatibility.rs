//! Per-game compatibility entries and the aggregate overview.
//!
//! Entries are derived on demand from a game's compatibility percentage and never stored.

use super::rating::{RatingLabel, classify};
use crate::models::Game;
use indexmap::IndexMap;

/// Read-only compatibility view of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityEntry {
    pub id: String,
    pub title: String,
    pub rating: u8,
    pub issues: Vec<String>,
    pub tier: RatingLabel,
}

impl CompatibilityEntry {
    pub fn for_game(game: &Game) -> Self {
        Self {
            id: game.id.to_string(),
            title: game.title.to_string(),
            rating: game.compatibility,
            issues: known_issues(game.compatibility)
                .iter()
                .map(|issue| issue.to_string())
                .collect(),
            tier: classify(game.compatibility).label,
        }
    }
}

/// Known issues reported for a compatibility percentage.
///
/// These buckets use strict thresholds, so a 90% title still lists two issues
/// while its badge already reads Perfect.
pub fn known_issues(percent: u8) -> &'static [&'static str] {
    if percent > 90 {
        &["Minor graphical glitches"]
    } else if percent > 80 {
        &["Some audio stuttering", "Minor graphical glitches"]
    } else if percent > 70 {
        &[
            "Frequent audio stuttering",
            "Texture issues",
            "Occasional slowdowns",
        ]
    } else {
        &[
            "Major graphical glitches",
            "Severe performance issues",
            "Audio desync",
        ]
    }
}

/// Entries for every game, in library order.
pub fn compatibility_list(games: &[Game]) -> Vec<CompatibilityEntry> {
    games.iter().map(CompatibilityEntry::for_game).collect()
}

/// Entries whose title contains `query` (case-insensitive), optionally limited to one label.
pub fn filter_entries<'a>(
    entries: &'a [CompatibilityEntry],
    query: &str,
    label: Option<RatingLabel>,
) -> Vec<&'a CompatibilityEntry> {
    let needle = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| label.is_none_or(|wanted| entry.tier == wanted))
        .filter(|entry| entry.title.to_lowercase().contains(&needle))
        .collect()
}

/// Number of games per label, with every label present and in best-to-worst order.
pub fn bucket_counts(games: &[Game]) -> IndexMap<RatingLabel, usize> {
    let mut counts: IndexMap<RatingLabel, usize> =
        RatingLabel::ALL.iter().map(|label| (*label, 0)).collect();

    for game in games {
        *counts.entry(classify(game.compatibility).label).or_insert(0) += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builtin_games;

    #[test]
    fn test_entry_for_game() {
        let games = builtin_games();
        let entry = CompatibilityEntry::for_game(&games[0]);

        assert_eq!(entry.id, "1");
        assert_eq!(entry.rating, 95);
        assert_eq!(entry.tier, RatingLabel::Perfect);
        assert_eq!(entry.issues, vec!["Minor graphical glitches".to_string()]);
    }

    #[test]
    fn test_issue_thresholds_are_strict() {
        assert_eq!(known_issues(91).len(), 1);
        assert_eq!(known_issues(90).len(), 2);
        assert_eq!(known_issues(81).len(), 2);
        assert_eq!(known_issues(80)[0], "Frequent audio stuttering");
        assert_eq!(known_issues(70)[0], "Major graphical glitches");
    }

    #[test]
    fn test_bucket_counts_for_library() {
        let counts = bucket_counts(builtin_games());

        let labels: Vec<_> = counts.keys().copied().collect();
        assert_eq!(labels, RatingLabel::ALL.to_vec());
        assert_eq!(counts[&RatingLabel::Perfect], 3);
        assert_eq!(counts[&RatingLabel::Playable], 5);
        assert_eq!(counts[&RatingLabel::HasIssues], 0);
        assert_eq!(counts[&RatingLabel::Problematic], 0);
    }

    #[test]
    fn test_filter_by_query_and_label() {
        let entries = compatibility_list(builtin_games());

        let perfect = filter_entries(&entries, "", Some(RatingLabel::Perfect));
        assert_eq!(perfect.len(), 3);

        let hits = filter_entries(&entries, "god", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "God of War II");

        assert!(filter_entries(&entries, "god", Some(RatingLabel::Playable)).is_empty());
    }
}
