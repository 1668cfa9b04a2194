// Player classification: declared role text -> exactly one Category.
//
// Role strings arrive in many spellings ("WK-Batter", "Batting Allrounder",
// "All Rounder", "Bowler"). They are matched once per player here and the
// resulting Category is cached on the Player for the rest of the run.

use std::collections::HashSet;

use crate::player::Category;

/// Curated names of specialist wicket-keepers.
///
/// Only consulted when a player's declared role is unrecognized and the stats
/// show a pure batter.
#[derive(Debug, Clone, Default)]
pub struct SpecialistKeepers {
    names: HashSet<String>,
}

impl SpecialistKeepers {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SpecialistKeepers {
            names: names.into_iter().map(|n| n.into().trim().to_string()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name.trim())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Map a declared role string to a category, if it carries a known marker.
///
/// Markers are tested in precedence order: keeper, bowler, all-rounder,
/// batter. The first hit wins, so "WK-Batter" is a keeper and
/// "Bowling All-Rounder" is an all-rounder.
pub fn role_category(role: &str) -> Option<Category> {
    let lower = role.to_lowercase();
    // "all-rounder", "all rounder", "allrounder", "all_rounder" all collapse.
    let squashed: String = lower
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '_'))
        .collect();

    if lower.contains("wk") || squashed.contains("keeper") {
        Some(Category::Keeper)
    } else if lower.contains("bowler") {
        Some(Category::Bowler)
    } else if squashed.contains("allrounder") {
        Some(Category::AllRounder)
    } else if lower.contains("batter") || lower.contains("batsman") {
        Some(Category::Batter)
    } else {
        None
    }
}

/// Assign a player to exactly one category.
///
/// The declared role decides when it carries a marker. Otherwise the stats
/// datasets the player appears in decide: batting only -> batter (or keeper if
/// curated), bowling only -> bowler, both -> all-rounder, neither -> batter.
pub fn classify(
    name: &str,
    declared_role: Option<&str>,
    has_batting_stats: bool,
    has_bowling_stats: bool,
    keepers: &SpecialistKeepers,
) -> Category {
    if let Some(category) = declared_role.and_then(role_category) {
        return category;
    }

    match (has_batting_stats, has_bowling_stats) {
        (true, false) if keepers.contains(name) => Category::Keeper,
        (true, false) => Category::Batter,
        (false, true) => Category::Bowler,
        (true, true) => Category::AllRounder,
        (false, false) => Category::Batter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keepers() -> SpecialistKeepers {
        SpecialistKeepers::new(["MS Dhoni", "Rishabh Pant"])
    }

    #[test]
    fn keeper_marker_beats_batter() {
        assert_eq!(role_category("WK-Batter"), Some(Category::Keeper));
        assert_eq!(role_category("Wicketkeeper"), Some(Category::Keeper));
        assert_eq!(role_category("Wicket-Keeper"), Some(Category::Keeper));
    }

    #[test]
    fn bowler_marker_beats_all_rounder() {
        assert_eq!(role_category("Bowler"), Some(Category::Bowler));
        assert_eq!(role_category("Bowler All-Rounder"), Some(Category::Bowler));
    }

    #[test]
    fn all_rounder_spellings() {
        for role in [
            "All-Rounder",
            "Allrounder",
            "All-rounder",
            "All Rounder",
            "Batting Allrounder",
            "Bowling All-Rounder",
        ] {
            assert_eq!(role_category(role), Some(Category::AllRounder), "{role}");
        }
    }

    #[test]
    fn batter_and_batsman() {
        assert_eq!(role_category("Batter"), Some(Category::Batter));
        assert_eq!(role_category("Top-order Batsman"), Some(Category::Batter));
    }

    #[test]
    fn unknown_role_has_no_category() {
        assert_eq!(role_category("Unknown"), None);
        assert_eq!(role_category(""), None);
    }

    #[test]
    fn declared_role_wins_over_stats() {
        let cat = classify("Anyone", Some("Bowler"), true, false, &keepers());
        assert_eq!(cat, Category::Bowler);
    }

    #[test]
    fn fallback_batting_only_is_batter() {
        let cat = classify("Shubman Gill", None, true, false, &keepers());
        assert_eq!(cat, Category::Batter);
    }

    #[test]
    fn fallback_curated_keeper() {
        let cat = classify("MS Dhoni", Some("Unknown"), true, false, &keepers());
        assert_eq!(cat, Category::Keeper);
    }

    #[test]
    fn curated_keeper_with_bowling_stats_is_all_rounder() {
        let cat = classify("MS Dhoni", None, true, true, &keepers());
        assert_eq!(cat, Category::AllRounder);
    }

    #[test]
    fn fallback_bowling_only_is_bowler() {
        let cat = classify("Trent Boult", None, false, true, &keepers());
        assert_eq!(cat, Category::Bowler);
    }

    #[test]
    fn fallback_no_stats_defaults_to_batter() {
        let cat = classify("Debutant", None, false, false, &keepers());
        assert_eq!(cat, Category::Batter);
    }

    #[test]
    fn classification_is_total() {
        let roles = [
            None,
            Some("WK"),
            Some("Bowler"),
            Some("All Rounder"),
            Some("Batter"),
            Some("??"),
        ];
        for role in roles {
            for bat in [false, true] {
                for bowl in [false, true] {
                    let cat = classify("MS Dhoni", role, bat, bowl, &keepers());
                    assert!(Category::ALL.contains(&cat));
                }
            }
        }
    }
}
