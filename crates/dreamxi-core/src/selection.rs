// Constrained team selection: minimum-fill per category, then greedy top-up.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::player::{Category, ScoredPlayer, DEFAULT_CREDIT};

/// Limits applied while assembling one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRules {
    pub team_size: usize,
    pub credit_cap: f64,
    pub foreign_cap: usize,
    /// Admissions per category during the minimum-fill phase.
    pub min_per_category: usize,
    /// Category ceiling checked during the minimum-fill phase.
    pub min_fill_category_cap: usize,
    /// Category ceiling checked during the greedy top-up phase.
    pub top_up_category_cap: usize,
    /// Credit charged for players the roster book does not price.
    pub default_credit: f64,
}

impl Default for SelectionRules {
    fn default() -> Self {
        SelectionRules {
            team_size: 11,
            credit_cap: 100.0,
            foreign_cap: 4,
            min_per_category: 1,
            min_fill_category_cap: 5,
            top_up_category_cap: 8,
            default_credit: DEFAULT_CREDIT,
        }
    }
}

/// The assembled team. `picks` is in admission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub picks: Vec<ScoredPlayer>,
    pub total_credits: f64,
    pub foreign_count: usize,
    pub captain: Option<String>,
    pub vice_captain: Option<String>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.picks.iter().any(|p| p.name() == name)
    }

    /// Picks of one category, in admission order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ScoredPlayer> + '_ {
        self.picks
            .iter()
            .filter(move |p| p.player.category == category)
    }
}

/// Why a candidate was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    TeamFull,
    CategoryFull,
    OverBudget,
    ForeignQuota,
}

/// Running state of a single selection.
struct TeamBuilder<'a> {
    rules: &'a SelectionRules,
    picks: Vec<ScoredPlayer>,
    total_credits: f64,
    foreign_count: usize,
    per_category: [usize; 4],
}

impl<'a> TeamBuilder<'a> {
    fn new(rules: &'a SelectionRules) -> Self {
        TeamBuilder {
            rules,
            picks: Vec::with_capacity(rules.team_size),
            total_credits: 0.0,
            foreign_count: 0,
            per_category: [0; 4],
        }
    }

    fn is_full(&self) -> bool {
        self.picks.len() >= self.rules.team_size
    }

    fn contains(&self, name: &str) -> bool {
        self.picks.iter().any(|p| p.name() == name)
    }

    fn check(&self, candidate: &ScoredPlayer, category_cap: usize) -> Result<(), Rejection> {
        let player = &candidate.player;
        if self.is_full() {
            return Err(Rejection::TeamFull);
        }
        if self.per_category[player.category.index()] >= category_cap {
            return Err(Rejection::CategoryFull);
        }
        if self.total_credits + player.credit > self.rules.credit_cap {
            return Err(Rejection::OverBudget);
        }
        if player.foreign && self.foreign_count >= self.rules.foreign_cap {
            return Err(Rejection::ForeignQuota);
        }
        Ok(())
    }

    /// Admit `candidate` if it fits under `category_cap`. Returns whether it did.
    fn try_admit(&mut self, candidate: &ScoredPlayer, category_cap: usize) -> bool {
        match self.check(candidate, category_cap) {
            Ok(()) => {
                let player = &candidate.player;
                self.total_credits += player.credit;
                if player.foreign {
                    self.foreign_count += 1;
                }
                self.per_category[player.category.index()] += 1;
                self.picks.push(candidate.clone());
                true
            }
            Err(reason) => {
                debug!(
                    "rejected {} ({}, {:.1} cr): {:?}",
                    candidate.name(),
                    candidate.player.category,
                    candidate.player.credit,
                    reason
                );
                false
            }
        }
    }
}

/// Order players by score, highest first. Ties keep their input order.
pub fn rank(players: &[ScoredPlayer]) -> Vec<ScoredPlayer> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted
}

/// Pick a team under `rules`.
///
/// Never fails: when the constraints cannot be met in full the result is
/// simply smaller, and captaincy is left unset below two picks. Duplicate
/// names are considered once, at their first position.
pub fn select_team(players: &[ScoredPlayer], rules: &SelectionRules) -> Selection {
    let sorted = rank(players);
    let mut team = TeamBuilder::new(rules);

    // Minimum fill: walk each category's ranked players in turn.
    for category in Category::ALL {
        let mut admitted = 0;
        for candidate in sorted.iter().filter(|p| p.player.category == category) {
            if admitted >= rules.min_per_category {
                break;
            }
            if team.contains(candidate.name()) {
                continue;
            }
            if team.try_admit(candidate, rules.min_fill_category_cap) {
                admitted += 1;
            }
        }
        if admitted == 0 {
            debug!("minimum fill: no affordable {} candidate", category);
        }
    }

    // Greedy top-up over the full ranking.
    for candidate in &sorted {
        if team.is_full() {
            break;
        }
        if team.contains(candidate.name()) {
            continue;
        }
        team.try_admit(candidate, rules.top_up_category_cap);
    }

    let (captain, vice_captain) = captaincy(&team.picks);

    info!(
        "selected {}/{} players, {:.1}/{:.1} credits, {}/{} foreign",
        team.picks.len(),
        rules.team_size,
        team.total_credits,
        rules.credit_cap,
        team.foreign_count,
        rules.foreign_cap
    );

    Selection {
        picks: team.picks,
        total_credits: team.total_credits,
        foreign_count: team.foreign_count,
        captain,
        vice_captain,
    }
}

/// The two highest-scored picks; ties go to the earlier admission.
fn captaincy(picks: &[ScoredPlayer]) -> (Option<String>, Option<String>) {
    if picks.len() < 2 {
        return (None, None);
    }
    let ranked = rank(picks);
    (
        Some(ranked[0].name().to_string()),
        Some(ranked[1].name().to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    fn sp(name: &str, score: f64, credit: f64, category: Category, foreign: bool) -> ScoredPlayer {
        ScoredPlayer {
            player: Player {
                name: name.into(),
                team: "T".into(),
                category,
                credit,
                foreign,
            },
            score,
        }
    }

    fn names(sel: &Selection) -> Vec<&str> {
        sel.picks.iter().map(|p| p.name()).collect()
    }

    #[test]
    fn two_player_pool_within_budget() {
        let pool = vec![
            sp("A", 50.0, 9.0, Category::Batter, false),
            sp("B", 40.0, 91.0, Category::Bowler, true),
        ];
        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.captain.as_deref(), Some("A"));
        assert_eq!(sel.vice_captain.as_deref(), Some("B"));
        assert_eq!(sel.foreign_count, 1);
        assert!((sel.total_credits - 100.0).abs() < 1e-9);
    }

    #[test]
    fn over_budget_pair_leaves_captaincy_unset() {
        let pool = vec![
            sp("A", 50.0, 9.0, Category::Batter, false),
            sp("B", 40.0, 95.0, Category::Bowler, true),
        ];
        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(names(&sel), vec!["A"]);
        assert!(sel.captain.is_none());
        assert!(sel.vice_captain.is_none());
        assert!(sel.total_credits <= 100.0);
    }

    #[test]
    fn empty_pool_is_empty_selection() {
        let sel = select_team(&[], &SelectionRules::default());
        assert!(sel.is_empty());
        assert!(sel.captain.is_none());
        assert_eq!(sel.foreign_count, 0);
    }

    #[test]
    fn minimum_fill_takes_one_per_category_before_top_up() {
        // Top six scores are all batters, yet every category gets a slot.
        let mut pool = Vec::new();
        for i in 0..8 {
            pool.push(sp(&format!("Bat{i}"), 100.0 - i as f64, 8.0, Category::Batter, false));
        }
        pool.push(sp("Keeper", 1.0, 8.0, Category::Keeper, false));
        pool.push(sp("AR", 2.0, 8.0, Category::AllRounder, false));
        pool.push(sp("Bowl", 3.0, 8.0, Category::Bowler, false));
        pool.push(sp("Bowl2", 0.5, 8.0, Category::Bowler, false));

        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(sel.len(), 11);
        for category in Category::ALL {
            assert!(sel.in_category(category).count() >= 1, "{category}");
        }
        // Admission order: the category minimums come first.
        assert_eq!(&names(&sel)[..4], &["Keeper", "Bat0", "AR", "Bowl"]);
        // Seven more batters fill the team, landing exactly on the ceiling of 8.
        assert_eq!(sel.in_category(Category::Batter).count(), 8);
        assert!(!sel.contains("Bowl2"));
    }

    #[test]
    fn top_up_category_cap_is_enforced() {
        let mut pool = Vec::new();
        for i in 0..12 {
            pool.push(sp(&format!("Bowl{i}"), 50.0 - i as f64, 5.0, Category::Bowler, false));
        }
        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(sel.len(), 8);
        assert_eq!(sel.in_category(Category::Bowler).count(), 8);
    }

    #[test]
    fn foreign_quota_is_enforced() {
        let mut pool = Vec::new();
        for i in 0..8 {
            pool.push(sp(&format!("F{i}"), 90.0 - i as f64, 8.0, Category::AllRounder, true));
        }
        for i in 0..8 {
            pool.push(sp(&format!("D{i}"), 10.0 - i as f64, 8.0, Category::Batter, false));
        }
        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(sel.foreign_count, 4);
        assert_eq!(sel.picks.iter().filter(|p| p.player.foreign).count(), 4);
        assert_eq!(sel.len(), 11);
    }

    #[test]
    fn budget_is_never_exceeded() {
        let pool: Vec<ScoredPlayer> = (0..22)
            .map(|i| {
                let category = Category::ALL[i % 4];
                sp(
                    &format!("P{i}"),
                    (i * 7 % 13) as f64,
                    8.0 + (i % 5) as f64 * 0.5,
                    category,
                    i % 3 == 0,
                )
            })
            .collect();
        let sel = select_team(&pool, &SelectionRules::default());
        let sum: f64 = sel.picks.iter().map(|p| p.player.credit).sum();
        assert!(sum <= 100.0);
        assert!((sum - sel.total_credits).abs() < 1e-9);
        assert!(sel.foreign_count <= 4);
        assert!(sel.len() <= 11);
    }

    #[test]
    fn ties_keep_input_order() {
        let pool = vec![
            sp("First", 10.0, 8.0, Category::Batter, false),
            sp("Second", 10.0, 8.0, Category::Batter, false),
            sp("Third", 10.0, 8.0, Category::Batter, false),
        ];
        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(names(&sel), vec!["First", "Second", "Third"]);
        assert_eq!(sel.captain.as_deref(), Some("First"));
        assert_eq!(sel.vice_captain.as_deref(), Some("Second"));
    }

    #[test]
    fn captaincy_follows_score_not_admission_order() {
        let pool = vec![
            sp("Keeper", 5.0, 8.0, Category::Keeper, false),
            sp("Star", 80.0, 8.0, Category::Batter, false),
            sp("Bowler", 60.0, 8.0, Category::Bowler, false),
        ];
        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(names(&sel)[0], "Keeper");
        assert_eq!(sel.captain.as_deref(), Some("Star"));
        assert_eq!(sel.vice_captain.as_deref(), Some("Bowler"));
    }

    #[test]
    fn duplicate_names_are_admitted_once() {
        let pool = vec![
            sp("Twin", 10.0, 8.0, Category::Batter, false),
            sp("Twin", 9.0, 8.0, Category::Bowler, false),
        ];
        let sel = select_team(&pool, &SelectionRules::default());
        assert_eq!(names(&sel), vec!["Twin"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let pool: Vec<ScoredPlayer> = (0..22)
            .map(|i| sp(&format!("P{i}"), (i % 6) as f64, 9.0, Category::ALL[i % 4], i % 5 == 0))
            .collect();
        let rules = SelectionRules::default();
        assert_eq!(select_team(&pool, &rules), select_team(&pool, &rules));
    }
}
