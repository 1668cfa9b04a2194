// One prediction run: playing elevens + venue in, scored players and a team out.
//
// `predict` only reads its inputs and returns a fresh `Prediction`, so a single
// loaded stats bundle can back any number of runs at once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{classify, SpecialistKeepers};
use crate::player::{LineupEntry, Player, ScoredPlayer};
use crate::scoring::aggregate;
use crate::selection::{select_team, Selection, SelectionRules};
use crate::stats::{RosterBook, StatsRepository};

/// A side's name and its free-text playing eleven.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSheet {
    pub name: String,
    /// `"Name(Role)"` entries; the role part is optional.
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: TeamSheet,
    pub away: TeamSheet,
    pub venue: String,
}

impl Fixture {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }
}

/// Everything a run needs besides the fixture itself.
pub struct Engine<'a, R: StatsRepository + ?Sized> {
    pub stats: &'a R,
    pub roster: &'a RosterBook,
    pub rules: &'a SelectionRules,
    pub keepers: &'a SpecialistKeepers,
}

/// The outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home: String,
    pub away: String,
    pub venue: String,
    /// Every named player with their final score, home side first.
    pub players: Vec<ScoredPlayer>,
    pub selection: Selection,
}

impl Prediction {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home, self.away)
    }
}

impl<'a, R: StatsRepository + ?Sized> Engine<'a, R> {
    /// Resolve one side's entries into classified, priced players.
    ///
    /// A name repeated anywhere in the fixture keeps its first occurrence.
    fn resolve_side(&self, sheet: &TeamSheet, seen: &mut HashSet<String>) -> Vec<Player> {
        let mut players = Vec::with_capacity(sheet.entries.len());
        for raw in &sheet.entries {
            let entry = LineupEntry::parse(raw);
            if entry.name.is_empty() {
                debug!("skipping blank lineup entry in {}", sheet.name);
                continue;
            }
            if !seen.insert(entry.name.clone()) {
                debug!("duplicate lineup entry '{}' ignored", entry.name);
                continue;
            }

            let roster = self.roster.lookup(&entry.name, self.rules.default_credit);
            let declared = entry
                .role
                .clone()
                .or_else(|| roster.as_ref().map(|r| r.role.clone()));
            let category = classify(
                &entry.name,
                declared.as_deref(),
                self.stats.has_batting(&entry.name),
                self.stats.has_bowling(&entry.name),
                self.keepers,
            );
            if roster.is_none() {
                debug!("'{}' not on any squad sheet, using default credit", entry.name);
            }

            players.push(Player {
                name: entry.name,
                team: sheet.name.clone(),
                category,
                credit: roster.as_ref().map_or(self.rules.default_credit, |r| r.credit),
                foreign: roster.as_ref().is_some_and(|r| r.foreign),
            });
        }
        players
    }

    /// Score both elevens and pick a team.
    pub fn predict(&self, fixture: &Fixture) -> Prediction {
        let mut seen = HashSet::new();
        let home = self.resolve_side(&fixture.home, &mut seen);
        let away = self.resolve_side(&fixture.away, &mut seen);

        let home_names: Vec<&str> = home.iter().map(|p| p.name.as_str()).collect();
        let away_names: Vec<&str> = away.iter().map(|p| p.name.as_str()).collect();
        let card = aggregate(&home_names, &away_names, &fixture.venue, self.stats);

        let players: Vec<ScoredPlayer> = home
            .into_iter()
            .chain(away)
            .map(|player| {
                let score = card.score(&player.name);
                ScoredPlayer { player, score }
            })
            .collect();

        let selection = select_team(&players, self.rules);
        info!(
            "{}: scored {} players, picked {}",
            fixture.label(),
            players.len(),
            selection.len()
        );

        Prediction {
            home: fixture.home.name.clone(),
            away: fixture.away.name.clone(),
            venue: fixture.venue.clone(),
            players,
            selection,
        }
    }
}

/// Free-function form of [`Engine::predict`].
pub fn predict<R: StatsRepository + ?Sized>(
    fixture: &Fixture,
    stats: &R,
    roster: &RosterBook,
    rules: &SelectionRules,
    keepers: &SpecialistKeepers,
) -> Prediction {
    Engine {
        stats,
        roster,
        rules,
        keepers,
    }
    .predict(fixture)
}
