// Score aggregation across head-to-head, venue, and recent-form signals.
//
// Each pass adds signed deltas to a per-run ScoreCard and never overwrites a
// previous contribution, so the passes commute. A player missing from a
// source simply receives nothing from it.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::stats::{
    BattingFormRow, BattingMatchup, BattingVenueRow, BowlingFormRow, BowlingMatchup,
    BowlingVenueRow, Matchup, StatsRepository,
};

/// Economy assumed when a head-to-head or venue record has none.
pub const MISSING_ECONOMY: f64 = 15.0;

/// Economies at or above this earn nothing; below it each run saved is a point.
pub const ECONOMY_CEILING: f64 = 10.0;

// ---------------------------------------------------------------------------
// ScoreCard
// ---------------------------------------------------------------------------

/// Running scores for one prediction run, remembering first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct ScoreCard {
    order: Vec<String>,
    scores: HashMap<String, f64>,
}

impl ScoreCard {
    /// Start every listed player at zero, in the given order.
    pub fn new<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut card = ScoreCard::default();
        for p in players {
            card.ensure(p.as_ref());
        }
        card
    }

    fn ensure(&mut self, player: &str) -> &mut f64 {
        if !self.scores.contains_key(player) {
            self.order.push(player.to_string());
        }
        self.scores.entry(player.to_string()).or_insert(0.0)
    }

    /// Add a contribution. Non-finite deltas are dropped.
    pub fn add(&mut self, player: &str, delta: f64) {
        if !delta.is_finite() {
            warn!("dropping non-finite score delta for '{}'", player);
            return;
        }
        *self.ensure(player) += delta;
    }

    pub fn score(&self, player: &str) -> f64 {
        self.scores.get(player).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Players and scores in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.score(name)))
    }
}

// ---------------------------------------------------------------------------
// Per-record deltas
// ---------------------------------------------------------------------------

fn economy_points(economy: f64) -> f64 {
    ECONOMY_CEILING - economy.min(ECONOMY_CEILING)
}

/// `(SR/100)*2 + AVG/10 + BP/10 - D*2`
pub fn batting_matchup_delta(m: &BattingMatchup) -> f64 {
    (m.strike_rate / 100.0) * 2.0 + m.average / 10.0 + m.boundary_pct / 10.0 - m.dismissals * 2.0
}

/// `dismissals*5 + (10 - min(economy, 10))`, economy defaulting to 15.
pub fn bowling_matchup_delta(m: &BowlingMatchup) -> f64 {
    m.dismissals * 5.0 + economy_points(m.economy.unwrap_or(MISSING_ECONOMY))
}

/// `strikeRate/100 + average/20`
pub fn batting_venue_delta(row: &BattingVenueRow) -> f64 {
    row.strike_rate.unwrap_or(0.0) / 100.0 + row.average.unwrap_or(0.0) / 20.0
}

/// `wickets*3 + (10 - min(economy, 10))`, economy defaulting to 15.
pub fn bowling_venue_delta(row: &BowlingVenueRow) -> f64 {
    row.wickets.unwrap_or(0.0) * 3.0 + economy_points(row.economy.unwrap_or(MISSING_ECONOMY))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// `avgRuns/10 + avgStrikeRate/100`; a column with no values adds nothing.
pub fn batting_form_delta(rows: &[BattingFormRow]) -> f64 {
    let runs = mean(rows.iter().filter_map(|r| r.runs)).map_or(0.0, |m| m / 10.0);
    let sr = mean(rows.iter().filter_map(|r| r.strike_rate)).map_or(0.0, |m| m / 100.0);
    runs + sr
}

/// `avgWickets*5 + (10 - min(avgEconomy, 10))`; a column with no values adds nothing.
pub fn bowling_form_delta(rows: &[BowlingFormRow]) -> f64 {
    let wickets = mean(rows.iter().filter_map(|r| r.wickets)).map_or(0.0, |m| m * 5.0);
    let economy = mean(rows.iter().filter_map(|r| r.economy)).map_or(0.0, economy_points);
    wickets + economy
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Score one direction of the head-to-head matchups.
///
/// Batters of `batting_side` are credited from their records against each
/// bowler of `bowling_side`, and those bowlers from their records against the
/// same batters. Run it again with the sides swapped for the reverse.
pub fn apply_matchups<R, S>(
    card: &mut ScoreCard,
    batting_side: &[S],
    bowling_side: &[S],
    stats: &R,
) where
    R: StatsRepository + ?Sized,
    S: AsRef<str>,
{
    let mut records = 0usize;

    for batter in batting_side.iter().map(|s| s.as_ref()) {
        let Some(profile) = stats.batting(batter) else {
            continue;
        };
        for bowler in bowling_side.iter().map(|s| s.as_ref()) {
            if let Some(Matchup::Recorded(m)) = profile.head_to_head.get(bowler) {
                card.add(batter, batting_matchup_delta(m));
                records += 1;
            }
        }
    }

    for bowler in bowling_side.iter().map(|s| s.as_ref()) {
        let Some(profile) = stats.bowling(bowler) else {
            continue;
        };
        for batter in batting_side.iter().map(|s| s.as_ref()) {
            if let Some(Matchup::Recorded(m)) = profile.head_to_head.get(batter) {
                card.add(bowler, bowling_matchup_delta(m));
                records += 1;
            }
        }
    }

    debug!("matchup pass applied {} head-to-head records", records);
}

/// Score each player's record at `venue` (case-insensitive substring match).
pub fn apply_venue<R, S>(card: &mut ScoreCard, venue: &str, players: &[S], stats: &R)
where
    R: StatsRepository + ?Sized,
    S: AsRef<str>,
{
    let needle = venue.trim().to_lowercase();
    if needle.is_empty() {
        debug!("venue pass skipped: no venue given");
        return;
    }
    let at_venue = |row_venue: &str| row_venue.to_lowercase().contains(&needle);
    let mut hits = 0usize;

    for player in players.iter().map(|s| s.as_ref()) {
        if let Some(row) = stats
            .batting(player)
            .and_then(|p| p.venues.iter().find(|r| at_venue(&r.venue)))
        {
            card.add(player, batting_venue_delta(row));
            hits += 1;
        }
        if let Some(row) = stats
            .bowling(player)
            .and_then(|p| p.venues.iter().find(|r| at_venue(&r.venue)))
        {
            card.add(player, bowling_venue_delta(row));
            hits += 1;
        }
    }

    debug!("venue pass matched {} rows for '{}'", hits, venue.trim());
}

/// Score each player's recent-form series.
pub fn apply_recent_form<R, S>(card: &mut ScoreCard, players: &[S], stats: &R)
where
    R: StatsRepository + ?Sized,
    S: AsRef<str>,
{
    for player in players.iter().map(|s| s.as_ref()) {
        if let Some(profile) = stats.batting(player) {
            if !profile.recent_form.is_empty() {
                card.add(player, batting_form_delta(&profile.recent_form));
            }
        }
        if let Some(profile) = stats.bowling(player) {
            if !profile.recent_form.is_empty() {
                card.add(player, bowling_form_delta(&profile.recent_form));
            }
        }
    }
}

/// Run every pass for a two-sided fixture and return a fresh card.
///
/// Players start at zero in `home` then `away` order; that order is the
/// tie-break the selector relies on.
pub fn aggregate<R, S>(home: &[S], away: &[S], venue: &str, stats: &R) -> ScoreCard
where
    R: StatsRepository + ?Sized,
    S: AsRef<str>,
{
    let everyone: Vec<&str> = home.iter().chain(away.iter()).map(|s| s.as_ref()).collect();
    let mut card = ScoreCard::new(&everyone);

    apply_matchups(&mut card, home, away, stats);
    apply_matchups(&mut card, away, home, stats);
    apply_venue(&mut card, venue, &everyone, stats);
    apply_recent_form(&mut card, &everyone, stats);

    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{BattingProfile, BowlingProfile, StatsBook};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn batting_record(sr: f64, avg: f64, bp: f64, d: f64) -> Matchup<BattingMatchup> {
        Matchup::Recorded(BattingMatchup {
            strike_rate: sr,
            average: avg,
            boundary_pct: bp,
            dismissals: d,
        })
    }

    #[test]
    fn batting_matchup_formula() {
        let m = BattingMatchup {
            strike_rate: 150.0,
            average: 30.0,
            boundary_pct: 20.0,
            dismissals: 1.0,
        };
        // 3.0 + 3.0 + 2.0 - 2.0
        assert!(approx(batting_matchup_delta(&m), 6.0));
    }

    #[test]
    fn bowling_matchup_missing_economy_earns_nothing() {
        let m = BowlingMatchup {
            dismissals: 2.0,
            economy: None,
        };
        assert!(approx(bowling_matchup_delta(&m), 10.0));
    }

    #[test]
    fn bowling_matchup_economy_is_capped() {
        let cheap = BowlingMatchup {
            dismissals: 0.0,
            economy: Some(6.5),
        };
        let expensive = BowlingMatchup {
            dismissals: 0.0,
            economy: Some(12.0),
        };
        assert!(approx(bowling_matchup_delta(&cheap), 3.5));
        assert!(approx(bowling_matchup_delta(&expensive), 0.0));
    }

    #[test]
    fn venue_formulas() {
        let bat = BattingVenueRow {
            venue: "Wankhede Stadium, Mumbai".into(),
            strike_rate: Some(140.0),
            average: Some(40.0),
        };
        assert!(approx(batting_venue_delta(&bat), 3.4));

        let bowl = BowlingVenueRow {
            venue: "Wankhede Stadium, Mumbai".into(),
            wickets: Some(4.0),
            economy: None,
        };
        assert!(approx(bowling_venue_delta(&bowl), 12.0));
    }

    #[test]
    fn form_formulas_skip_missing_values() {
        let rows = [
            BattingFormRow {
                runs: Some(40.0),
                strike_rate: Some(150.0),
            },
            BattingFormRow {
                runs: Some(20.0),
                strike_rate: None,
            },
        ];
        // mean runs 30 -> 3.0, mean SR 150 -> 1.5
        assert!(approx(batting_form_delta(&rows), 4.5));

        let rows = [
            BowlingFormRow {
                wickets: Some(2.0),
                economy: Some(8.0),
            },
            BowlingFormRow {
                wickets: Some(0.0),
                economy: Some(6.0),
            },
        ];
        // mean wickets 1 -> 5.0, mean econ 7 -> 3.0
        assert!(approx(bowling_form_delta(&rows), 8.0));
        assert!(approx(bowling_form_delta(&[]), 0.0));
    }

    #[test]
    fn score_card_keeps_first_insertion_order() {
        let mut card = ScoreCard::new(["B", "A"]);
        card.add("C", 1.0);
        card.add("A", 2.0);
        let names: Vec<&str> = card.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert!(approx(card.score("A"), 2.0));
        assert!(approx(card.score("missing"), 0.0));
    }

    #[test]
    fn score_card_drops_non_finite() {
        let mut card = ScoreCard::new(["A"]);
        card.add("A", f64::NAN);
        card.add("A", f64::INFINITY);
        assert!(approx(card.score("A"), 0.0));
    }

    #[test]
    fn no_data_records_are_skipped() {
        let mut stats = StatsBook::new();
        let mut profile = BattingProfile::default();
        profile.head_to_head.insert("Bowler".into(), Matchup::NoData);
        stats.insert_batting("Batter", profile);

        let mut card = ScoreCard::new(["Batter", "Bowler"]);
        apply_matchups(&mut card, &["Batter"], &["Bowler"], &stats);
        assert!(approx(card.score("Batter"), 0.0));
    }

    #[test]
    fn matchup_pass_credits_both_sides() {
        let mut stats = StatsBook::new();
        let mut bat = BattingProfile::default();
        bat.head_to_head
            .insert("Bumrah".into(), batting_record(100.0, 10.0, 10.0, 1.0));
        stats.insert_batting("Gill", bat);

        let mut bowl = BowlingProfile::default();
        bowl.head_to_head.insert(
            "Gill".into(),
            Matchup::Recorded(BowlingMatchup {
                dismissals: 1.0,
                economy: Some(7.0),
            }),
        );
        stats.insert_bowling("Bumrah", bowl);

        let mut card = ScoreCard::new(["Gill", "Bumrah"]);
        apply_matchups(&mut card, &["Gill"], &["Bumrah"], &stats);
        // 2 + 1 + 1 - 2
        assert!(approx(card.score("Gill"), 2.0));
        // 5 + 3
        assert!(approx(card.score("Bumrah"), 8.0));

        // Reverse direction finds nothing: Bumrah has no batting record.
        apply_matchups(&mut card, &["Bumrah"], &["Gill"], &stats);
        assert!(approx(card.score("Gill"), 2.0));
        assert!(approx(card.score("Bumrah"), 8.0));
    }

    #[test]
    fn venue_pass_matches_substring_case_insensitively() {
        let mut stats = StatsBook::new();
        let mut bat = BattingProfile::default();
        bat.venues.push(BattingVenueRow {
            venue: "Eden Gardens, Kolkata".into(),
            strike_rate: Some(500.0),
            average: None,
        });
        bat.venues.push(BattingVenueRow {
            venue: "Wankhede Stadium, Mumbai".into(),
            strike_rate: Some(100.0),
            average: Some(20.0),
        });
        stats.insert_batting("Rohit", bat);

        let mut card = ScoreCard::new(["Rohit"]);
        apply_venue(&mut card, "wankhede", &["Rohit"], &stats);
        assert!(approx(card.score("Rohit"), 2.0));

        apply_venue(&mut card, "Chepauk", &["Rohit"], &stats);
        assert!(approx(card.score("Rohit"), 2.0));
    }

    #[test]
    fn all_rounder_collects_from_both_datasets() {
        let mut stats = StatsBook::new();
        let mut bat = BattingProfile::default();
        bat.recent_form.push(BattingFormRow {
            runs: Some(30.0),
            strike_rate: Some(120.0),
        });
        stats.insert_batting("Hardik", bat);
        let mut bowl = BowlingProfile::default();
        bowl.recent_form.push(BowlingFormRow {
            wickets: Some(1.0),
            economy: Some(9.0),
        });
        stats.insert_bowling("Hardik", bowl);

        let mut card = ScoreCard::new(["Hardik"]);
        apply_recent_form(&mut card, &["Hardik"], &stats);
        // 3.0 + 1.2 + 5.0 + 1.0
        assert!(approx(card.score("Hardik"), 10.2));
    }

    #[test]
    fn aggregate_is_order_independent_and_repeatable() {
        let mut stats = StatsBook::new();
        let mut bat = BattingProfile::default();
        bat.head_to_head
            .insert("Y".into(), batting_record(120.0, 25.0, 15.0, 0.0));
        bat.venues.push(BattingVenueRow {
            venue: "Ground".into(),
            strike_rate: Some(130.0),
            average: Some(30.0),
        });
        stats.insert_batting("X", bat);

        let a = aggregate(&["X"], &["Y"], "ground", &stats);
        let b = aggregate(&["X"], &["Y"], "ground", &stats);
        assert_eq!(a.score("X").to_bits(), b.score("X").to_bits());

        // Passes in a different order reach the same total.
        let mut card = ScoreCard::new(["X", "Y"]);
        apply_venue(&mut card, "ground", &["X", "Y"], &stats);
        apply_matchups(&mut card, &["Y"], &["X"], &stats);
        apply_matchups(&mut card, &["X"], &["Y"], &stats);
        assert!(approx(card.score("X"), a.score("X")));
    }
}
