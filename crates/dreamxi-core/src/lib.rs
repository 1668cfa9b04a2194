// Scoring and selection engine. Pure over in-memory inputs; no file I/O.

pub mod classify;
pub mod matchup;
pub mod player;
pub mod predict;
pub mod scoring;
pub mod selection;
pub mod stats;

pub use classify::{classify, role_category, SpecialistKeepers};
pub use matchup::{analyze_matchup, Delivery, ExtrasType, MatchupError, MatchupSummary};
pub use player::{Category, LineupEntry, Player, ScoredPlayer, DEFAULT_CREDIT};
pub use predict::{predict, Engine, Fixture, Prediction, TeamSheet};
pub use scoring::{aggregate, ScoreCard};
pub use selection::{select_team, Selection, SelectionRules};
pub use stats::{
    BattingFormRow, BattingMatchup, BattingProfile, BattingVenueRow, BowlingFormRow,
    BowlingMatchup, BowlingProfile, BowlingVenueRow, Matchup, RosterBook, RosterEntry,
    RosterInfo, StatsBook, StatsRepository,
};
