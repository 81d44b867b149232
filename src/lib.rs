//! Club ranking web app: library with models, storage and standings logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    compute_standings, compute_standings_with, history_csv, standings_csv, ExportError,
    StandingsBoard,
};
pub use models::{
    League, LeagueId, Match, MatchId, NewMatch, PlayerStat, RankedStat, ScoringRules, Settings,
    Winner,
};
pub use store::{describe_match, Access, Change, PersistError, RosterStore, Snapshot, StoreError};
