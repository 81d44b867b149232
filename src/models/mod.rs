//! Data structures for the club: leagues, matches, settings, standings rows.

mod game;
mod league;
mod settings;
mod stats;

pub use game::{Match, MatchId, NewMatch, Winner};
pub use league::{default_leagues, default_player_name, League, LeagueId, DEFAULT_LEAGUE_NAMES};
pub use settings::{
    ScoringRules, Settings, DEFAULT_PLAYERS_PER_GROUP, MAX_PLAYERS_PER_GROUP,
    MIN_PLAYERS_PER_GROUP,
};
pub use stats::{with_ranks, PlayerStat, RankedStat};
