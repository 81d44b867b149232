//! CSV export of standings and match history.

use crate::models::{with_ranks, LeagueId, PlayerStat};
use crate::store::{describe_match, RosterStore};
use serde::Serialize;

/// Errors while building a CSV export.
#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
    Utf8(std::string::FromUtf8Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(e) => write!(f, "CSV error: {}", e),
            ExportError::Io(e) => write!(f, "CSV write error: {}", e),
            ExportError::Utf8(e) => write!(f, "CSV output is not UTF-8: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

#[derive(Serialize)]
struct StandingsRow<'a> {
    rank: usize,
    player: &'a str,
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    forfeits: u32,
    points: i32,
}

#[derive(Serialize)]
struct HistoryRow<'a> {
    date: String,
    league: &'a str,
    player1: &'a str,
    player2: &'a str,
    result: String,
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(ExportError::Utf8)
}

/// One line per player, in ranking order, with a header row.
pub fn standings_csv(standings: &[PlayerStat]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for ranked in with_ranks(standings) {
        let s = &ranked.stat;
        writer.serialize(StandingsRow {
            rank: ranked.rank,
            player: &s.name,
            played: s.played,
            wins: s.wins,
            draws: s.draws,
            losses: s.losses,
            forfeits: s.forfeits,
            points: s.points,
        })?;
    }
    finish(writer)
}

/// Match history, newest first, optionally for one league. Matches whose league is
/// gone are skipped.
pub fn history_csv(store: &RosterStore, league_id: Option<LeagueId>) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for m in store.history(league_id) {
        let Ok(league) = store.league(m.league_id) else {
            continue;
        };
        writer.serialize(HistoryRow {
            date: m.date.to_rfc3339(),
            league: &league.name,
            player1: league.player_name(m.player1).unwrap_or("?"),
            player2: league.player_name(m.player2).unwrap_or("?"),
            result: describe_match(league, m),
        })?;
    }
    finish(writer)
}
