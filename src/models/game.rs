//! Match record and the decoded match outcome.

use crate::models::league::LeagueId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Outcome of a match. Players are referenced by their index in the league roster.
///
/// Stored as a bare number (the winner's index), `"draw"`, or `"forfeit-<index>"`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredWinner", into = "StoredWinner")]
pub enum Winner {
    Player(usize),
    Draw,
    /// The named player forfeited.
    Forfeit(usize),
    /// A stored value that is none of the above (unknown tag, null, negative number...).
    /// Kept verbatim, never scored.
    Unrecognized(serde_json::Value),
}

const DRAW_TAG: &str = "draw";
const FORFEIT_PREFIX: &str = "forfeit-";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredWinner {
    Index(usize),
    Tag(String),
    Other(serde_json::Value),
}

impl From<StoredWinner> for Winner {
    fn from(stored: StoredWinner) -> Self {
        match stored {
            StoredWinner::Index(i) => Winner::Player(i),
            StoredWinner::Tag(tag) => Winner::parse_tag(tag),
            StoredWinner::Other(raw) => Winner::Unrecognized(raw),
        }
    }
}

impl From<Winner> for StoredWinner {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Player(i) => StoredWinner::Index(i),
            Winner::Unrecognized(serde_json::Value::String(tag)) => StoredWinner::Tag(tag),
            Winner::Unrecognized(raw) => StoredWinner::Other(raw),
            other => StoredWinner::Tag(other.to_string()),
        }
    }
}

impl Winner {
    fn parse_tag(tag: String) -> Self {
        if tag == DRAW_TAG {
            return Winner::Draw;
        }
        if let Some(index) = tag.strip_prefix(FORFEIT_PREFIX).and_then(|s| s.parse().ok()) {
            return Winner::Forfeit(index);
        }
        // Older clients sometimes stored the winner index as a string.
        match tag.parse() {
            Ok(index) => Winner::Player(index),
            Err(_) => Winner::Unrecognized(serde_json::Value::String(tag)),
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Player(i) => write!(f, "{}", i),
            Winner::Draw => f.write_str(DRAW_TAG),
            Winner::Forfeit(i) => write!(f, "{}{}", FORFEIT_PREFIX, i),
            Winner::Unrecognized(serde_json::Value::String(raw)) => f.write_str(raw),
            Winner::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

/// A single recorded result between two players of one league.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub league_id: LeagueId,
    /// Roster index of the first player.
    pub player1: usize,
    /// Roster index of the second player.
    pub player2: usize,
    pub winner: Winner,
    pub date: DateTime<Utc>,
}

impl Match {
    pub fn new(
        league_id: LeagueId,
        player1: usize,
        player2: usize,
        winner: Winner,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            league_id,
            player1,
            player2,
            winner,
            date,
        }
    }

    /// True if `index` is one of the two participants.
    pub fn involves(&self, index: usize) -> bool {
        self.player1 == index || self.player2 == index
    }

    /// The other participant, if `index` took part in this match.
    pub fn opponent_of(&self, index: usize) -> Option<usize> {
        if self.player1 == index {
            Some(self.player2)
        } else if self.player2 == index {
            Some(self.player1)
        } else {
            None
        }
    }
}

/// Input for recording a new result; the store assigns id and date.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub league_id: LeagueId,
    pub player1: usize,
    pub player2: usize,
    pub winner: Winner,
}
