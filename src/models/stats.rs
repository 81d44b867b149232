//! PlayerStat: one row of a league's standings table.

use serde::{Deserialize, Serialize};

/// Aggregated results for one roster slot.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    /// Position in the league roster.
    pub player_index: usize,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub forfeits: u32,
    /// Can go negative under a forfeit penalty.
    pub points: i32,
}

impl PlayerStat {
    /// Zeroed row for the player at `player_index`.
    pub fn new(player_index: usize, name: impl Into<String>) -> Self {
        Self {
            player_index,
            name: name.into(),
            ..Self::default()
        }
    }

    /// wins / played, or 0 when nothing has been played.
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.played)
        }
    }

    pub fn record_played(&mut self) {
        self.played += 1;
    }

    pub fn add_win(&mut self, points: i32) {
        self.wins += 1;
        self.points += points;
    }

    pub fn add_loss(&mut self, points: i32) {
        self.losses += 1;
        self.points += points;
    }

    pub fn add_draw(&mut self, points: i32) {
        self.draws += 1;
        self.points += points;
    }

    /// A forfeit also counts as a loss.
    pub fn add_forfeit(&mut self, points: i32) {
        self.forfeits += 1;
        self.losses += 1;
        self.points += points;
    }
}

/// A standings row together with its 1-based rank (for API / display).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankedStat {
    pub rank: usize,
    #[serde(flatten)]
    pub stat: PlayerStat,
}

/// Attach 1-based ranks to an already ordered standings table.
pub fn with_ranks(standings: &[PlayerStat]) -> Vec<RankedStat> {
    standings
        .iter()
        .enumerate()
        .map(|(i, stat)| RankedStat {
            rank: i + 1,
            stat: stat.clone(),
        })
        .collect()
}
