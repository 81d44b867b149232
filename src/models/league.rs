//! League (a group of players) and the default seed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a league.
pub type LeagueId = Uuid;

/// League names used when seeding or resetting.
pub const DEFAULT_LEAGUE_NAMES: [&str; 4] = ["Lord of the Rings", "League B", "League C", "League D"];

/// A group of players competing round-robin style.
///
/// Players are identified by their position in `players`; matches refer to them by index.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub players: Vec<String>,
}

impl League {
    pub fn new(name: impl Into<String>, players: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players,
        }
    }

    /// Name of the player at `index`, if the roster still has that slot.
    pub fn player_name(&self, index: usize) -> Option<&str> {
        self.players.get(index).map(String::as_str)
    }

    /// Grow or shrink the roster to `count` players. New slots get default names
    /// numbered from `first_number`.
    pub fn resize_roster(&mut self, count: usize, first_number: usize) {
        if self.players.len() > count {
            self.players.truncate(count);
            return;
        }
        for slot in self.players.len()..count {
            self.players.push(default_player_name(first_number + slot));
        }
    }
}

/// "Player N", as the seed names them.
pub fn default_player_name(number: usize) -> String {
    format!("Player {}", number)
}

/// The default leagues: four groups of `players_per_group`, players numbered across leagues.
pub fn default_leagues(players_per_group: usize) -> Vec<League> {
    DEFAULT_LEAGUE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let first = i * players_per_group + 1;
            let players = (first..first + players_per_group)
                .map(default_player_name)
                .collect();
            League::new(*name, players)
        })
        .collect()
}
