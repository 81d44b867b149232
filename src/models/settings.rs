//! Club-wide settings: roster size for seeding and the point table.

use serde::{Deserialize, Serialize};

/// Smallest allowed players per group.
pub const MIN_PLAYERS_PER_GROUP: u8 = 2;
/// Largest allowed players per group.
pub const MAX_PLAYERS_PER_GROUP: u8 = 10;
/// Seed size when nothing else is configured.
pub const DEFAULT_PLAYERS_PER_GROUP: u8 = 5;

/// Points awarded per outcome.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub win: i32,
    pub draw: i32,
    pub loss: i32,
    /// Applied to the player who forfeited. The opponent gets nothing.
    pub forfeit: i32,
}

impl ScoringRules {
    /// 3 for a win, 1 for a draw, -1 for a forfeit.
    pub const STANDARD: ScoringRules = ScoringRules {
        win: 3,
        draw: 1,
        loss: 0,
        forfeit: -1,
    };

    /// One point per win; draws and forfeits carry no points.
    pub const LEGACY: ScoringRules = ScoringRules {
        win: 1,
        draw: 0,
        loss: 0,
        forfeit: 0,
    };
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Roster size used when seeding, resetting or resizing leagues.
    pub players_per_group: u8,
    #[serde(default)]
    pub scoring: ScoringRules,
}

impl Settings {
    pub fn is_valid_players_per_group(n: u8) -> bool {
        (MIN_PLAYERS_PER_GROUP..=MAX_PLAYERS_PER_GROUP).contains(&n)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            players_per_group: DEFAULT_PLAYERS_PER_GROUP,
            scoring: ScoringRules::STANDARD,
        }
    }
}
