//! RosterStore: the single owner of leagues, matches and settings.

use crate::models::{
    default_leagues, League, LeagueId, Match, MatchId, NewMatch, Settings, ScoringRules, Winner,
    DEFAULT_PLAYERS_PER_GROUP, MAX_PLAYERS_PER_GROUP, MIN_PLAYERS_PER_GROUP,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur during store operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The caller does not hold the admin capability.
    PermissionDenied,
    LeagueNotFound(LeagueId),
    MatchNotFound(MatchId),
    /// A player index does not exist in the league roster.
    PlayerOutOfRange { index: usize, roster_len: usize },
    /// Both sides of a match are the same player.
    SamePlayer,
    /// The winner is not a participant, a draw, or a forfeit by a participant.
    InvalidWinner,
    /// Players per group outside 2..=10.
    InvalidPlayersPerGroup(u8),
    EmptyLeagueName,
    EmptyRoster,
    /// A blank player name in a slot the roster does not have yet.
    BlankPlayerName { index: usize },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::PermissionDenied => write!(f, "Admin access required"),
            StoreError::LeagueNotFound(_) => write!(f, "League not found"),
            StoreError::MatchNotFound(_) => write!(f, "Match not found"),
            StoreError::PlayerOutOfRange { index, roster_len } => {
                write!(f, "Player {} does not exist (league has {} players)", index, roster_len)
            }
            StoreError::SamePlayer => write!(f, "A player cannot play against themselves"),
            StoreError::InvalidWinner => write!(f, "Winner must be one of the two players, a draw, or a forfeit"),
            StoreError::InvalidPlayersPerGroup(n) => write!(
                f,
                "Players per group must be between {} and {} (got {})",
                MIN_PLAYERS_PER_GROUP, MAX_PLAYERS_PER_GROUP, n
            ),
            StoreError::EmptyLeagueName => write!(f, "League name cannot be empty"),
            StoreError::EmptyRoster => write!(f, "A league needs at least one player"),
            StoreError::BlankPlayerName { index } => {
                write!(f, "New player {} needs a name", index + 1)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Capability of the caller, established outside the store (e.g. by a signed-in session).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    Admin,
    Viewer,
}

impl Access {
    fn require_admin(self) -> Result<(), StoreError> {
        match self {
            Access::Admin => Ok(()),
            Access::Viewer => Err(StoreError::PermissionDenied),
        }
    }
}

/// What a successful mutation touched, so standings can be recomputed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Change {
    /// Leagues whose roster or matches changed.
    pub updated: Vec<LeagueId>,
    /// Leagues that no longer exist.
    pub removed: Vec<LeagueId>,
    /// Every league is affected (scoring switch, reset).
    pub all: bool,
}

impl Change {
    fn league(id: LeagueId) -> Self {
        Self {
            updated: vec![id],
            ..Self::default()
        }
    }

    fn everything(removed: Vec<LeagueId>) -> Self {
        Self {
            removed,
            all: true,
            ..Self::default()
        }
    }
}

/// Serializable copy of the whole store.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub settings: Settings,
    pub leagues: Vec<League>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// Leagues, matches and settings. Reads are open; every write needs [`Access::Admin`].
#[derive(Clone, Debug)]
pub struct RosterStore {
    settings: Settings,
    leagues: Vec<League>,
    matches: Vec<Match>,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::seeded(Settings::default())
    }
}

impl RosterStore {
    /// A store holding the default leagues for `settings.players_per_group` and no matches.
    pub fn seeded(settings: Settings) -> Self {
        let leagues = default_leagues(usize::from(settings.players_per_group));
        Self {
            settings,
            leagues,
            matches: Vec::new(),
        }
    }

    /// Rebuild from a snapshot. An empty league list is reseeded, as on first start.
    /// An out-of-range players per group falls back to the default.
    pub fn from_snapshot(mut snapshot: Snapshot) -> Self {
        let n = snapshot.settings.players_per_group;
        if !Settings::is_valid_players_per_group(n) {
            log::warn!(
                "Players per group {} in snapshot is out of range; using {}",
                n,
                DEFAULT_PLAYERS_PER_GROUP
            );
            snapshot.settings.players_per_group = DEFAULT_PLAYERS_PER_GROUP;
        }
        if snapshot.leagues.is_empty() {
            log::info!("No leagues in snapshot; seeding defaults");
            return Self::seeded(snapshot.settings);
        }
        Self {
            settings: snapshot.settings,
            leagues: snapshot.leagues,
            matches: snapshot.matches,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            settings: self.settings.clone(),
            leagues: self.leagues.clone(),
            matches: self.matches.clone(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// All leagues in creation order.
    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    pub fn league(&self, id: LeagueId) -> Result<&League, StoreError> {
        self.leagues
            .iter()
            .find(|l| l.id == id)
            .ok_or(StoreError::LeagueNotFound(id))
    }

    fn league_mut(&mut self, id: LeagueId) -> Result<&mut League, StoreError> {
        self.leagues
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(StoreError::LeagueNotFound(id))
    }

    pub fn get_match(&self, id: MatchId) -> Result<&Match, StoreError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(StoreError::MatchNotFound(id))
    }

    /// Matches of one league, in no particular order.
    pub fn matches_for(&self, league_id: LeagueId) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| m.league_id == league_id)
            .collect()
    }

    /// Match history, newest first, optionally limited to one league.
    pub fn history(&self, league_id: Option<LeagueId>) -> Vec<&Match> {
        let mut list: Vec<&Match> = self
            .matches
            .iter()
            .filter(|m| league_id.map_or(true, |id| m.league_id == id))
            .collect();
        list.sort_by(|a, b| b.date.cmp(&a.date));
        list
    }

    /// Add a league with the given roster (names are trimmed; blank names are rejected).
    pub fn create_league(
        &mut self,
        access: Access,
        name: &str,
        players: Vec<String>,
    ) -> Result<(Change, LeagueId), StoreError> {
        access.require_admin()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyLeagueName);
        }
        let players: Vec<String> = players
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if players.is_empty() {
            return Err(StoreError::EmptyRoster);
        }
        let league = League::new(name, players);
        let id = league.id;
        log::info!("Created league {} ({})", league.name, id);
        self.leagues.push(league);
        Ok((Change::league(id), id))
    }

    /// Rename a league and/or replace its roster.
    ///
    /// A blank name or a blank player entry keeps the current value at that position.
    /// New slots beyond the current roster must be named. The roster may grow or shrink;
    /// matches referring to removed slots stay stored and are ignored by the standings.
    pub fn update_league(
        &mut self,
        access: Access,
        id: LeagueId,
        name: Option<&str>,
        players: Option<Vec<String>>,
    ) -> Result<Change, StoreError> {
        access.require_admin()?;
        let league = self.league_mut(id)?;

        let new_name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => league.name.clone(),
        };
        let new_players = match players {
            Some(list) => {
                let merged = list
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let p = p.trim();
                        if !p.is_empty() {
                            return Ok(p.to_string());
                        }
                        league
                            .players
                            .get(i)
                            .cloned()
                            .ok_or(StoreError::BlankPlayerName { index: i })
                    })
                    .collect::<Result<Vec<String>, StoreError>>()?;
                if merged.is_empty() {
                    return Err(StoreError::EmptyRoster);
                }
                merged
            }
            None => league.players.clone(),
        };

        league.name = new_name;
        league.players = new_players;
        log::debug!("Updated league {} ({} players)", id, league.players.len());
        Ok(Change::league(id))
    }

    /// Remove a league and every match recorded in it.
    pub fn delete_league(&mut self, access: Access, id: LeagueId) -> Result<Change, StoreError> {
        access.require_admin()?;
        let idx = self
            .leagues
            .iter()
            .position(|l| l.id == id)
            .ok_or(StoreError::LeagueNotFound(id))?;
        let league = self.leagues.remove(idx);
        let before = self.matches.len();
        self.matches.retain(|m| m.league_id != id);
        log::info!(
            "Deleted league {} and {} match(es)",
            league.name,
            before - self.matches.len()
        );
        Ok(Change {
            removed: vec![id],
            ..Change::default()
        })
    }

    /// Record a result. Both players must exist and differ; the winner must be one of
    /// them, a draw, or a forfeit by one of them.
    pub fn record_match(
        &mut self,
        access: Access,
        new_match: NewMatch,
        date: DateTime<Utc>,
    ) -> Result<(Change, MatchId), StoreError> {
        access.require_admin()?;
        let league = self.league(new_match.league_id)?;
        let roster_len = league.players.len();
        for index in [new_match.player1, new_match.player2] {
            if index >= roster_len {
                return Err(StoreError::PlayerOutOfRange { index, roster_len });
            }
        }
        if new_match.player1 == new_match.player2 {
            return Err(StoreError::SamePlayer);
        }
        let is_participant = |i: usize| i == new_match.player1 || i == new_match.player2;
        let valid_winner = match new_match.winner {
            Winner::Draw => true,
            Winner::Player(i) | Winner::Forfeit(i) => is_participant(i),
            Winner::Unrecognized(_) => false,
        };
        if !valid_winner {
            return Err(StoreError::InvalidWinner);
        }

        let m = Match::new(
            new_match.league_id,
            new_match.player1,
            new_match.player2,
            new_match.winner,
            date,
        );
        let id = m.id;
        log::info!("Recorded match {}: {}", id, describe_match(league, &m));
        self.matches.push(m);
        Ok((Change::league(new_match.league_id), id))
    }

    /// Hard-delete a match.
    pub fn delete_match(&mut self, access: Access, id: MatchId) -> Result<Change, StoreError> {
        access.require_admin()?;
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::MatchNotFound(id))?;
        let m = self.matches.remove(idx);
        log::info!("Deleted match {}", id);
        Ok(Change::league(m.league_id))
    }

    /// Correct the date of a match. Nothing else about a match can change.
    pub fn update_match_date(
        &mut self,
        access: Access,
        id: MatchId,
        date: DateTime<Utc>,
    ) -> Result<Change, StoreError> {
        access.require_admin()?;
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::MatchNotFound(id))?;
        m.date = date;
        Ok(Change::league(m.league_id))
    }

    /// Delete all matches and reseed the default leagues with the current players per group.
    pub fn reset_to_defaults(&mut self, access: Access) -> Result<Change, StoreError> {
        access.require_admin()?;
        let leagues = default_leagues(usize::from(self.settings.players_per_group));
        let removed = self.leagues.iter().map(|l| l.id).collect();
        self.leagues = leagues;
        self.matches.clear();
        log::info!("Reset all leagues to defaults");
        Ok(Change::everything(removed))
    }

    /// Change players per group and resize every league to match.
    ///
    /// Applied to all leagues or none: the value is validated before anything changes.
    /// Added slots are named "Player N", numbered as in the default seed.
    pub fn set_players_per_group(&mut self, access: Access, n: u8) -> Result<Change, StoreError> {
        access.require_admin()?;
        if !Settings::is_valid_players_per_group(n) {
            return Err(StoreError::InvalidPlayersPerGroup(n));
        }
        let count = usize::from(n);
        let mut leagues = self.leagues.clone();
        for (i, league) in leagues.iter_mut().enumerate() {
            league.resize_roster(count, i * count + 1);
        }
        self.leagues = leagues;
        self.settings.players_per_group = n;
        log::info!("Players per group set to {}", n);
        Ok(Change::everything(Vec::new()))
    }

    /// Switch the point table used for every league.
    pub fn set_scoring(&mut self, access: Access, rules: ScoringRules) -> Result<Change, StoreError> {
        access.require_admin()?;
        self.settings.scoring = rules;
        log::info!("Scoring rules set to {:?}", rules);
        Ok(Change::everything(Vec::new()))
    }
}

/// Human-readable result line, e.g. "Alice defeated Bob". Missing roster slots show as "?".
pub fn describe_match(league: &League, m: &Match) -> String {
    let name = move |i: usize| league.player_name(i).unwrap_or("?");
    let (p1, p2) = (name(m.player1), name(m.player2));
    match &m.winner {
        Winner::Draw => format!("{} drew with {}", p1, p2),
        Winner::Forfeit(x) => match m.opponent_of(*x) {
            Some(other) => format!("{} forfeited against {}", name(*x), name(other)),
            None => format!("{} vs {} (invalid forfeit)", p1, p2),
        },
        Winner::Player(w) => match m.opponent_of(*w) {
            Some(other) => format!("{} defeated {}", name(*w), name(other)),
            None => format!("{} vs {} (no result)", p1, p2),
        },
        Winner::Unrecognized(_) => format!("{} vs {} (no result)", p1, p2),
    }
}
