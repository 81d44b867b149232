//! StandingsBoard: computed standings per league, kept in step with the store.

use crate::logic::standings::compute_standings_with;
use crate::models::{LeagueId, PlayerStat};
use crate::store::{Change, RosterStore, StoreError};
use std::collections::HashMap;

/// Last computed standings of every league. Only reads the store.
#[derive(Clone, Debug, Default)]
pub struct StandingsBoard {
    tables: HashMap<LeagueId, Vec<PlayerStat>>,
}

impl StandingsBoard {
    /// Compute standings for every league in `store`.
    pub fn build(store: &RosterStore) -> Self {
        let mut board = Self::default();
        board.rebuild(store);
        board
    }

    /// Recompute whatever `change` touched.
    pub fn apply(&mut self, store: &RosterStore, change: &Change) {
        for id in &change.removed {
            self.tables.remove(id);
        }
        if change.all {
            self.rebuild(store);
            return;
        }
        for &id in &change.updated {
            if let Err(e) = self.refresh(store, id) {
                log::warn!("Could not refresh standings for {}: {}", id, e);
            }
        }
    }

    /// Ranked rows for one league, best first.
    pub fn standings(&self, league_id: LeagueId) -> Option<&[PlayerStat]> {
        self.tables.get(&league_id).map(Vec::as_slice)
    }

    fn refresh(&mut self, store: &RosterStore, id: LeagueId) -> Result<(), StoreError> {
        let league = store.league(id)?;
        let table = compute_standings_with(league, store.matches_for(id), &store.settings().scoring);
        self.tables.insert(id, table);
        Ok(())
    }

    fn rebuild(&mut self, store: &RosterStore) {
        self.tables.clear();
        let scoring = store.settings().scoring;
        for league in store.leagues() {
            let table = compute_standings_with(league, store.matches_for(league.id), &scoring);
            self.tables.insert(league.id, table);
        }
        log::debug!("Recomputed standings for {} league(s)", self.tables.len());
    }
}
