//! Integration tests for the roster store: seeding, capability checks, mutations.

use chrono::{DateTime, TimeZone, Utc};
use club_ranking_web::{
    describe_match, Access, LeagueId, NewMatch, RosterStore, ScoringRules, Settings, StoreError,
    Winner,
};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 18, 0, 0).unwrap()
}

fn first_league(store: &RosterStore) -> LeagueId {
    store.leagues()[0].id
}

fn new_match(league_id: LeagueId, p1: usize, p2: usize, winner: Winner) -> NewMatch {
    NewMatch {
        league_id,
        player1: p1,
        player2: p2,
        winner,
    }
}

#[test]
fn default_store_has_four_leagues_of_five() {
    let store = RosterStore::default();
    let leagues = store.leagues();

    assert_eq!(leagues.len(), 4);
    assert_eq!(leagues[0].name, "Lord of the Rings");
    assert_eq!(leagues[3].name, "League D");
    assert!(leagues.iter().all(|l| l.players.len() == 5));
    assert_eq!(leagues[0].players[0], "Player 1");
    assert_eq!(leagues[1].players[0], "Player 6");
    assert_eq!(leagues[3].players[4], "Player 20");
    assert_eq!(store.settings(), &Settings::default());
}

#[test]
fn viewer_cannot_mutate_anything() {
    let mut store = RosterStore::default();
    let league_id = first_league(&store);
    let (_, match_id) = store
        .record_match(Access::Admin, new_match(league_id, 0, 1, Winner::Draw), at(1))
        .unwrap();
    let v = Access::Viewer;

    assert_eq!(
        store.record_match(v, new_match(league_id, 0, 1, Winner::Draw), at(2)),
        Err(StoreError::PermissionDenied)
    );
    assert_eq!(store.delete_match(v, match_id), Err(StoreError::PermissionDenied));
    assert_eq!(store.update_match_date(v, match_id, at(3)), Err(StoreError::PermissionDenied));
    assert_eq!(
        store.create_league(v, "New", vec!["X".into()]),
        Err(StoreError::PermissionDenied)
    );
    assert_eq!(
        store.update_league(v, league_id, Some("Renamed"), None),
        Err(StoreError::PermissionDenied)
    );
    assert_eq!(store.delete_league(v, league_id), Err(StoreError::PermissionDenied));
    assert_eq!(store.reset_to_defaults(v), Err(StoreError::PermissionDenied));
    assert_eq!(store.set_players_per_group(v, 4), Err(StoreError::PermissionDenied));
    assert_eq!(
        store.set_scoring(v, ScoringRules::LEGACY),
        Err(StoreError::PermissionDenied)
    );

    // Nothing changed.
    assert_eq!(store.history(None).len(), 1);
    assert_eq!(store.leagues().len(), 4);
    assert_eq!(store.leagues()[0].name, "Lord of the Rings");
}

#[test]
fn record_match_validates_players_and_winner() {
    let mut store = RosterStore::default();
    let league_id = first_league(&store);
    let a = Access::Admin;

    assert_eq!(
        store.record_match(a, new_match(league_id, 0, 5, Winner::Player(0)), at(1)),
        Err(StoreError::PlayerOutOfRange {
            index: 5,
            roster_len: 5
        })
    );
    assert_eq!(
        store.record_match(a, new_match(league_id, 2, 2, Winner::Draw), at(1)),
        Err(StoreError::SamePlayer)
    );
    assert_eq!(
        store.record_match(a, new_match(league_id, 0, 1, Winner::Player(3)), at(1)),
        Err(StoreError::InvalidWinner)
    );
    assert_eq!(
        store.record_match(a, new_match(league_id, 0, 1, Winner::Forfeit(4)), at(1)),
        Err(StoreError::InvalidWinner)
    );
    assert_eq!(
        store.record_match(
            a,
            new_match(league_id, 0, 1, Winner::Unrecognized("x".into())),
            at(1)
        ),
        Err(StoreError::InvalidWinner)
    );
    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        store.record_match(a, new_match(missing, 0, 1, Winner::Draw), at(1)),
        Err(StoreError::LeagueNotFound(missing))
    );
    assert!(store.history(None).is_empty());

    let (change, id) = store
        .record_match(a, new_match(league_id, 0, 1, Winner::Forfeit(1)), at(1))
        .unwrap();
    assert_eq!(change.updated, vec![league_id]);
    let m = store.get_match(id).unwrap();
    assert_eq!((m.player1, m.player2, m.date), (0, 1, at(1)));
    assert_eq!(m.winner, Winner::Forfeit(1));
}

#[test]
fn history_is_newest_first_and_filterable() {
    let mut store = RosterStore::default();
    let a = Access::Admin;
    let l0 = store.leagues()[0].id;
    let l1 = store.leagues()[1].id;
    store.record_match(a, new_match(l0, 0, 1, Winner::Player(0)), at(2)).unwrap();
    store.record_match(a, new_match(l1, 2, 3, Winner::Draw), at(5)).unwrap();
    store.record_match(a, new_match(l0, 1, 2, Winner::Player(2)), at(9)).unwrap();

    let dates: Vec<_> = store.history(None).iter().map(|m| m.date).collect();
    assert_eq!(dates, vec![at(9), at(5), at(2)]);

    let only_l0: Vec<_> = store.history(Some(l0)).iter().map(|m| m.date).collect();
    assert_eq!(only_l0, vec![at(9), at(2)]);
    assert_eq!(store.matches_for(l1).len(), 1);
}

#[test]
fn match_date_can_be_corrected() {
    let mut store = RosterStore::default();
    let league_id = first_league(&store);
    let (_, id) = store
        .record_match(Access::Admin, new_match(league_id, 0, 1, Winner::Player(1)), at(10))
        .unwrap();

    let change = store.update_match_date(Access::Admin, id, at(4)).unwrap();
    assert_eq!(change.updated, vec![league_id]);
    let m = store.get_match(id).unwrap();
    assert_eq!(m.date, at(4));
    assert_eq!(m.winner, Winner::Player(1));

    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        store.update_match_date(Access::Admin, missing, at(4)),
        Err(StoreError::MatchNotFound(missing))
    );
}

#[test]
fn delete_match_removes_it() {
    let mut store = RosterStore::default();
    let league_id = first_league(&store);
    let (_, id) = store
        .record_match(Access::Admin, new_match(league_id, 0, 1, Winner::Draw), at(1))
        .unwrap();

    store.delete_match(Access::Admin, id).unwrap();
    assert!(store.matches_for(league_id).is_empty());
    assert_eq!(store.delete_match(Access::Admin, id), Err(StoreError::MatchNotFound(id)));
}

#[test]
fn create_and_delete_league_cascades_to_matches() {
    let mut store = RosterStore::default();
    let a = Access::Admin;
    assert_eq!(
        store.create_league(a, "   ", vec!["X".into()]),
        Err(StoreError::EmptyLeagueName)
    );
    assert_eq!(
        store.create_league(a, "Empty", vec![" ".into()]),
        Err(StoreError::EmptyRoster)
    );

    let (_, id) = store
        .create_league(a, " Juniors ", vec!["Ann".into(), " Ben ".into()])
        .unwrap();
    let league = store.league(id).unwrap();
    assert_eq!(league.name, "Juniors");
    assert_eq!(league.players, vec!["Ann", "Ben"]);

    store.record_match(a, new_match(id, 0, 1, Winner::Player(0)), at(1)).unwrap();
    let other = first_league(&store);
    store.record_match(a, new_match(other, 0, 1, Winner::Draw), at(1)).unwrap();

    let change = store.delete_league(a, id).unwrap();
    assert_eq!(change.removed, vec![id]);
    assert_eq!(store.league(id), Err(StoreError::LeagueNotFound(id)));
    assert_eq!(store.history(None).len(), 1);
    assert_eq!(store.history(None)[0].league_id, other);
}

#[test]
fn update_league_keeps_values_for_blank_entries() {
    let mut store = RosterStore::default();
    let id = first_league(&store);

    store
        .update_league(
            Access::Admin,
            id,
            Some("  "),
            Some(vec!["Alice".into(), "".into(), "Carol".into()]),
        )
        .unwrap();
    let league = store.league(id).unwrap();
    assert_eq!(league.name, "Lord of the Rings");
    assert_eq!(league.players, vec!["Alice", "Player 2", "Carol"]);

    store
        .update_league(Access::Admin, id, Some("Masters"), None)
        .unwrap();
    let league = store.league(id).unwrap();
    assert_eq!(league.name, "Masters");
    assert_eq!(league.players.len(), 3);

    assert_eq!(
        store.update_league(Access::Admin, id, None, Some(Vec::new())),
        Err(StoreError::EmptyRoster)
    );
}

#[test]
fn new_roster_slots_need_a_name() {
    let mut store = RosterStore::default();
    let id = store.leagues()[1].id;
    let mut players = store.league(id).unwrap().players.clone();
    players.push(" ".into());

    assert_eq!(
        store.update_league(Access::Admin, id, Some("Renamed"), Some(players.clone())),
        Err(StoreError::BlankPlayerName { index: 5 })
    );
    let league = store.league(id).unwrap();
    assert_eq!(league.name, "League B");
    assert_eq!(league.players.len(), 5);

    *players.last_mut().unwrap() = "Zed".into();
    store
        .update_league(Access::Admin, id, None, Some(players))
        .unwrap();
    assert_eq!(store.league(id).unwrap().players[5], "Zed");
}

#[test]
fn players_per_group_resizes_every_league() {
    let mut store = RosterStore::default();
    let a = Access::Admin;

    let change = store.set_players_per_group(a, 3).unwrap();
    assert!(change.all);
    assert!(store.leagues().iter().all(|l| l.players.len() == 3));
    assert_eq!(store.leagues()[1].players, vec!["Player 6", "Player 7", "Player 8"]);
    assert_eq!(store.settings().players_per_group, 3);

    store.set_players_per_group(a, 4).unwrap();
    assert_eq!(
        store.leagues()[0].players,
        vec!["Player 1", "Player 2", "Player 3", "Player 4"]
    );
    assert!(store.leagues().iter().all(|l| l.players.len() == 4));
}

#[test]
fn invalid_players_per_group_changes_nothing() {
    let mut store = RosterStore::default();
    let before = store.snapshot();

    assert_eq!(
        store.set_players_per_group(Access::Admin, 1),
        Err(StoreError::InvalidPlayersPerGroup(1))
    );
    assert_eq!(
        store.set_players_per_group(Access::Admin, 11),
        Err(StoreError::InvalidPlayersPerGroup(11))
    );
    assert_eq!(store.snapshot(), before);
}

#[test]
fn reset_clears_matches_and_reseeds() {
    let mut store = RosterStore::default();
    let a = Access::Admin;
    let old = first_league(&store);
    store.update_league(a, old, Some("Renamed"), None).unwrap();
    store.record_match(a, new_match(old, 0, 1, Winner::Draw), at(1)).unwrap();
    store.set_players_per_group(a, 6).unwrap();

    let change = store.reset_to_defaults(a).unwrap();
    assert!(change.all);
    assert!(change.removed.contains(&old));
    assert!(store.history(None).is_empty());
    assert_eq!(store.leagues()[0].name, "Lord of the Rings");
    assert!(store.leagues().iter().all(|l| l.players.len() == 6));
    assert_eq!(store.leagues()[1].players[0], "Player 7");
}

#[test]
fn scoring_switch_is_stored() {
    let mut store = RosterStore::default();
    store.set_scoring(Access::Admin, ScoringRules::LEGACY).unwrap();
    assert_eq!(store.settings().scoring, ScoringRules::LEGACY);
}

#[test]
fn describe_match_reads_like_the_history_log() {
    let mut store = RosterStore::default();
    let a = Access::Admin;
    let id = first_league(&store);
    store
        .update_league(a, id, None, Some(vec!["Alice".into(), "Bob".into()]))
        .unwrap();
    store.record_match(a, new_match(id, 0, 1, Winner::Player(1)), at(1)).unwrap();
    store.record_match(a, new_match(id, 0, 1, Winner::Draw), at(2)).unwrap();
    store.record_match(a, new_match(id, 1, 0, Winner::Forfeit(0)), at(3)).unwrap();

    let league = store.league(id).unwrap();
    let lines: Vec<String> = store
        .history(Some(id))
        .iter()
        .map(|m| describe_match(league, m))
        .collect();
    assert_eq!(
        lines,
        vec![
            "Alice forfeited against Bob",
            "Alice drew with Bob",
            "Bob defeated Alice",
        ]
    );
}
