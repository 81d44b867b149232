//! Standings: aggregate a league's matches into per-player rows and rank them.

use crate::models::{League, Match, PlayerStat, ScoringRules, Winner};
use std::cmp::Ordering;

/// Compute the ranked standings of `league` with the standard point table.
///
/// `matches` should already be filtered to this league; `league_id` is not rechecked.
pub fn compute_standings<'a, I>(league: &League, matches: I) -> Vec<PlayerStat>
where
    I: IntoIterator<Item = &'a Match>,
{
    compute_standings_with(league, matches, &ScoringRules::STANDARD)
}

/// Compute the ranked standings of `league` using `rules` for points.
///
/// 1. One zeroed row per roster slot.
/// 2. Apply each match whose players both still exist in the roster; others are skipped.
/// 3. Sort by points, wins, win rate (all descending). Remaining ties keep roster order.
pub fn compute_standings_with<'a, I>(
    league: &League,
    matches: I,
    rules: &ScoringRules,
) -> Vec<PlayerStat>
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut stats: Vec<PlayerStat> = league
        .players
        .iter()
        .enumerate()
        .map(|(i, name)| PlayerStat::new(i, name.as_str()))
        .collect();

    for m in matches {
        apply_match_result(&mut stats, m, rules);
    }

    rank(&mut stats);
    stats
}

/// Apply one match to the rows. Stale indices and self-matches leave the rows untouched.
fn apply_match_result(stats: &mut [PlayerStat], m: &Match, rules: &ScoringRules) {
    let (p1, p2) = (m.player1, m.player2);
    if p1 == p2 || p1 >= stats.len() || p2 >= stats.len() {
        return;
    }

    stats[p1].record_played();
    stats[p2].record_played();

    match m.winner {
        Winner::Draw => {
            stats[p1].add_draw(rules.draw);
            stats[p2].add_draw(rules.draw);
        }
        Winner::Forfeit(x) if m.involves(x) => {
            stats[x].add_forfeit(rules.forfeit);
        }
        Winner::Player(w) if m.involves(w) => {
            let loser = if w == p1 { p2 } else { p1 };
            stats[w].add_win(rules.win);
            stats[loser].add_loss(rules.loss);
        }
        // Not a participant, or not a known outcome: counts as played only.
        Winner::Forfeit(_) | Winner::Player(_) | Winner::Unrecognized(_) => {}
    }
}

/// Order rows best first. `sort_by` is stable, so full ties stay in roster order.
fn rank(stats: &mut [PlayerStat]) {
    stats.sort_by(compare_rows);
}

fn compare_rows(a: &PlayerStat, b: &PlayerStat) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| compare_win_rate(a, b))
}

fn compare_win_rate(a: &PlayerStat, b: &PlayerStat) -> Ordering {
    b.win_rate()
        .partial_cmp(&a.win_rate())
        .unwrap_or(Ordering::Equal)
}
