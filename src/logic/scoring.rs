//! Stage scoring: organizer placements -> per-stage standings.

use crate::models::{EventError, Placement, Standing};
use std::collections::HashSet;

/// Points for ranks 1 through 10.
const POINTS_TABLE: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

/// Points awarded for a final rank. Ranks outside 1..=10 score nothing.
pub fn points_for_rank(rank: u32) -> u32 {
    match rank {
        1..=10 => POINTS_TABLE[(rank - 1) as usize],
        _ => 0,
    }
}

/// Same as [`points_for_rank`], with a missing rank scoring 0.
pub fn points_for_rank_opt(rank: Option<u32>) -> u32 {
    rank.map(points_for_rank).unwrap_or(0)
}

/// Convert one stage's placements into standings.
///
/// Ranks must be 1-based and pairwise unique, each player may appear once, and
/// `wins + losses` must fit a `u32`; the whole submission is rejected otherwise.
/// Each row keeps the organizer's rank as-is (no re-sorting), and
/// `matches_played` counts individual games (`wins + losses`).
pub fn score_stage(placements: &[Placement]) -> Result<Vec<Standing>, EventError> {
    if placements.is_empty() {
        return Err(EventError::EmptySubmission);
    }
    let mut ranks = HashSet::with_capacity(placements.len());
    let mut players = HashSet::with_capacity(placements.len());
    let mut games = Vec::with_capacity(placements.len());
    for p in placements {
        if p.final_rank == 0 {
            return Err(EventError::InvalidRank(p.final_rank));
        }
        if !ranks.insert(p.final_rank) {
            return Err(EventError::DuplicateRank(p.final_rank));
        }
        if !players.insert(p.player_id) {
            return Err(EventError::DuplicatePlacement(p.player_id));
        }
        games.push(
            p.wins
                .checked_add(p.losses)
                .ok_or(EventError::InvalidPlacement(p.player_id))?,
        );
    }

    Ok(placements
        .iter()
        .zip(games)
        .map(|(p, matches_played)| Standing {
            player_id: p.player_id,
            player_name: p.player_name.clone(),
            points: points_for_rank(p.final_rank),
            wins: p.wins,
            losses: p.losses,
            draws: 0,
            matches_played,
            opponent_win_percentage: 0.0,
            game_win_percentage: Standing::win_percentage(p.wins, p.losses),
            rank: p.final_rank,
        })
        .collect())
}
