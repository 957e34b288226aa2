//! Cumulative standings: fold every closed stage into one tournament-wide ranking.

use crate::models::{EventError, Participant, PlayerId, Stage, Standing};
use std::collections::HashMap;

/// Running totals for one player across the folded stages.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Tally {
    points: u32,
    wins: u32,
    losses: u32,
    stages_played: u32,
}

impl Tally {
    /// New tally with one stage's row added. Totals saturate at `u32::MAX`.
    fn add(self, row: &Standing) -> Self {
        Self {
            points: self.points.saturating_add(row.points),
            wins: self.wins.saturating_add(row.wins),
            losses: self.losses.saturating_add(row.losses),
            stages_played: self.stages_played.saturating_add(1),
        }
    }
}

/// Fold stages `0..stage_count` into cumulative standings.
///
/// `stage_results` stands in for the last folded stage (index `stage_count - 1`),
/// whose standings have not been stored on `stages` yet. Every participant on
/// the roster gets an accumulator entry; rows belonging to players missing from
/// the roster are skipped.
///
/// Rows are sorted by points then wins (both descending), with roster order as
/// the final tie-break, and ranked 1..N. Players with no points and no stage
/// played are left out of the result.
pub fn fold_cumulative(
    stage_results: &[Standing],
    participants: &[Participant],
    stages: &[Stage],
    stage_count: usize,
) -> Result<Vec<Standing>, EventError> {
    if stage_count == 0 || stage_count > stages.len() {
        return Err(EventError::InvalidStageCount {
            requested: stage_count,
            available: stages.len(),
        });
    }

    let mut totals: HashMap<PlayerId, Tally> = participants
        .iter()
        .map(|p| (p.player_id, Tally::default()))
        .collect();

    let last = stage_count - 1;
    for (index, stage) in stages.iter().take(stage_count).enumerate() {
        let rows = if index == last {
            stage_results
        } else {
            stage.standings.as_slice()
        };
        for row in rows {
            match totals.get(&row.player_id).copied() {
                Some(tally) => {
                    totals.insert(row.player_id, tally.add(row));
                }
                None => log::debug!(
                    "Stage {} has a result for {} who is not on the roster; skipped",
                    stage.number,
                    row.player_id
                ),
            }
        }
    }

    let mut rows: Vec<Standing> = participants
        .iter()
        .map(|p| {
            let t = totals.get(&p.player_id).copied().unwrap_or_default();
            Standing {
                player_id: p.player_id,
                player_name: p.player_name.clone(),
                points: t.points,
                wins: t.wins,
                losses: t.losses,
                draws: 0,
                matches_played: t.stages_played,
                opponent_win_percentage: 0.0,
                game_win_percentage: Standing::win_percentage(t.wins, t.losses),
                rank: 0,
            }
        })
        .collect();

    // Stable sort: equal points and wins keep roster order.
    rows.sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
    // Drop empty rows before ranking so ranks stay gap-free.
    rows.retain(|r| !(r.points == 0 && r.matches_played == 0));
    for (row, rank) in rows.iter_mut().zip(1u32..) {
        row.rank = rank;
    }
    Ok(rows)
}
