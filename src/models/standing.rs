//! Standing rows and the placements they are computed from.

use crate::models::participant::PlayerId;
use serde::{Deserialize, Serialize};

/// Organizer-entered result for one player in the stage being closed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub player_id: PlayerId,
    /// Filled from the roster when left empty.
    #[serde(default)]
    pub player_name: String,
    pub final_rank: u32,
    pub wins: u32,
    pub losses: u32,
}

impl Placement {
    pub fn new(player_id: PlayerId, final_rank: u32, wins: u32, losses: u32) -> Self {
        Self {
            player_id,
            player_name: String::new(),
            final_rank,
            wins,
            losses,
        }
    }

    pub fn named(mut self, player_name: impl Into<String>) -> Self {
        self.player_name = player_name.into();
        self
    }
}

/// A ranked result row, either for a single stage or cumulative over stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub player_name: String,
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    /// Not tracked by placements; always zero for now.
    pub draws: u32,
    /// Per stage: wins + losses. Cumulative: number of stages played.
    pub matches_played: u32,
    /// No opponent data is available, so this stays at zero.
    pub opponent_win_percentage: f64,
    pub game_win_percentage: f64,
    /// 1-based.
    pub rank: u32,
}

impl Standing {
    /// `wins / (wins + losses)`, or 0 when no games were recorded.
    pub fn win_percentage(wins: u32, losses: u32) -> f64 {
        let games = u64::from(wins) + u64::from(losses);
        if games == 0 {
            0.0
        } else {
            f64::from(wins) / games as f64
        }
    }
}
