//! Per-player statistics, refreshed on a best-effort basis after standings are saved.
//!
//! A refresh never feeds back into the event: failures are logged per player and
//! counted, and the committed standings stay as they are.

use crate::models::{Event, EventId, EventStatus, PlayerId, Standing};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Errors from a statistics backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StatsError {
    /// The backend could not be reached or is in a bad state.
    Unavailable(String),
    /// The backend refused the update for this player.
    Rejected(PlayerId),
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Unavailable(msg) => write!(f, "Stats store unavailable: {}", msg),
            StatsError::Rejected(id) => write!(f, "Stats update rejected for player {}", id),
        }
    }
}

impl std::error::Error for StatsError {}

/// One player's result in one event (from the cumulative standings).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: EventId,
    pub event_name: String,
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub stages_played: u32,
    pub rank: u32,
    /// Whether the event had completed when this record was taken.
    pub final_result: bool,
}

/// Lifetime statistics for a player across all events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: PlayerId,
    pub player_name: String,
    pub events_played: u32,
    /// Completed events finished at rank 1.
    pub events_won: u32,
    pub stages_played: u32,
    pub total_points: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    pub best_rank: Option<u32>,
    pub events: Vec<EventRecord>,
}

impl PlayerProfile {
    /// Totals recomputed from the per-event records.
    fn from_records(
        player_id: PlayerId,
        player_name: String,
        records: &HashMap<EventId, EventRecord>,
    ) -> Self {
        let mut events: Vec<EventRecord> = records.values().cloned().collect();
        events.sort_by(|a, b| {
            a.event_name
                .cmp(&b.event_name)
                .then(a.event_id.cmp(&b.event_id))
        });
        let total = |f: fn(&EventRecord) -> u32| {
            events.iter().fold(0u32, |acc, r| acc.saturating_add(f(r)))
        };
        let wins = total(|r| r.wins);
        let losses = total(|r| r.losses);
        Self {
            player_id,
            player_name,
            events_played: events.len() as u32,
            events_won: events.iter().filter(|r| r.final_result && r.rank == 1).count() as u32,
            stages_played: total(|r| r.stages_played),
            total_points: total(|r| r.points),
            wins,
            losses,
            win_percentage: Standing::win_percentage(wins, losses),
            best_rank: events.iter().map(|r| r.rank).min(),
            events,
        }
    }
}

/// Storage for player statistics.
pub trait StatsStore: Send + Sync {
    /// Insert or replace a player's record for one event.
    fn record_event_result(
        &self,
        player_id: PlayerId,
        player_name: &str,
        record: EventRecord,
    ) -> Result<(), StatsError>;

    fn profile(&self, player_id: PlayerId) -> Result<Option<PlayerProfile>, StatsError>;
}

#[derive(Default)]
struct PlayerEntry {
    name: String,
    records: HashMap<EventId, EventRecord>,
}

/// Stats kept in memory for the lifetime of the server.
#[derive(Default)]
pub struct InMemoryStatsStore {
    players: RwLock<HashMap<PlayerId, PlayerEntry>>,
}

impl InMemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for InMemoryStatsStore {
    fn record_event_result(
        &self,
        player_id: PlayerId,
        player_name: &str,
        record: EventRecord,
    ) -> Result<(), StatsError> {
        let mut g = self
            .players
            .write()
            .map_err(|_| StatsError::Unavailable("lock error".into()))?;
        let entry = g.entry(player_id).or_default();
        entry.name = player_name.to_string();
        entry.records.insert(record.event_id, record);
        Ok(())
    }

    fn profile(&self, player_id: PlayerId) -> Result<Option<PlayerProfile>, StatsError> {
        let g = self
            .players
            .read()
            .map_err(|_| StatsError::Unavailable("lock error".into()))?;
        Ok(g.get(&player_id)
            .map(|e| PlayerProfile::from_records(player_id, e.name.clone(), &e.records)))
    }
}

/// Outcome counts of one refresh run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Push every cumulative standing of `event` into `store`, one player at a time.
/// A failing player is logged and skipped; the others are still updated.
pub fn refresh_player_stats(store: &dyn StatsStore, event: &Event) -> RefreshSummary {
    let mut summary = RefreshSummary::default();
    let final_result = event.status == EventStatus::Completed;
    for s in &event.cumulative_standings {
        let record = EventRecord {
            event_id: event.id,
            event_name: event.name.clone(),
            points: s.points,
            wins: s.wins,
            losses: s.losses,
            stages_played: s.matches_played,
            rank: s.rank,
            final_result,
        };
        match store.record_event_result(s.player_id, &s.player_name, record) {
            Ok(()) => summary.updated += 1,
            Err(e) => {
                log::warn!(
                    "Stats refresh failed for player {} in event {}: {}",
                    s.player_id,
                    event.id,
                    e
                );
                summary.failed += 1;
            }
        }
    }
    log::debug!(
        "Stats refresh for event {}: {} updated, {} failed",
        event.id,
        summary.updated,
        summary.failed
    );
    summary
}
