//! League organizer: library with models, standings logic, persistence and the REST API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod stats;
pub mod store;

pub use config::{ConfigError, ServerConfig};
pub use logic::{
    close_stage, fold_cumulative, parse_placements_csv, points_for_rank, points_for_rank_opt,
    score_stage, submit_stage_results, write_standings_csv, StageOutcome,
};
pub use models::{
    Event, EventError, EventId, EventStatus, Participant, Placement, PlayerId, Stage, StageConfig,
    Standing, MAX_STAGES,
};
pub use stats::{
    refresh_player_stats, EventRecord, InMemoryStatsStore, PlayerProfile, RefreshSummary,
    StatsError, StatsStore,
};
pub use store::{EventStore, StoreError};
