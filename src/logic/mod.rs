//! League business logic: stage scoring, cumulative standings, stage submission, CSV.

mod cumulative;
mod import;
mod scoring;
mod submission;

pub use cumulative::fold_cumulative;
pub use import::{parse_placements_csv, write_standings_csv};
pub use scoring::{points_for_rank, points_for_rank_opt, score_stage};
pub use submission::{close_stage, submit_stage_results, StageOutcome};
