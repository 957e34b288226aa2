//! Closing out a stage: validate, score, fold, then advance the event.

use crate::models::{Event, EventError, EventStatus, Placement, Standing};

/// Everything a stage submission changes, computed without touching the event.
#[derive(Clone, Debug, PartialEq)]
pub struct StageOutcome {
    /// Index of the stage being closed.
    pub stage_index: usize,
    pub stage_standings: Vec<Standing>,
    pub cumulative_standings: Vec<Standing>,
    /// True when the closed stage is the last one.
    pub completes_event: bool,
}

impl StageOutcome {
    /// Write the outcome into the event: the stage is completed, both standings
    /// are replaced, `current_stage` moves on by one and the event completes
    /// after its last stage.
    pub fn apply(self, event: &mut Event) {
        event.stages[self.stage_index].complete(self.stage_standings);
        event.cumulative_standings = self.cumulative_standings;
        event.current_stage = self.stage_index + 1;
        if self.completes_event {
            event.status = EventStatus::Completed;
        }
    }
}

/// Compute the result of closing the event's current stage with `placements`.
///
/// The event must be ongoing with a stage still open. Placements for a dropped
/// participant are rejected; names left blank are filled from the roster.
pub fn close_stage(event: &Event, placements: &[Placement]) -> Result<StageOutcome, EventError> {
    if event.status != EventStatus::Ongoing {
        return Err(EventError::InvalidState);
    }
    let stage_index = event.current_stage;
    match event.stages.get(stage_index) {
        Some(stage) if !stage.is_completed => {}
        _ => return Err(EventError::InvalidState),
    }

    let mut placements = placements.to_vec();
    for p in &mut placements {
        if let Some(participant) = event.participant(p.player_id) {
            if participant.dropped {
                return Err(EventError::ParticipantDropped(p.player_id));
            }
            if p.player_name.trim().is_empty() {
                p.player_name = participant.player_name.clone();
            }
        }
    }

    let stage_standings = crate::logic::score_stage(&placements)?;
    let cumulative_standings = crate::logic::fold_cumulative(
        &stage_standings,
        &event.participants,
        &event.stages,
        stage_index + 1,
    )?;

    Ok(StageOutcome {
        stage_index,
        stage_standings,
        cumulative_standings,
        completes_event: event.is_final_stage(),
    })
}

/// Close the current stage and apply the outcome. The event is untouched on error.
pub fn submit_stage_results(
    event: &mut Event,
    placements: &[Placement],
) -> Result<(), EventError> {
    let outcome = close_stage(event, placements)?;
    log::info!(
        "Event {}: stage {} closed with {} placement(s)",
        event.id,
        outcome.stage_index + 1,
        outcome.stage_standings.len()
    );
    outcome.apply(event);
    Ok(())
}
