//! Data structures for a league event: participants, stages, standings.

mod event;
mod participant;
mod stage;
mod standing;

pub use event::{Event, EventError, EventId, EventStatus, StageConfig, MAX_STAGES};
pub use participant::{Participant, PlayerId};
pub use stage::Stage;
pub use standing::{Placement, Standing};
