//! Event, EventStatus and the domain error type.

use crate::models::participant::{Participant, PlayerId};
use crate::models::stage::Stage;
use crate::models::standing::Standing;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during event operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventError {
    /// An event needs at least one stage.
    NoStages,
    /// More stages than an event may have.
    TooManyStages { max: usize },
    /// Stage results were submitted without any placement.
    EmptySubmission,
    /// Two placements share the same final rank.
    DuplicateRank(u32),
    /// Ranks are 1-based; 0 is not a placement.
    InvalidRank(u32),
    /// The same player was placed twice in one submission.
    DuplicatePlacement(PlayerId),
    /// Win/loss counts for this player do not fit a game total.
    InvalidPlacement(PlayerId),
    /// Stage count to fold is zero or larger than the number of stages.
    InvalidStageCount { requested: usize, available: usize },
    /// Event is not in a state that allows this action.
    InvalidState,
    /// Not enough participants to start (need at least 2).
    NotEnoughParticipants { required: usize },
    /// The participant cap has been reached.
    EventFull { max: usize },
    /// Participant not found in the roster.
    ParticipantNotFound(PlayerId),
    /// A participant with this name already exists (names are unique, case-insensitive).
    DuplicateParticipantName,
    /// This player is already registered.
    AlreadyRegistered(PlayerId),
    /// The participant dropped and can no longer be placed.
    ParticipantDropped(PlayerId),
    /// A CSV upload could not be read.
    InvalidCsv(String),
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventError::NoStages => write!(f, "An event needs at least one stage"),
            EventError::TooManyStages { max } => {
                write!(f, "An event can have at most {} stages", max)
            }
            EventError::EmptySubmission => write!(f, "No placements submitted"),
            EventError::DuplicateRank(rank) => write!(f, "Duplicate rank {} in submission", rank),
            EventError::InvalidRank(rank) => write!(f, "Invalid rank {}; ranks start at 1", rank),
            EventError::DuplicatePlacement(_) => {
                write!(f, "Player is placed more than once in submission")
            }
            EventError::InvalidPlacement(_) => write!(f, "Win/loss counts out of range"),
            EventError::InvalidStageCount {
                requested,
                available,
            } => write!(
                f,
                "Cannot fold {} stage(s); event has {}",
                requested, available
            ),
            EventError::InvalidState => write!(f, "Invalid state for this action"),
            EventError::NotEnoughParticipants { required } => {
                write!(f, "Need at least {} participants to start", required)
            }
            EventError::EventFull { max } => write!(f, "Event is full ({} participants)", max),
            EventError::ParticipantNotFound(_) => write!(f, "Participant not found"),
            EventError::DuplicateParticipantName => {
                write!(f, "A participant with this name already exists")
            }
            EventError::AlreadyRegistered(_) => write!(f, "Player is already registered"),
            EventError::ParticipantDropped(_) => write!(f, "Participant has dropped from the event"),
            EventError::InvalidCsv(msg) => write!(f, "Invalid CSV: {}", msg),
        }
    }
}

impl std::error::Error for EventError {}

/// Unique identifier for an event.
pub type EventId = Uuid;

/// Overall progress of the event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Taking registrations; no stage played.
    #[default]
    Upcoming,
    /// Stages are being played and submitted.
    Ongoing,
    /// Last stage submitted.
    Completed,
}

/// Upper bound on stages per event.
pub const MAX_STAGES: usize = 64;

/// Name and date for one stage when configuring an event.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
}

impl StageConfig {
    /// `count` unnamed, undated stages. Fails above [`MAX_STAGES`].
    pub fn defaults(count: usize) -> Result<Vec<StageConfig>, EventError> {
        if count > MAX_STAGES {
            return Err(EventError::TooManyStages { max: MAX_STAGES });
        }
        Ok(vec![StageConfig::default(); count])
    }
}

/// Minimum roster size to start an event.
const MIN_PARTICIPANTS: usize = 2;

/// Full event state: roster, stages and cumulative standings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub status: EventStatus,
    /// Everyone who registered, in registration order (dropped players included).
    pub participants: Vec<Participant>,
    pub stages: Vec<Stage>,
    /// 0-based index of the next stage to close; equals `stages.len()` once completed.
    pub current_stage: usize,
    /// Standings folded over every completed stage.
    pub cumulative_standings: Vec<Standing>,
    #[serde(default)]
    pub max_participants: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Create an upcoming event with one empty stage per config.
    pub fn new(
        name: impl Into<String>,
        stages: Vec<StageConfig>,
        max_participants: Option<usize>,
    ) -> Result<Self, EventError> {
        if stages.is_empty() {
            return Err(EventError::NoStages);
        }
        if stages.len() > MAX_STAGES {
            return Err(EventError::TooManyStages { max: MAX_STAGES });
        }
        let stages = stages
            .into_iter()
            .zip(1u32..)
            .map(|(cfg, number)| {
                let name = cfg
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| format!("Stage {}", number));
                Stage::new(number, name, cfg.scheduled_date)
            })
            .collect();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: EventStatus::Upcoming,
            participants: Vec::new(),
            stages,
            current_stage: 0,
            cumulative_standings: Vec::new(),
            max_participants,
            created_at: Utc::now(),
        })
    }

    /// Event with `count` default-named stages and no participant cap.
    pub fn with_stage_count(name: impl Into<String>, count: usize) -> Result<Self, EventError> {
        Self::new(name, StageConfig::defaults(count)?, None)
    }

    pub fn participant(&self, player_id: PlayerId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.player_id == player_id)
    }

    /// Participants that have not dropped.
    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| !p.dropped)
    }

    /// The stage waiting for results, if any.
    pub fn current_stage(&self) -> Option<&Stage> {
        self.stages.get(self.current_stage)
    }

    /// True when the open stage is the last one.
    pub fn is_final_stage(&self) -> bool {
        self.current_stage + 1 == self.stages.len()
    }

    /// Register a player (not allowed once completed). Names must be unique (case-insensitive).
    pub fn register_participant(&mut self, participant: Participant) -> Result<(), EventError> {
        if self.status == EventStatus::Completed {
            return Err(EventError::InvalidState);
        }
        let name = participant.player_name.trim();
        if name.is_empty() {
            return Err(EventError::InvalidState);
        }
        if self.participant(participant.player_id).is_some() {
            return Err(EventError::AlreadyRegistered(participant.player_id));
        }
        let folded = name.to_lowercase();
        if self
            .participants
            .iter()
            .any(|p| p.player_name.to_lowercase() == folded)
        {
            return Err(EventError::DuplicateParticipantName);
        }
        if let Some(max) = self.max_participants {
            if self.participants.len() >= max {
                return Err(EventError::EventFull { max });
            }
        }
        let participant = Participant {
            player_name: name.to_string(),
            ..participant
        };
        self.participants.push(participant);
        Ok(())
    }

    /// Drop a participant. They stay on the roster for cumulative accounting.
    pub fn drop_participant(&mut self, player_id: PlayerId) -> Result<(), EventError> {
        if self.status == EventStatus::Completed {
            return Err(EventError::InvalidState);
        }
        self.participants
            .iter_mut()
            .find(|p| p.player_id == player_id)
            .ok_or(EventError::ParticipantNotFound(player_id))?
            .drop_out();
        Ok(())
    }

    /// Start the event (Upcoming -> Ongoing).
    pub fn start(&mut self) -> Result<(), EventError> {
        if self.status != EventStatus::Upcoming {
            return Err(EventError::InvalidState);
        }
        if self.active_participants().count() < MIN_PARTICIPANTS {
            return Err(EventError::NotEnoughParticipants {
                required: MIN_PARTICIPANTS,
            });
        }
        self.status = EventStatus::Ongoing;
        Ok(())
    }
}
