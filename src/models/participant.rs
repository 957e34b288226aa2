//! Registered participant of an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (account id; used in standings and stats lookups).
pub type PlayerId = Uuid;

/// A player registered for an event. Only the drop flag changes after registration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub player_id: PlayerId,
    pub player_name: String,
    /// Store or federation membership number, if the player gave one.
    #[serde(default)]
    pub membership_id: Option<String>,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub dropped: bool,
}

impl Participant {
    /// Create a participant registered now, with a fresh player id.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), player_name)
    }

    /// Create a participant for an existing player account.
    pub fn with_id(player_id: PlayerId, player_name: impl Into<String>) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
            membership_id: None,
            registered_at: Utc::now(),
            dropped: false,
        }
    }

    pub fn with_membership_id(mut self, membership_id: impl Into<String>) -> Self {
        self.membership_id = Some(membership_id.into());
        self
    }

    /// Mark the participant as dropped from the event.
    pub fn drop_out(&mut self) {
        self.dropped = true;
    }
}
