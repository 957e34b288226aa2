//! One phase of a multi-stage event.

use crate::models::standing::Standing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// 1-based sequence number.
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    pub is_completed: bool,
    /// Per-stage standings, set when the stage's results are submitted.
    pub standings: Vec<Standing>,
}

impl Stage {
    /// Create an empty, not yet played stage.
    pub fn new(number: u32, name: impl Into<String>, scheduled_date: Option<NaiveDate>) -> Self {
        Self {
            number,
            name: name.into(),
            scheduled_date,
            is_completed: false,
            standings: Vec::new(),
        }
    }

    /// Record the submitted standings. A stage is only ever completed once.
    pub(crate) fn complete(&mut self, standings: Vec<Standing>) {
        self.standings = standings;
        self.is_completed = true;
    }
}
