//! In-memory event store with an optional JSON snapshot on disk.
//!
//! Every write goes through [`EventStore::update`] (or `insert`/`remove`): the
//! change is made on a copy, the snapshot is written, and only then is the copy
//! swapped in. A failed write leaves the in-memory state as it was.

use crate::models::{Event, EventError, EventId};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Errors from the event store.
#[derive(Debug)]
pub enum StoreError {
    /// No event with this id.
    NotFound(EventId),
    /// The change itself was rejected.
    Event(EventError),
    /// The snapshot could not be read or written.
    Persistence(String),
    /// The lock was poisoned by a panicking writer.
    Lock,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(_) => write!(f, "No event"),
            StoreError::Event(e) => write!(f, "{}", e),
            StoreError::Persistence(msg) => write!(f, "Could not save events: {}", msg),
            StoreError::Lock => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Event(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EventError> for StoreError {
    fn from(e: EventError) -> Self {
        StoreError::Event(e)
    }
}

pub struct EventStore {
    events: RwLock<HashMap<EventId, Event>>,
    snapshot_path: Option<PathBuf>,
}

impl EventStore {
    /// Store without a snapshot file; everything is lost on restart.
    pub fn in_memory() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            snapshot_path: None,
        }
    }

    /// Store backed by a JSON snapshot at `path`, loading it if it exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let events = if path.exists() {
            let data = fs::read_to_string(&path)
                .map_err(|e| StoreError::Persistence(format!("{}: {}", path.display(), e)))?;
            let list: Vec<Event> = serde_json::from_str(&data)
                .map_err(|e| StoreError::Persistence(format!("{}: {}", path.display(), e)))?;
            log::info!("Loaded {} event(s) from {}", list.len(), path.display());
            list.into_iter().map(|e| (e.id, e)).collect()
        } else {
            HashMap::new()
        };
        Ok(Self {
            events: RwLock::new(events),
            snapshot_path: Some(path),
        })
    }

    pub fn get(&self, id: EventId) -> Result<Event, StoreError> {
        let g = self.events.read().map_err(|_| StoreError::Lock)?;
        g.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// All events, newest first.
    pub fn list(&self) -> Result<Vec<Event>, StoreError> {
        let g = self.events.read().map_err(|_| StoreError::Lock)?;
        let mut events: Vec<Event> = g.values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    pub fn insert(&self, event: Event) -> Result<Event, StoreError> {
        let mut g = self.events.write().map_err(|_| StoreError::Lock)?;
        let mut next = g.clone();
        next.insert(event.id, event.clone());
        self.persist(&next)?;
        *g = next;
        Ok(event)
    }

    pub fn remove(&self, id: EventId) -> Result<(), StoreError> {
        let mut g = self.events.write().map_err(|_| StoreError::Lock)?;
        if !g.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        let mut next = g.clone();
        next.remove(&id);
        self.persist(&next)?;
        *g = next;
        Ok(())
    }

    /// Apply `f` to a copy of the event and commit it. Returns the committed event.
    pub fn update<F>(&self, id: EventId, f: F) -> Result<Event, StoreError>
    where
        F: FnOnce(&mut Event) -> Result<(), EventError>,
    {
        let mut g = self.events.write().map_err(|_| StoreError::Lock)?;
        let mut event = g.get(&id).cloned().ok_or(StoreError::NotFound(id))?;
        f(&mut event)?;
        if let Some(path) = &self.snapshot_path {
            let others = g.values().filter(|e| e.id != id);
            let all: Vec<&Event> = others.chain(std::iter::once(&event)).collect();
            write_snapshot(path, &all)?;
        }
        g.insert(id, event.clone());
        Ok(event)
    }

    fn persist(&self, events: &HashMap<EventId, Event>) -> Result<(), StoreError> {
        match &self.snapshot_path {
            Some(path) => write_snapshot(path, &events.values().collect::<Vec<_>>()),
            None => Ok(()),
        }
    }
}

/// Write all events to `path` through a temp file, so a crash never leaves half a file.
fn write_snapshot(path: &Path, events: &[&Event]) -> Result<(), StoreError> {
    let data = serde_json::to_vec_pretty(events)
        .map_err(|e| StoreError::Persistence(e.to_string()))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| StoreError::Persistence(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, Participant};

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("league-store-{}-{}.json", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn rejected_update_leaves_event_untouched() {
        let store = EventStore::in_memory();
        let event = store
            .insert(Event::with_stage_count("League", 2).unwrap())
            .unwrap();
        let res = store.update(event.id, |e| {
            e.register_participant(Participant::new("A"))?;
            e.start()
        });
        assert!(matches!(
            res,
            Err(StoreError::Event(EventError::NotEnoughParticipants { .. }))
        ));
        let stored = store.get(event.id).unwrap();
        assert!(stored.participants.is_empty());
        assert_eq!(stored.status, EventStatus::Upcoming);
    }

    #[test]
    fn snapshot_round_trips_through_open() {
        let path = temp_path("reload");
        let id = {
            let store = EventStore::open(&path).unwrap();
            let event = store
                .insert(Event::with_stage_count("League", 1).unwrap())
                .unwrap();
            store
                .update(event.id, |e| e.register_participant(Participant::new("A")))
                .unwrap();
            event.id
        };
        let store = EventStore::open(&path).unwrap();
        let event = store.get(id).unwrap();
        assert_eq!(event.participants.len(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        // A directory that does not exist makes every snapshot write fail.
        let path = std::env::temp_dir()
            .join(format!("league-missing-{}", uuid::Uuid::new_v4()))
            .join("events.json");
        let store = EventStore::open(&path).unwrap();
        let res = store.insert(Event::with_stage_count("League", 1).unwrap());
        assert!(matches!(res, Err(StoreError::Persistence(_))));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn out_of_range_results_leave_store_usable() {
        use crate::logic::submit_stage_results;
        use crate::models::Placement;

        let store = EventStore::in_memory();
        let a = Participant::new("A");
        let b = Participant::new("B");
        let (a_id, b_id) = (a.player_id, b.player_id);
        let event = store
            .insert(Event::with_stage_count("League", 1).unwrap())
            .unwrap();
        store
            .update(event.id, |e| {
                e.register_participant(a)?;
                e.register_participant(b)?;
                e.start()
            })
            .unwrap();

        let res = store.update(event.id, |e| {
            submit_stage_results(
                e,
                &[
                    Placement::new(a_id, 1, u32::MAX, 1),
                    Placement::new(b_id, 2, 0, 1),
                ],
            )
        });
        assert!(matches!(
            res,
            Err(StoreError::Event(EventError::InvalidPlacement(id))) if id == a_id
        ));

        let stored = store.get(event.id).unwrap();
        assert_eq!(stored.current_stage, 0);
        assert!(stored.cumulative_standings.is_empty());
        assert!(store.list().is_ok());
    }

    #[test]
    fn unknown_event_is_not_found() {
        let store = EventStore::in_memory();
        let id = uuid::Uuid::new_v4();
        assert!(matches!(store.get(id), Err(StoreError::NotFound(x)) if x == id));
        assert!(matches!(store.remove(id), Err(StoreError::NotFound(_))));
    }
}
