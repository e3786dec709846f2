//! Event log: the single, append-only, totally ordered event sequence.
//!
//! [`EventLog`] is a cheap, cloneable handle; every clone appends to and
//! reads from the same sequence. Entries are never removed, so an index
//! handed out once stays valid for the life of the log. Appends from
//! different threads are ordered by whichever takes the lock first.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::schema::Event;
use crate::error::{BridgeError, Result};

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// Shared append-only event sequence.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    /// Create a new, empty log.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Event>> {
        // Poisoning is ignored: push is the only writer and never leaves the Vec half-written.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an event, returning the index it was assigned.
    pub fn push(&self, event: Event) -> usize {
        let mut events = self.entries();
        events.push(event);
        events.len() - 1
    }

    /// Number of events appended so far.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Copy of the event at `index`.
    pub fn get(&self, index: usize) -> Result<Event> {
        let events = self.entries();
        events
            .get(index)
            .cloned()
            .ok_or(BridgeError::IndexOutOfRange {
                index,
                count: events.len(),
            })
    }

    /// Copy of every event from `start` onward (empty if `start` is past the end).
    pub fn since(&self, start: usize) -> Vec<Event> {
        let events = self.entries();
        events.get(start..).map(<[Event]>::to_vec).unwrap_or_default()
    }

    /// Copy of the whole log.
    pub fn snapshot(&self) -> Vec<Event> {
        self.since(0)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
