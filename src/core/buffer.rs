//! Time-evicting event history
//!
//! The buffer is the single owner of press/release history. Readers take a
//! [`EventBuffer::snapshot`] and never mutate.

use std::sync::Arc;
use tracing::trace;

use super::events::{InputEvent, Timestamp};

/// Append-only store of input events in arrival order
#[derive(Debug, Default, Clone)]
pub struct EventBuffer {
    events: Vec<InputEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an event. Timestamps are not checked for monotonicity.
    pub fn append(&mut self, event: InputEvent) {
        trace!(
            key = %event.key,
            pressed = event.is_pressed,
            at = event.timestamp,
            len = self.events.len() + 1,
            "Event appended"
        );
        self.events.push(event);
    }

    /// Drop every event stamped before `cutoff`; returns how many were removed
    pub fn evict_older_than(&mut self, cutoff: Timestamp) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.timestamp >= cutoff);
        let removed = before - self.events.len();
        if removed > 0 {
            trace!(removed, remaining = self.events.len(), cutoff, "Events evicted");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Frozen copy of the current contents
    pub fn snapshot(&self) -> Arc<[InputEvent]> {
        Arc::from(self.events.as_slice())
    }

    /// Borrow the contents in arrival order
    pub fn as_slice(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// The last `n` events in arrival order
    pub fn latest(&self, n: usize) -> &[InputEvent] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
