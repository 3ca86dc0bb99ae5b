//! Application state as an explicit value updated by actions

use std::collections::BTreeSet;
use tracing::debug;

use super::buffer::EventBuffer;
use super::events::{InputEvent, Timestamp, RETENTION_MS};
use super::reconstruct::active_keys;

/// Highlight state of one key or button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyStatus {
    /// Never pressed this session
    Never,
    /// Pressed before, currently up
    Was,
    /// Currently down
    Is,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Press { key: String, at: Timestamp },
    Release { key: String, at: Timestamp },
    Reset,
    TogglePause,
    /// Periodic sweep dropping events older than the retention window
    Evict { now: Timestamp },
}

/// Session policy knobs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionPolicy {
    pub retention_ms: f64,
    /// Keep sweeping while paused (bounded memory) or hold history until resume
    pub evict_while_paused: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            retention_ms: RETENTION_MS,
            evict_while_paused: true,
        }
    }
}

/// Everything that changes in response to input
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub buffer: EventBuffer,
    pressed: BTreeSet<String>,
    ever_pressed: BTreeSet<String>,
    paused: bool,
    policy: SessionPolicy,
}

impl Session {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Apply one action, consuming the old state
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::Press { key, at } => {
                if self.ever_pressed.insert(key.clone()) {
                    debug!(key = %key, "New key registered");
                }
                self.pressed.insert(key.clone());
                self.buffer.append(InputEvent::press(key, at));
            }
            Action::Release { key, at } => {
                self.pressed.remove(&key);
                self.buffer.append(InputEvent::release(key, at));
            }
            Action::Reset => {
                debug!(events = self.buffer.len(), "Session reset");
                self.buffer.clear();
                self.pressed.clear();
                self.ever_pressed.clear();
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "Pause toggled");
            }
            Action::Evict { now } => {
                if !self.paused || self.policy.evict_while_paused {
                    self.buffer.evict_older_than(now - self.policy.retention_ms);
                }
            }
        }
        self
    }

    /// In-place form of [`Session::reduce`]
    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(self);
        *self = state.reduce(action);
    }

    pub fn status(&self, key: &str) -> KeyStatus {
        if self.pressed.contains(key) {
            KeyStatus::Is
        } else if self.ever_pressed.contains(key) {
            KeyStatus::Was
        } else {
            KeyStatus::Never
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn pressed(&self) -> impl Iterator<Item = &str> {
        self.pressed.iter().map(String::as_str)
    }

    /// Every key pressed this session, sorted
    pub fn ever_pressed(&self) -> impl Iterator<Item = &str> {
        self.ever_pressed.iter().map(String::as_str)
    }

    /// Keys with events in the trailing window at `now`
    pub fn active_keys(&self, now: Timestamp) -> Vec<String> {
        active_keys(self.buffer.as_slice(), now, self.policy.retention_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str, at: f64) -> Action {
        Action::Press { key: key.into(), at }
    }

    fn release(key: &str, at: f64) -> Action {
        Action::Release { key: key.into(), at }
    }

    #[test]
    fn tri_state_status_follows_presses() {
        let mut session = Session::default();
        assert_eq!(session.status("KeyA"), KeyStatus::Never);

        session.dispatch(press("KeyA", 0.0));
        assert_eq!(session.status("KeyA"), KeyStatus::Is);

        session.dispatch(release("KeyA", 10.0));
        assert_eq!(session.status("KeyA"), KeyStatus::Was);
        assert_eq!(session.buffer.len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = Session::default();
        session.dispatch(press("KeyA", 0.0));
        session.dispatch(press("Mouse0", 1.0));
        session.dispatch(Action::Reset);

        assert!(session.buffer.snapshot().is_empty());
        assert!(session.active_keys(1.0).is_empty());
        assert_eq!(session.status("KeyA"), KeyStatus::Never);
        assert_eq!(session.pressed().count(), 0);

        session.dispatch(Action::Reset);
        assert!(session.buffer.is_empty(), "reset is idempotent");
    }

    #[test]
    fn events_are_recorded_while_paused() {
        let mut session = Session::default();
        session.dispatch(Action::TogglePause);
        session.dispatch(press("KeyA", 0.0));
        assert!(session.is_paused());
        assert_eq!(session.buffer.len(), 1);
    }

    #[test]
    fn eviction_while_paused_follows_policy() {
        let mut sweeping = Session::default();
        sweeping.dispatch(press("Mouse0", 0.0));
        sweeping.dispatch(Action::TogglePause);
        sweeping.dispatch(Action::Evict { now: 11_000.0 });
        assert!(sweeping.buffer.is_empty());

        let mut holding = Session::new(SessionPolicy {
            evict_while_paused: false,
            ..SessionPolicy::default()
        });
        holding.dispatch(press("Mouse0", 0.0));
        holding.dispatch(Action::TogglePause);
        holding.dispatch(Action::Evict { now: 11_000.0 });
        assert_eq!(holding.buffer.len(), 1);

        holding.dispatch(Action::TogglePause);
        holding.dispatch(Action::Evict { now: 11_000.0 });
        assert!(holding.buffer.is_empty());
    }

    #[test]
    fn eviction_does_not_clear_ever_pressed() {
        let mut session = Session::default();
        session.dispatch(press("KeyQ", 0.0));
        session.dispatch(release("KeyQ", 5.0));
        session.dispatch(Action::Evict { now: 20_000.0 });
        assert!(session.buffer.is_empty());
        assert_eq!(session.status("KeyQ"), KeyStatus::Was);
    }
}
