//! Input event records and the constants shared across the engine

use serde::{Deserialize, Serialize};

/// Milliseconds on the session's monotonic clock
pub type Timestamp = f64;

/// How long events are kept and how far back the timeline looks
pub const RETENTION_MS: f64 = 10_000.0;
/// Period of the eviction sweep
pub const EVICTION_PERIOD_MS: f64 = 1_000.0;
/// Render cadence while running (20 redraws/second)
pub const TICK_MS: f64 = 50.0;
/// Vertical grid divisions across the trailing window
pub const GRID_DIVISIONS: usize = 10;
/// Default logical canvas size
pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 400;
/// Simulated hold for keys that only report a release
pub const SIMULATED_HOLD_MS: f64 = 100.0;
/// Rows shown by the event log
pub const EVENT_LOG_LIMIT: usize = 100;

/// A single press or release transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub timestamp: Timestamp,
    /// Physical input identifier: a keyboard code (`KeyA`) or `Mouse<n>`
    pub key: String,
    pub is_pressed: bool,
}

impl InputEvent {
    pub fn new(key: impl Into<String>, is_pressed: bool, timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            key: key.into(),
            is_pressed,
        }
    }

    pub fn press(key: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(key, true, timestamp)
    }

    pub fn release(key: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(key, false, timestamp)
    }

    /// Age relative to `now` (negative for events stamped in the future)
    pub fn age(&self, now: Timestamp) -> f64 {
        now - self.timestamp
    }
}

/// Mouse buttons in platform numbering (left, middle, right)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

impl MouseButton {
    pub const PRIMARY: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

    pub fn index(self) -> u16 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            MouseButton::Other(n) => n,
        }
    }

    pub fn from_index(index: u16) -> Self {
        match index {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            n => MouseButton::Other(n),
        }
    }

    /// Key identifier used in the event buffer
    pub fn key(self) -> String {
        mouse_key(self.index())
    }

    pub fn label(self) -> &'static str {
        match self {
            MouseButton::Left => "Left",
            MouseButton::Middle => "Middle",
            MouseButton::Right => "Right",
            MouseButton::Other(_) => "Extra",
        }
    }
}

/// `Mouse0`, `Mouse1`, ... for a platform button index
pub fn mouse_key(button: u16) -> String {
    format!("Mouse{}", button)
}

/// Inverse of [`mouse_key`]
pub fn parse_mouse_key(key: &str) -> Option<u16> {
    key.strip_prefix("Mouse")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_keys_follow_button_index() {
        assert_eq!(MouseButton::Left.key(), "Mouse0");
        assert_eq!(MouseButton::Middle.key(), "Mouse1");
        assert_eq!(MouseButton::Right.key(), "Mouse2");
        assert_eq!(MouseButton::from_index(4), MouseButton::Other(4));
    }

    #[test]
    fn parse_mouse_key_rejects_keyboard_codes() {
        assert_eq!(parse_mouse_key("Mouse2"), Some(2));
        assert_eq!(parse_mouse_key("KeyM"), None);
        assert_eq!(parse_mouse_key("MouseX"), None);
    }

    #[test]
    fn event_serializes_with_snake_case_fields() {
        let event = InputEvent::press("KeyA", 12.5);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"is_pressed\":true"), "got {}", json);
        let back: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
