//! JSON-lines input scripts for headless replay
//!
//! One step per line, offsets relative to the start of playback:
//!
//! ```text
//! {"at": 0, "key": "KeyA", "pressed": true}
//! {"at": 12.5, "button": 0, "pressed": false}
//! ```

use serde::Deserialize;
use tracing::{trace, warn};

use super::events::{mouse_key, Timestamp};

/// Latest step offset accepted (one day)
pub const MAX_OFFSET_MS: f64 = 86_400_000.0;

#[derive(Debug, Deserialize)]
struct RawStep {
    at: f64,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    button: Option<u16>,
    pressed: bool,
}

/// A scripted transition
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptStep {
    /// Offset from playback start (ms)
    pub at: f64,
    pub key: String,
    pub pressed: bool,
}

impl ScriptStep {
    /// Session timestamp when playback started at `origin`
    pub fn timestamp(&self, origin: Timestamp) -> Timestamp {
        origin + self.at
    }
}

/// Parse one line; blank lines, `#` comments and malformed steps give `None`
pub fn parse_step(line: &str) -> Option<ScriptStep> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let raw: RawStep = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, line, "Rejected script line");
            return None;
        }
    };

    let key = match (raw.key, raw.button) {
        (Some(key), None) if !key.is_empty() => key,
        (None, Some(button)) => mouse_key(button),
        _ => {
            warn!(line, "Script step needs exactly one of key or button");
            return None;
        }
    };

    if !raw.at.is_finite() || raw.at < 0.0 || raw.at > MAX_OFFSET_MS {
        warn!(at = raw.at, max = MAX_OFFSET_MS, "Script step offset out of range");
        return None;
    }

    trace!(at = raw.at, key = %key, pressed = raw.pressed, "Script step parsed");
    Some(ScriptStep {
        at: raw.at,
        key,
        pressed: raw.pressed,
    })
}

/// Parse a whole script, sorted by offset (stable for equal offsets)
pub fn parse_script(text: &str) -> Vec<ScriptStep> {
    let mut steps: Vec<ScriptStep> = text.lines().filter_map(parse_step).collect();
    steps.sort_by(|a, b| a.at.total_cmp(&b.at));
    steps
}
