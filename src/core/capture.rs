//! Raw key/button notifications → one press and one release per physical
//! actuation.
//!
//! - OS auto-repeat and duplicate downs are dropped
//! - Ups without a matching down are dropped, except for release-only keys,
//!   which get a synthetic press and a delayed release
//! - A fixed set of keys keeps platform default handling

use std::collections::HashSet;
use tracing::{debug, trace};

use super::events::{mouse_key, Timestamp, SIMULATED_HOLD_MS};

/// Keys that misbehave when default handling is suppressed
pub const PASS_THROUGH_KEYS: &[&str] = &[
    "PrintScreen",
    "KanaMode",
    "Lang1",
    "Lang2",
    "MetaLeft",
    "MetaRight",
    "Backquote",
];

/// Keys whose platforms deliver only the release notification
pub const RELEASE_ONLY_KEYS: &[&str] = &["PrintScreen"];

/// Normalized notification for the session
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureSignal {
    Press { key: String, at: Timestamp },
    Release { key: String, at: Timestamp },
}

impl CaptureSignal {
    pub fn key(&self) -> &str {
        match self {
            CaptureSignal::Press { key, .. } | CaptureSignal::Release { key, .. } => key,
        }
    }
}

/// Whether the capture layer should stop platform handling of `code`
pub fn suppresses_default(code: &str) -> bool {
    !PASS_THROUGH_KEYS.contains(&code)
}

#[derive(Debug)]
pub struct CaptureFilter {
    down: HashSet<String>,
    /// Synthetic releases waiting for their hold to elapse
    pending: Vec<(String, Timestamp)>,
    hold_ms: f64,
}

impl Default for CaptureFilter {
    fn default() -> Self {
        Self::new(SIMULATED_HOLD_MS)
    }
}

impl CaptureFilter {
    pub fn new(hold_ms: f64) -> Self {
        Self {
            down: HashSet::new(),
            pending: Vec::new(),
            hold_ms,
        }
    }

    pub fn key_down(&mut self, code: &str, repeat: bool, now: Timestamp) -> Option<CaptureSignal> {
        if repeat {
            trace!(code, "Repeat suppressed");
            return None;
        }
        if !self.down.insert(code.to_string()) {
            trace!(code, "Duplicate down suppressed");
            return None;
        }
        Some(CaptureSignal::Press {
            key: code.to_string(),
            at: now,
        })
    }

    pub fn key_up(&mut self, code: &str, now: Timestamp) -> Option<CaptureSignal> {
        if self.down.remove(code) {
            return Some(CaptureSignal::Release {
                key: code.to_string(),
                at: now,
            });
        }
        if RELEASE_ONLY_KEYS.contains(&code) {
            let due = now + self.hold_ms;
            debug!(code, due, "Synthesizing press for release-only key");
            self.pending.push((code.to_string(), due));
            return Some(CaptureSignal::Press {
                key: code.to_string(),
                at: now,
            });
        }
        trace!(code, "Up without down ignored");
        None
    }

    pub fn mouse_down(&mut self, button: u16, now: Timestamp) -> CaptureSignal {
        CaptureSignal::Press {
            key: mouse_key(button),
            at: now,
        }
    }

    pub fn mouse_up(&mut self, button: u16, now: Timestamp) -> CaptureSignal {
        CaptureSignal::Release {
            key: mouse_key(button),
            at: now,
        }
    }

    /// Synthetic releases whose hold has elapsed, stamped with their due time
    pub fn poll_due(&mut self, now: Timestamp) -> Vec<CaptureSignal> {
        let mut due = Vec::new();
        self.pending.retain(|(key, at)| {
            if *at <= now {
                due.push(CaptureSignal::Release {
                    key: key.clone(),
                    at: *at,
                });
                false
            } else {
                true
            }
        });
        due
    }

    /// Earliest pending synthetic release
    pub fn next_due(&self) -> Option<Timestamp> {
        self.pending.iter().map(|(_, at)| *at).reduce(f64::min)
    }

    pub fn is_down(&self, code: &str) -> bool {
        self.down.contains(code)
    }

    /// Forget held keys and pending releases
    pub fn clear(&mut self) {
        self.down.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_and_duplicates_yield_one_press() {
        let mut filter = CaptureFilter::default();
        assert!(filter.key_down("KeyA", false, 0.0).is_some());
        assert!(filter.key_down("KeyA", true, 30.0).is_none());
        assert!(filter.key_down("KeyA", false, 31.0).is_none());
        assert!(filter.is_down("KeyA"));

        let up = filter.key_up("KeyA", 40.0);
        assert_eq!(
            up,
            Some(CaptureSignal::Release {
                key: "KeyA".into(),
                at: 40.0
            })
        );
        assert!(filter.key_down("KeyA", false, 50.0).is_some());
    }

    #[test]
    fn stray_up_is_ignored() {
        let mut filter = CaptureFilter::default();
        assert!(filter.key_up("KeyZ", 0.0).is_none());
    }

    #[test]
    fn release_only_key_gets_simulated_hold() {
        let mut filter = CaptureFilter::new(100.0);
        let press = filter.key_up("PrintScreen", 1_000.0);
        assert_eq!(
            press,
            Some(CaptureSignal::Press {
                key: "PrintScreen".into(),
                at: 1_000.0
            })
        );
        assert_eq!(filter.next_due(), Some(1_100.0));
        assert!(filter.poll_due(1_099.0).is_empty());

        let released = filter.poll_due(1_250.0);
        assert_eq!(
            released,
            vec![CaptureSignal::Release {
                key: "PrintScreen".into(),
                at: 1_100.0
            }]
        );
        assert!(filter.next_due().is_none());
    }

    #[test]
    fn print_screen_with_real_down_is_released_normally() {
        let mut filter = CaptureFilter::default();
        filter.key_down("PrintScreen", false, 0.0);
        let up = filter.key_up("PrintScreen", 20.0);
        assert!(matches!(up, Some(CaptureSignal::Release { .. })));
        assert!(filter.next_due().is_none());
    }

    #[test]
    fn pass_through_list_keeps_default_handling() {
        assert!(!suppresses_default("MetaLeft"));
        assert!(!suppresses_default("Backquote"));
        assert!(suppresses_default("KeyA"));
        assert!(suppresses_default("Space"));
    }

    #[test]
    fn mouse_buttons_become_mouse_keys() {
        let mut filter = CaptureFilter::default();
        assert_eq!(filter.mouse_down(2, 5.0).key(), "Mouse2");
        assert_eq!(filter.mouse_up(0, 6.0).key(), "Mouse0");
    }
}
