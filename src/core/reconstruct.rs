//! On/off state reconstruction from transition history

use tracing::trace;

use super::events::{InputEvent, Timestamp};

/// State of `key` at `instant`: the last transition at or before `instant`
/// wins, and a key with no such transition is released.
///
/// Events may arrive in any order; they are sorted by timestamp (ties keep
/// arrival order) before the scan.
pub fn state_at(events: &[InputEvent], key: &str, instant: Timestamp) -> bool {
    let mut relevant: Vec<&InputEvent> = events.iter().filter(|e| e.key == key).collect();
    relevant.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let mut state = false;
    for event in relevant {
        if event.timestamp <= instant {
            state = event.is_pressed;
        }
    }
    state
}

/// Pre-sorted transitions for one key, for repeated queries within a tick
#[derive(Debug, Clone)]
pub struct KeyTrace {
    transitions: Vec<(Timestamp, bool)>,
}

impl KeyTrace {
    pub fn new(events: &[InputEvent], key: &str) -> Self {
        let mut transitions: Vec<(Timestamp, bool)> = events
            .iter()
            .filter(|e| e.key == key)
            .map(|e| (e.timestamp, e.is_pressed))
            .collect();
        // Stable, so equal timestamps keep arrival order like `state_at`
        transitions.sort_by(|a, b| a.0.total_cmp(&b.0));
        trace!(key, transitions = transitions.len(), "Key trace built");
        Self { transitions }
    }

    /// Same answer as [`state_at`] over the events this trace was built from
    pub fn state_at(&self, instant: Timestamp) -> bool {
        let applied = self.transitions.partition_point(|&(t, _)| t <= instant);
        applied > 0 && self.transitions[applied - 1].1
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Distinct keys with at least one event inside the trailing window,
/// in order of first appearance
pub fn active_keys(events: &[InputEvent], now: Timestamp, window: f64) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for event in events.iter().filter(|e| e.age(now) <= window) {
        if !keys.iter().any(|k| k == &event.key) {
            keys.push(event.key.clone());
        }
    }
    keys
}

/// Number of released→pressed edges in a sequence of samples
pub fn count_pulses<I>(states: I) -> usize
where
    I: IntoIterator<Item = bool>,
{
    let mut previous = false;
    let mut pulses = 0;
    for state in states {
        if state && !previous {
            pulses += 1;
        }
        previous = state;
    }
    pulses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str, t: f64) -> InputEvent {
        InputEvent::press(key, t)
    }

    fn release(key: &str, t: f64) -> InputEvent {
        InputEvent::release(key, t)
    }

    #[test]
    fn empty_history_is_released() {
        assert!(!state_at(&[], "KeyA", 0.0));
        assert!(!state_at(&[], "KeyA", f64::MAX));
        assert!(!KeyTrace::new(&[], "KeyA").state_at(1.0));
    }

    #[test]
    fn press_then_release_window() {
        let events = vec![press("KeyA", 0.0), release("KeyA", 50.0)];
        assert!(state_at(&events, "KeyA", 25.0));
        assert!(!state_at(&events, "KeyA", 75.0));

        for i in -10..=60 {
            let instant = i as f64;
            let expected = (0.0..50.0).contains(&instant);
            assert_eq!(state_at(&events, "KeyA", instant), expected, "at {}", instant);
        }
    }

    #[test]
    fn transition_at_instant_is_visible() {
        let events = vec![press("KeyA", 10.0)];
        assert!(state_at(&events, "KeyA", 10.0));
        assert!(!state_at(&events, "KeyA", 9.999));
    }

    #[test]
    fn other_keys_do_not_leak() {
        let events = vec![press("KeyB", 0.0)];
        assert!(!state_at(&events, "KeyA", 5.0));
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let ordered = vec![
            press("KeyA", 0.0),
            release("KeyA", 10.0),
            press("KeyA", 20.0),
            release("KeyA", 30.0),
        ];
        let mut shuffled = ordered.clone();
        shuffled.swap(0, 3);
        shuffled.swap(1, 2);

        for i in -5..40 {
            let t = i as f64;
            assert_eq!(
                state_at(&ordered, "KeyA", t),
                state_at(&shuffled, "KeyA", t),
                "permutation changed state at {}",
                t
            );
        }
    }

    #[test]
    fn unmatched_release_and_duplicate_press_are_tolerated() {
        let events = vec![release("KeyA", 0.0), press("KeyA", 5.0), press("KeyA", 6.0)];
        assert!(!state_at(&events, "KeyA", 2.0));
        assert!(state_at(&events, "KeyA", 7.0));
    }

    #[test]
    fn equal_timestamps_keep_arrival_order() {
        let events = vec![press("KeyA", 5.0), release("KeyA", 5.0)];
        assert!(!state_at(&events, "KeyA", 5.0));
        assert!(!KeyTrace::new(&events, "KeyA").state_at(5.0));
    }

    #[test]
    fn trace_matches_direct_scan() {
        let events = vec![
            press("KeyA", 3.0),
            release("KeyA", 1.0),
            press("KeyA", 0.5),
            release("KeyA", 7.0),
            press("KeyB", 2.0),
            release("KeyA", 3.0),
        ];
        let trace = KeyTrace::new(&events, "KeyA");
        assert_eq!(trace.len(), 5);
        for i in 0..100 {
            let t = i as f64 * 0.1;
            assert_eq!(trace.state_at(t), state_at(&events, "KeyA", t), "at {}", t);
        }
    }

    #[test]
    fn active_keys_respect_window_and_first_appearance() {
        let events = vec![
            press("KeyOld", 0.0),
            press("KeyB", 9_000.0),
            press("KeyA", 9_500.0),
            release("KeyB", 9_600.0),
        ];
        let keys = active_keys(&events, 15_000.0, 10_000.0);
        assert_eq!(keys, vec!["KeyB".to_string(), "KeyA".to_string()]);
        assert!(active_keys(&[], 0.0, 10_000.0).is_empty());
    }

    #[test]
    fn count_pulses_counts_rising_edges() {
        assert_eq!(count_pulses([false, true, true, false, true, false]), 2);
        assert_eq!(count_pulses([true, true]), 1);
        assert_eq!(count_pulses(std::iter::empty()), 0);
    }
}
