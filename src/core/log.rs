//! Event log view helpers

use chrono::{DateTime, Local};

use super::events::InputEvent;

/// Shown when a timestamp cannot be placed on the wall clock
pub const UNKNOWN_CLOCK: &str = "--:--:--.---";

/// The last `limit` events in chronological order
///
/// Arrival order is chronological for a single capture source; ties and
/// out-of-order stamps are sorted so the log never runs backwards.
pub fn recent(events: &[InputEvent], limit: usize) -> Vec<InputEvent> {
    let start = events.len().saturating_sub(limit);
    let mut tail = events[start..].to_vec();
    tail.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    tail
}

/// Local `HH:MM:SS.mmm` for a Unix-epoch millisecond value
pub fn format_clock(unix_ms: f64) -> String {
    if !unix_ms.is_finite() {
        return UNKNOWN_CLOCK.to_string();
    }
    match DateTime::from_timestamp_millis(unix_ms as i64) {
        Some(utc) => utc.with_timezone(&Local).format("%H:%M:%S%.3f").to_string(),
        None => UNKNOWN_CLOCK.to_string(),
    }
}

pub fn direction(event: &InputEvent) -> &'static str {
    if event.is_pressed {
        "DOWN"
    } else {
        "UP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_keeps_tail_in_time_order() {
        let events: Vec<InputEvent> = (0..150)
            .map(|i| InputEvent::new("KeyA", i % 2 == 0, i as f64))
            .collect();
        let tail = recent(&events, 100);
        assert_eq!(tail.len(), 100);
        assert_eq!(tail[0].timestamp, 50.0);
        assert_eq!(tail[99].timestamp, 149.0);
    }

    #[test]
    fn recent_with_few_events_returns_all() {
        let events = vec![InputEvent::press("KeyA", 2.0), InputEvent::release("KeyA", 1.0)];
        let tail = recent(&events, 100);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].timestamp, 1.0);
    }

    #[test]
    fn clock_uses_local_time() {
        use chrono::TimeZone;

        let ms = 1_700_000_000_123i64;
        let expected = Local
            .timestamp_millis_opt(ms)
            .single()
            .map(|t| t.format("%H:%M:%S%.3f").to_string())
            .expect("valid local time");
        assert_eq!(format_clock(ms as f64), expected);
        assert!(format_clock(ms as f64).ends_with(".123"));
        assert_eq!(format_clock(ms as f64).len(), 12, "HH:MM:SS.mmm");
    }

    #[test]
    fn clock_rejects_unplaceable_values() {
        assert_eq!(format_clock(f64::NAN), UNKNOWN_CLOCK);
        assert_eq!(format_clock(f64::INFINITY), UNKNOWN_CLOCK);
        assert_eq!(format_clock(1e300), UNKNOWN_CLOCK);
    }

    #[test]
    fn direction_labels() {
        assert_eq!(direction(&InputEvent::press("KeyA", 0.0)), "DOWN");
        assert_eq!(direction(&InputEvent::release("KeyA", 0.0)), "UP");
    }
}
