//! Platform-agnostic time utilities
//!
//! `now_millis` is the session clock used for every event timestamp.
//! `unix_millis` is wall-clock time, only used to label the event log.

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_millis() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now_millis() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn unix_millis() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn unix_millis() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Wall-clock offset to add to a session timestamp
///
/// Sampled once per call; callers keep the value for the session so log
/// labels do not drift between frames.
pub fn session_epoch() -> f64 {
    unix_millis() - now_millis()
}
