//! Runtime configuration
//!
//! Defaults come from the engine constants. `Config::from_env` applies, in
//! order: a JSON document from `CHATTER_CONFIG`, then the individual
//! `CHATTER_*` overrides. Bad values are logged and ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::events::{EVENT_LOG_LIMIT, EVICTION_PERIOD_MS, SIMULATED_HOLD_MS, TICK_MS};
use crate::core::{SessionPolicy, TimelineConfig};

/// Longest accepted duration setting (one day)
const MAX_MS: f64 = 86_400_000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timeline: TimelineConfig,
    /// Render cadence while running (ms)
    pub tick_ms: f64,
    /// Eviction sweep period (ms)
    pub eviction_period_ms: f64,
    /// Keep evicting while the timeline is paused
    pub evict_while_paused: bool,
    /// Hold applied to release-only keys (ms)
    pub simulated_hold_ms: f64,
    /// Rows kept in the event log view
    pub event_log_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            tick_ms: TICK_MS,
            eviction_period_ms: EVICTION_PERIOD_MS,
            evict_while_paused: true,
            simulated_hold_ms: SIMULATED_HOLD_MS,
            event_log_limit: EVENT_LOG_LIMIT,
        }
    }
}

impl Config {
    /// Defaults plus process environment overrides
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults plus overrides from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("CHATTER_CONFIG") {
            Some(json) => Self::from_json(&json).unwrap_or_default(),
            None => Self::default(),
        };

        if let Some(v) = lookup("CHATTER_WINDOW_MS") {
            if let Some(ms) = parse_positive(&v, "CHATTER_WINDOW_MS") {
                config.timeline.window_ms = ms;
            }
        }
        if let Some(v) = lookup("CHATTER_TICK_MS") {
            if let Some(ms) = parse_positive(&v, "CHATTER_TICK_MS") {
                config.tick_ms = ms;
            }
        }
        if let Some(v) = lookup("CHATTER_EVICT_MS") {
            if let Some(ms) = parse_positive(&v, "CHATTER_EVICT_MS") {
                config.eviction_period_ms = ms;
            }
        }
        if let Some(v) = lookup("CHATTER_CANVAS") {
            match parse_canvas(&v) {
                Some((w, h)) => {
                    config.timeline.width = w;
                    config.timeline.height = h;
                }
                None => warn!(value = %v, "CHATTER_CANVAS must look like 800x400"),
            }
        }
        if let Some(v) = lookup("CHATTER_EVICT_WHILE_PAUSED") {
            match v.trim().parse::<bool>() {
                Ok(b) => config.evict_while_paused = b,
                Err(_) => warn!(value = %v, "CHATTER_EVICT_WHILE_PAUSED must be true or false"),
            }
        }

        debug!(?config, "Configuration resolved");
        config
    }

    /// Parse a (possibly partial) JSON document over the defaults
    ///
    /// Out-of-range values fall back to their defaults.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(json) {
            Ok(config) => Some(config.sanitized()),
            Err(e) => {
                warn!(error = %e, "Ignoring invalid configuration JSON");
                None
            }
        }
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            ("tick_ms", &mut self.tick_ms, defaults.tick_ms),
            ("eviction_period_ms", &mut self.eviction_period_ms, defaults.eviction_period_ms),
            ("simulated_hold_ms", &mut self.simulated_hold_ms, defaults.simulated_hold_ms),
            ("timeline.window_ms", &mut self.timeline.window_ms, defaults.timeline.window_ms),
        ];
        for (name, value, default) in fields {
            if !in_range(*value) {
                warn!(name, value = *value, default, "Out-of-range setting replaced by default");
                *value = default;
            }
        }

        let trace_width = self.timeline.trace_width;
        if !(trace_width.is_finite() && trace_width > 0.0) {
            warn!(trace_width, "Invalid trace width replaced by default");
            self.timeline.trace_width = defaults.timeline.trace_width;
        }
        if self.timeline.width == 0 || self.timeline.height == 0 {
            warn!(
                width = self.timeline.width,
                height = self.timeline.height,
                "Empty canvas replaced by default"
            );
            self.timeline.width = defaults.timeline.width;
            self.timeline.height = defaults.timeline.height;
        }
        if self.timeline.divisions == 0 {
            warn!("Zero grid divisions replaced by default");
            self.timeline.divisions = defaults.timeline.divisions;
        }
        self
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            retention_ms: self.timeline.window_ms,
            evict_while_paused: self.evict_while_paused,
        }
    }
}

fn in_range(ms: f64) -> bool {
    ms.is_finite() && ms > 0.0 && ms <= MAX_MS
}

fn parse_positive(value: &str, name: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if in_range(v) => Some(v),
        _ => {
            warn!(name, value, "Expected a positive number of milliseconds up to a day");
            None
        }
    }
}

fn parse_canvas(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}
