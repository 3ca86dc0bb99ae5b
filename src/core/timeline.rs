//! Timeline strip-chart: one lane per active key, square-wave traces over
//! the trailing window, right edge is "now".
//!
//! [`render_frame`] builds a backend-independent display list. The egui
//! painter and the CPU rasterizer both consume [`TimelineFrame`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::{
    InputEvent, Timestamp, CANVAS_HEIGHT, CANVAS_WIDTH, GRID_DIVISIONS, RETENTION_MS,
};
use super::reconstruct::{active_keys, count_pulses, KeyTrace};

/// Text drawn over the frame while paused
pub const PAUSED_LABEL: &str = "PAUSED";

/// Label offset from the lane's left edge and centre line
const LABEL_INSET_X: f32 = 5.0;
const LABEL_INSET_Y: f32 = 5.0;

/// RGBA palette shared by every backend
pub mod palette {
    pub const BACKGROUND: [u8; 4] = [0x1f, 0x29, 0x37, 0xff];
    pub const GRID: [u8; 4] = [0x37, 0x41, 0x51, 0xff];
    pub const LABEL: [u8; 4] = [0x9c, 0xa3, 0xaf, 0xff];
    pub const TRACE: [u8; 4] = [0x10, 0xb9, 0x81, 0xff];
    /// rgba(239, 68, 68, 0.2)
    pub const PAUSE_TINT: [u8; 4] = [0xef, 0x44, 0x44, 51];
    pub const PAUSE_TEXT: [u8; 4] = [0xef, 0x44, 0x44, 0xff];
}

/// Fixed geometry and timing of the chart
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Logical raster width in pixels
    pub width: u32,
    /// Logical raster height in pixels
    pub height: u32,
    /// Trailing window shown across the full width (ms)
    pub window_ms: f64,
    /// Number of equal vertical grid divisions
    pub divisions: usize,
    /// Trace stroke width in pixels
    pub trace_width: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            window_ms: RETENTION_MS,
            divisions: GRID_DIVISIONS,
            trace_width: 2.0,
        }
    }
}

impl TimelineConfig {
    /// Sample time for pixel column `x` (x = width is now)
    pub fn time_at_column(&self, now: Timestamp, x: u32) -> Timestamp {
        let w = self.width.max(1) as f64;
        now - (w - x as f64) * self.window_ms / w
    }

    /// Lane height for `lanes` active keys (full height when there are none)
    pub fn lane_height(&self, lanes: usize) -> f32 {
        self.height as f32 / lanes.max(1) as f32
    }
}

/// One key's strip
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    pub key: String,
    pub label: String,
    /// Label baseline anchor
    pub label_pos: [f32; 2],
    pub top: f32,
    pub height: f32,
    /// y of the trace while pressed
    pub high_y: f32,
    /// y of the trace while released
    pub low_y: f32,
    /// Polyline from the right edge (now) to the left edge
    pub trace: Vec<[f32; 2]>,
    /// Sampled state for each trace point, same order
    pub samples: Vec<bool>,
    /// Presses visible in the window
    pub pulses: usize,
}

/// Translucent tint plus centred label shown while paused
#[derive(Clone, Debug, PartialEq)]
pub struct PauseOverlay {
    pub tint: [u8; 4],
    pub label: &'static str,
    pub label_pos: [f32; 2],
}

/// Everything needed to draw one tick
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineFrame {
    pub width: u32,
    pub height: u32,
    pub now: Timestamp,
    pub paused: bool,
    pub vertical_grid: Vec<f32>,
    pub horizontal_grid: Vec<f32>,
    pub lanes: Vec<Lane>,
    pub overlay: Option<PauseOverlay>,
    pub trace_width: f32,
}

impl TimelineFrame {
    pub fn lane(&self, key: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.key == key)
    }
}

/// Display label for a key identifier
pub fn display_label(key: &str) -> String {
    key.to_string()
}

/// Build the display list for `now` from an event snapshot
pub fn render_frame(
    config: &TimelineConfig,
    events: &[InputEvent],
    now: Timestamp,
    paused: bool,
) -> TimelineFrame {
    let width = config.width as f32;
    let height = config.height as f32;
    let keys = active_keys(events, now, config.window_ms);
    let lane_h = config.lane_height(keys.len());

    let divisions = config.divisions.max(1);
    let vertical_grid = (0..=divisions)
        .map(|i| width - (i as f32 * width / divisions as f32))
        .collect();
    let horizontal_grid = (0..=keys.len()).map(|i| i as f32 * lane_h).collect();

    let lanes = keys
        .into_iter()
        .enumerate()
        .map(|(index, key)| build_lane(config, events, now, index, key, lane_h))
        .collect();

    let overlay = paused.then(|| PauseOverlay {
        tint: palette::PAUSE_TINT,
        label: PAUSED_LABEL,
        label_pos: [width / 2.0, height / 2.0],
    });

    TimelineFrame {
        width: config.width,
        height: config.height,
        now,
        paused,
        vertical_grid,
        horizontal_grid,
        lanes,
        overlay,
        trace_width: config.trace_width,
    }
}

fn build_lane(
    config: &TimelineConfig,
    events: &[InputEvent],
    now: Timestamp,
    index: usize,
    key: String,
    lane_h: f32,
) -> Lane {
    let top = index as f32 * lane_h;
    let centre = top + lane_h / 2.0;
    let high_y = centre - lane_h / 4.0;
    let low_y = centre + lane_h / 4.0;

    let trace = KeyTrace::new(events, &key);
    let columns = config.width as usize + 1;
    let mut points = Vec::with_capacity(columns);
    let mut samples = Vec::with_capacity(columns);

    for x in (0..=config.width).rev() {
        let state = trace.state_at(config.time_at_column(now, x));
        points.push([x as f32, if state { high_y } else { low_y }]);
        samples.push(state);
    }

    // Samples run newest→oldest; count in chronological order
    let pulses = count_pulses(samples.iter().rev().copied());

    Lane {
        label: display_label(&key),
        key,
        label_pos: [LABEL_INSET_X, centre + LABEL_INSET_Y],
        top,
        height: lane_h,
        high_y,
        low_y,
        trace: points,
        samples,
        pulses,
    }
}

/// Renderer with pause freezing
///
/// While paused, the frame computed at the instant pause began is returned
/// unchanged. Resuming discards it and sampling restarts from live `now`.
#[derive(Debug)]
pub struct Timeline {
    config: TimelineConfig,
    frame: TimelineFrame,
    frozen: bool,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl Timeline {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            frame: render_frame(&config, &[], 0.0, false),
            config,
            frozen: false,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Render one pass. The first paused pass is kept until resumed.
    pub fn render(&mut self, events: &[InputEvent], now: Timestamp, paused: bool) -> &TimelineFrame {
        if !(paused && self.frozen) {
            self.frame = render_frame(&self.config, events, now, paused);
            if paused {
                debug!(now, lanes = self.frame.lanes.len(), "Timeline frozen");
            } else if self.frozen {
                debug!(now, "Timeline resumed");
            }
        }
        self.frozen = paused;
        &self.frame
    }

    /// Most recently rendered frame
    pub fn last_frame(&self) -> &TimelineFrame {
        &self.frame
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Forget rendered state (used by reset)
    pub fn clear(&mut self) {
        self.frame = render_frame(&self.config, &[], 0.0, false);
        self.frozen = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TimelineConfig {
        // 1 ms per pixel column
        TimelineConfig {
            width: 100,
            height: 40,
            window_ms: 100.0,
            divisions: 10,
            trace_width: 2.0,
        }
    }

    #[test]
    fn empty_buffer_renders_zero_lanes_at_full_height() {
        let config = TimelineConfig::default();
        let frame = render_frame(&config, &[], 1_000.0, false);
        assert!(frame.lanes.is_empty());
        assert_eq!(frame.horizontal_grid, vec![0.0]);
        assert_eq!(config.lane_height(0), config.height as f32);
        assert!(frame.overlay.is_none());
    }

    #[test]
    fn vertical_grid_is_right_aligned() {
        let config = TimelineConfig::default();
        let frame = render_frame(&config, &[], 0.0, false);
        assert_eq!(frame.vertical_grid.len(), 11);
        assert_eq!(frame.vertical_grid[0], 800.0);
        assert_eq!(frame.vertical_grid[10], 0.0);
        assert_eq!(frame.vertical_grid[1], 720.0);
    }

    #[test]
    fn column_time_maps_linearly() {
        let config = TimelineConfig::default();
        assert_eq!(config.time_at_column(20_000.0, 800), 20_000.0);
        assert_eq!(config.time_at_column(20_000.0, 0), 10_000.0);
        assert_eq!(config.time_at_column(20_000.0, 400), 15_000.0);
    }

    #[test]
    fn lanes_partition_height() {
        let events = vec![
            InputEvent::press("KeyA", 10.0),
            InputEvent::press("KeyB", 20.0),
        ];
        let frame = render_frame(&small_config(), &events, 50.0, false);
        assert_eq!(frame.lanes.len(), 2);
        assert_eq!(frame.horizontal_grid, vec![0.0, 20.0, 40.0]);

        let lane_b = frame.lane("KeyB").unwrap();
        assert_eq!(lane_b.top, 20.0);
        assert_eq!(lane_b.high_y, 25.0);
        assert_eq!(lane_b.low_y, 35.0);
        assert_eq!(lane_b.label_pos, [5.0, 35.0]);
    }

    #[test]
    fn trace_spans_every_column_from_now_backwards() {
        let events = vec![InputEvent::press("KeyA", 60.0)];
        let frame = render_frame(&small_config(), &events, 100.0, false);
        let lane = &frame.lanes[0];

        assert_eq!(lane.trace.len(), 101);
        assert_eq!(lane.trace.first().unwrap()[0], 100.0);
        assert_eq!(lane.trace.last().unwrap()[0], 0.0);
        // x=60 samples t=60 exactly: pressed; x=59 is before the press
        assert!(lane.samples[40]);
        assert!(!lane.samples[41]);
        assert_eq!(lane.trace[40][1], lane.high_y);
        assert_eq!(lane.trace[41][1], lane.low_y);
    }

    #[test]
    fn chatter_shows_two_pulses() {
        let events = vec![
            InputEvent::press("KeyB", 0.0),
            InputEvent::release("KeyB", 2.0),
            InputEvent::press("KeyB", 3.0),
            InputEvent::release("KeyB", 5.0),
        ];
        let frame = render_frame(&small_config(), &events, 50.0, false);
        let lane = frame.lane("KeyB").unwrap();
        assert_eq!(lane.pulses, 2, "bounce must not merge into a single pulse");
    }

    #[test]
    fn paused_frame_carries_overlay() {
        let frame = render_frame(&small_config(), &[], 0.0, true);
        let overlay = frame.overlay.expect("paused frame has an overlay");
        assert_eq!(overlay.label, PAUSED_LABEL);
        assert_eq!(overlay.label_pos, [50.0, 20.0]);
    }

    #[test]
    fn timeline_freezes_while_paused() {
        let mut timeline = Timeline::new(small_config());
        let mut events = vec![InputEvent::press("KeyA", 10.0)];

        let running = timeline.render(&events, 50.0, false).clone();
        let frozen = timeline.render(&events, 60.0, true).clone();
        assert!(frozen.paused);
        assert_eq!(frozen.now, 60.0);

        events.push(InputEvent::release("KeyA", 70.0));
        events.push(InputEvent::press("KeyZ", 75.0));
        let again = timeline.render(&events, 90.0, true).clone();
        assert_eq!(again, frozen, "paused renders must be identical");
        assert_ne!(running, frozen);

        let resumed = timeline.render(&events, 120.0, false);
        assert!(!resumed.paused);
        assert_eq!(resumed.now, 120.0);
        assert!(resumed.lane("KeyZ").is_some());
        assert!(!timeline.is_frozen());
    }
}
