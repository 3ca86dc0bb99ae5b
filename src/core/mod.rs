//! Platform-agnostic core module - shared between the GUI viewers and the CLI

pub mod buffer;
pub mod capture;
pub mod events;
pub mod log;
pub mod raster;
pub mod reconstruct;
pub mod schedule;
pub mod script;
pub mod session;
pub mod timeline;

pub use buffer::EventBuffer;
pub use capture::{suppresses_default, CaptureFilter, CaptureSignal};
pub use events::{mouse_key, InputEvent, MouseButton, Timestamp};
pub use raster::{rasterize, Raster};
pub use reconstruct::{active_keys, count_pulses, state_at, KeyTrace};
pub use schedule::{AnimationScheduler, Housekeeping, PeriodicTimer, SchedulerState};
pub use script::{parse_script, parse_step, ScriptStep};
pub use session::{Action, KeyStatus, Session, SessionPolicy};
pub use timeline::{render_frame, Lane, Timeline, TimelineConfig, TimelineFrame};

impl From<CaptureSignal> for Action {
    fn from(signal: CaptureSignal) -> Self {
        match signal {
            CaptureSignal::Press { key, at } => Action::Press { key, at },
            CaptureSignal::Release { key, at } => Action::Release { key, at },
        }
    }
}
