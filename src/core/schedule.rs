//! Render and eviction timers
//!
//! Timers are polled against the session clock rather than owning a thread,
//! so the same state machine runs inside an egui frame loop or behind a tokio
//! interval. Both owners cancel on `unmount` and on drop.

use tracing::debug;

use super::events::{Timestamp, EVICTION_PERIOD_MS, TICK_MS};

/// Fixed-period timer without catch-up
///
/// A poll that finds the timer overdue fires once and reschedules one period
/// after the poll instant; missed periods are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicTimer {
    period: f64,
    next_due: Option<Timestamp>,
}

impl PeriodicTimer {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Arm the timer; the first fire is one period from `now`
    pub fn start(&mut self, now: Timestamp) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// True if a fire was due; at most one fire per call
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time until the next fire (zero when overdue, `None` when cancelled)
    pub fn remaining(&self, now: Timestamp) -> Option<f64> {
        self.next_due.map(|due| (due - now).max(0.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Running,
    Paused,
}

/// Drives render ticks while running and freezes while paused
#[derive(Debug)]
pub struct AnimationScheduler {
    state: SchedulerState,
    render: PeriodicTimer,
    mounted: bool,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

impl AnimationScheduler {
    pub fn new(tick_ms: f64) -> Self {
        Self {
            state: SchedulerState::Running,
            render: PeriodicTimer::new(tick_ms),
            mounted: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Start ticking (no-op on the timer while paused)
    pub fn mount(&mut self, now: Timestamp) {
        self.mounted = true;
        if self.state == SchedulerState::Running {
            self.render.start(now);
        }
        debug!(now, state = ?self.state, "Animation scheduler mounted");
    }

    /// Release the render timer unconditionally
    pub fn unmount(&mut self) {
        if self.mounted {
            debug!("Animation scheduler unmounted");
        }
        self.render.cancel();
        self.mounted = false;
    }

    /// Flip between running and paused; returns the new state
    ///
    /// The caller renders one final pass with the pause flag set when this
    /// returns `Paused`.
    pub fn toggle(&mut self, now: Timestamp) -> SchedulerState {
        self.state = match self.state {
            SchedulerState::Running => {
                self.render.cancel();
                SchedulerState::Paused
            }
            SchedulerState::Paused => {
                if self.mounted {
                    self.render.start(now);
                }
                SchedulerState::Running
            }
        };
        debug!(now, state = ?self.state, "Animation scheduler toggled");
        self.state
    }

    /// True when a render tick is due
    pub fn poll(&mut self, now: Timestamp) -> bool {
        self.render.poll(now)
    }

    /// Time until the next tick, `None` while paused or unmounted
    pub fn until_next_tick(&self, now: Timestamp) -> Option<f64> {
        self.render.remaining(now)
    }

    pub fn timer_active(&self) -> bool {
        self.render.is_active()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Periodic eviction sweep, independent of pause
#[derive(Debug)]
pub struct Housekeeping {
    evict: PeriodicTimer,
}

impl Default for Housekeeping {
    fn default() -> Self {
        Self::new(EVICTION_PERIOD_MS)
    }
}

impl Housekeeping {
    pub fn new(period_ms: f64) -> Self {
        Self {
            evict: PeriodicTimer::new(period_ms),
        }
    }

    pub fn mount(&mut self, now: Timestamp) {
        self.evict.start(now);
    }

    pub fn unmount(&mut self) {
        self.evict.cancel();
    }

    /// True when an eviction sweep is due
    pub fn poll(&mut self, now: Timestamp) -> bool {
        self.evict.poll(now)
    }

    pub fn until_next_sweep(&self, now: Timestamp) -> Option<f64> {
        self.evict.remaining(now)
    }

    pub fn is_active(&self) -> bool {
        self.evict.is_active()
    }
}

impl Drop for Housekeeping {
    fn drop(&mut self) {
        self.unmount();
    }
}
