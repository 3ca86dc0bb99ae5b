//! Shared chatter-scope app
//!
//! This module contains the egui app that runs on both native and WASM platforms.
//! All state lives in `ChatterApp` and is only touched from `update`.

mod devices;
mod event_log;
mod header;
mod input;
mod timeline;

use std::time::Duration;

use eframe::egui;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::{
    Action, AnimationScheduler, CaptureFilter, Housekeeping, SchedulerState, Session, Timeline,
};
use crate::theme::{colors, minimal_visuals};
use crate::time::{now_millis, session_epoch};

/// Device panel shown above the timeline
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Keyboard,
    Mouse,
}

/// Keyboard/mouse chatter viewer - runs on both native and WASM
pub struct ChatterApp {
    pub(crate) config: Config,
    /// Event history plus pressed/ever-pressed/paused state
    pub(crate) session: Session,
    /// Raw egui input → one press/release per actuation
    pub(crate) capture: CaptureFilter,
    pub(crate) timeline: Timeline,
    scheduler: AnimationScheduler,
    housekeeping: Housekeeping,
    /// FPS counter
    pub(crate) fps_counter: header::FpsCounter,
    pub(crate) active_tab: ActiveTab,
    /// Wall-clock offset of the session clock, for log labels
    pub(crate) epoch: f64,
    /// Modifier state seen last frame (modifiers have no key events)
    pub(crate) prev_modifiers: egui::Modifiers,
}

impl ChatterApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        cc.egui_ctx.set_visuals(minimal_visuals());

        let now = now_millis();
        let mut scheduler = AnimationScheduler::new(config.tick_ms);
        let mut housekeeping = Housekeeping::new(config.eviction_period_ms);
        scheduler.mount(now);
        housekeeping.mount(now);

        let session = Session::new(config.session_policy());
        let mut timeline = Timeline::new(config.timeline);
        timeline.render(session.buffer.as_slice(), now, false);

        info!(
            window_ms = config.timeline.window_ms,
            tick_ms = config.tick_ms,
            width = config.timeline.width,
            height = config.timeline.height,
            "Viewer started"
        );

        Self {
            capture: CaptureFilter::new(config.simulated_hold_ms),
            config,
            session,
            timeline,
            scheduler,
            housekeeping,
            fps_counter: header::FpsCounter::new(),
            active_tab: ActiveTab::default(),
            epoch: session_epoch(),
            prev_modifiers: egui::Modifiers::NONE,
        }
    }

    /// Flip pause; pausing renders one final frame with the overlay
    pub(crate) fn toggle_pause(&mut self, now: f64) {
        self.session.dispatch(Action::TogglePause);
        let state = self.scheduler.toggle(now);
        let paused = state == SchedulerState::Paused;
        self.timeline.render(self.session.buffer.as_slice(), now, paused);
    }

    pub(crate) fn reset(&mut self, now: f64) {
        self.session.dispatch(Action::Reset);
        self.capture.clear();
        self.timeline.clear();
        self.timeline
            .render(self.session.buffer.as_slice(), now, self.session.is_paused());
        debug!("Viewer reset");
    }

    /// Run whichever timers are due
    fn run_timers(&mut self, now: f64) {
        for signal in self.capture.poll_due(now) {
            self.session.dispatch(signal.into());
        }
        if self.housekeeping.poll(now) {
            self.session.dispatch(Action::Evict { now });
        }
        if self.scheduler.poll(now) {
            self.timeline.render(self.session.buffer.as_slice(), now, false);
        }
    }

    /// Wake up for the next timer even without input
    fn schedule_repaint(&self, ctx: &egui::Context, now: f64) {
        let pending = self.capture.next_due().map(|due| (due - now).max(0.0));
        let next = [
            self.scheduler.until_next_tick(now),
            self.housekeeping.until_next_sweep(now),
            pending,
        ]
        .into_iter()
        .flatten()
        .reduce(f64::min);

        if let Some(ms) = next {
            ctx.request_repaint_after(Duration::from_secs_f64(ms / 1000.0));
        }
    }

    fn shutdown(&mut self) {
        self.scheduler.unmount();
        self.housekeeping.unmount();
        info!(events = self.session.buffer.len(), "Viewer stopped");
    }
}

impl eframe::App for ChatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = now_millis();

        self.capture_input(ctx, now);
        self.run_timers(now);

        // Header bar (TopBottomPanel spans full width)
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(6.0))
            .show(ctx, |ui| {
                self.render_header(ui, now);
            });

        egui::TopBottomPanel::bottom("event_log")
            .resizable(true)
            .default_height(220.0)
            .frame(egui::Frame::new().fill(colors::BG_PANEL).inner_margin(8.0))
            .show(ctx, |ui| {
                self.render_event_log(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(8.0))
            .show(ctx, |ui| {
                match self.active_tab {
                    ActiveTab::Keyboard => self.render_keyboard(ui),
                    ActiveTab::Mouse => self.render_mouse(ui),
                }
                ui.add_space(8.0);
                self.render_timeline(ui);
            });

        self.schedule_repaint(ctx, now);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}
