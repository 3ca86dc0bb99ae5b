//! Header bar with controls, tabs, and status

use eframe::egui;

use super::{ActiveTab, ChatterApp};
use crate::theme::colors;
use crate::time::now_millis;

impl ChatterApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui, now: f64) {
        self.fps_counter.tick();

        let paused = self.session.is_paused();
        let event_count = self.session.buffer.len();
        let active = self.session.active_keys(now).len();

        ui.horizontal(|ui| {
            // LEFT: Pause/Reset, then the device tabs
            let pause_text = if paused { "Resume" } else { "Pause" };
            let pause = egui::Button::new(egui::RichText::new(pause_text).color(colors::TEXT_PRIMARY))
                .fill(colors::BUTTON_PAUSE);
            if ui.add(pause).clicked() {
                self.toggle_pause(now);
            }

            let reset = egui::Button::new(egui::RichText::new("Reset").color(colors::TEXT_PRIMARY))
                .fill(colors::BUTTON_RESET);
            if ui.add(reset).clicked() {
                self.reset(now);
            }

            ui.add_space(10.0);

            const TABS: &[(ActiveTab, &str)] = &[
                (ActiveTab::Keyboard, "Keyboard"),
                (ActiveTab::Mouse, "Mouse"),
            ];

            for &(tab, label) in TABS {
                let color = if self.active_tab == tab {
                    colors::TEXT_PRIMARY
                } else {
                    colors::TEXT_MUTED
                };

                if ui
                    .selectable_label(
                        self.active_tab == tab,
                        egui::RichText::new(label).color(color),
                    )
                    .clicked()
                {
                    self.active_tab = tab;
                }
            }

            // RIGHT: Status and stats (right-to-left order)
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("{} events", event_count))
                        .color(colors::TEXT_MUTED),
                );
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                ui.label(
                    egui::RichText::new(format!("{} keys", active)).color(colors::TEXT_MUTED),
                );
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                ui.label(
                    egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                        .color(colors::TEXT_SECONDARY),
                );

                ui.add_space(10.0);

                let (status_color, status_text) = if paused {
                    (colors::UP, "Paused")
                } else {
                    (colors::DOWN, "Live")
                };
                ui.colored_label(status_color, egui::RichText::new(status_text));
            });
        });
    }
}

/// FPS counter using platform-agnostic time
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    pub fn tick(&mut self) {
        self.push(now_millis());
    }

    fn push(&mut self, at: f64) {
        self.frames.push(at);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed == 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
