//! Scrolling log of the most recent transitions

use eframe::egui;

use super::ChatterApp;
use crate::core::log::{direction, format_clock, recent};
use crate::theme::colors;

impl ChatterApp {
    pub(crate) fn render_event_log(&self, ui: &mut egui::Ui) {
        let rows = recent(self.session.buffer.as_slice(), self.config.event_log_limit);

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Event Log").color(colors::TEXT_SECONDARY));
            ui.label(
                egui::RichText::new(format!("last {}", rows.len())).color(colors::TEXT_MUTED),
            );
        });

        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for event in &rows {
                    let color = if event.is_pressed { colors::DOWN } else { colors::UP };
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format_clock(self.epoch + event.timestamp))
                                .monospace()
                                .color(colors::TEXT_MUTED),
                        );
                        ui.label(egui::RichText::new(&event.key).monospace());
                        ui.label(
                            egui::RichText::new(direction(event))
                                .monospace()
                                .color(color),
                        );
                    });
                }
            });
    }
}
