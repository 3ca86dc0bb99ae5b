//! Keyboard and mouse panels: one tile per key, coloured by status

use eframe::egui;

use super::ChatterApp;
use crate::core::{KeyStatus, MouseButton};
use crate::theme::{colors, status_fill, status_text};

const TILE: egui::Vec2 = egui::vec2(72.0, 36.0);

fn status_tile(ui: &mut egui::Ui, label: &str, status: KeyStatus, size: egui::Vec2) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 6.0, status_fill(status));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::monospace(12.0),
        status_text(status),
    );
}

impl ChatterApp {
    pub(crate) fn render_keyboard(&self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Keyboard").color(colors::TEXT_SECONDARY));

        let keys: Vec<&str> = self.session.ever_pressed().collect();
        if keys.is_empty() {
            ui.label(
                egui::RichText::new("Press any key to start capturing").color(colors::TEXT_MUTED),
            );
            return;
        }

        ui.horizontal_wrapped(|ui| {
            for key in keys {
                status_tile(ui, key, self.session.status(key), TILE);
            }
        });
    }

    pub(crate) fn render_mouse(&self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Mouse").color(colors::TEXT_SECONDARY));

        ui.horizontal(|ui| {
            for button in MouseButton::PRIMARY {
                let status = self.session.status(&button.key());
                status_tile(ui, button.label(), status, egui::vec2(120.0, 80.0));
            }
        });
    }
}
