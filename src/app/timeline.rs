//! Timeline canvas: paints the current `TimelineFrame` with egui shapes
//!
//! Frames are laid out in logical canvas units (`config.width` ×
//! `config.height`); the painter scales them uniformly into the panel.

use eframe::egui;

use super::ChatterApp;
use crate::core::timeline::palette;
use crate::core::TimelineFrame;
use crate::theme::{colors, rgba, timeline};

/// Logical canvas → screen mapping
struct Viewport {
    origin: egui::Pos2,
    scale: f32,
}

impl Viewport {
    fn fit(frame: &TimelineFrame, available: egui::Vec2) -> (egui::Vec2, f32) {
        let w = frame.width.max(1) as f32;
        let h = frame.height.max(1) as f32;
        let scale = (available.x / w).min(available.y / h).max(0.1);
        (egui::vec2(w * scale, h * scale), scale)
    }

    fn pos(&self, p: [f32; 2]) -> egui::Pos2 {
        self.origin + egui::vec2(p[0] * self.scale, p[1] * self.scale)
    }
}

impl ChatterApp {
    pub(crate) fn render_timeline(&self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new("Timeline")
                .color(colors::TEXT_MUTED)
                .size(14.0),
        );

        let frame = self.timeline.last_frame();
        let (size, scale) = Viewport::fit(frame, ui.available_size());
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let rect = response.rect;
        let view = Viewport {
            origin: rect.min,
            scale,
        };

        paint_frame(&painter, &view, rect, frame);
    }
}

fn paint_frame(painter: &egui::Painter, view: &Viewport, rect: egui::Rect, frame: &TimelineFrame) {
    painter.rect_filled(rect, 0.0, timeline::background());

    // Grid
    let grid = egui::Stroke::new(1.0, timeline::grid());
    for &x in &frame.vertical_grid {
        let x = rect.min.x + x * view.scale;
        painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], grid);
    }
    for &y in &frame.horizontal_grid {
        let y = rect.min.y + y * view.scale;
        painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], grid);
    }

    // Square waves
    let stroke = egui::Stroke::new(frame.trace_width * view.scale.max(0.5), timeline::trace());
    for lane in &frame.lanes {
        let points: Vec<egui::Pos2> = lane.trace.iter().map(|&p| view.pos(p)).collect();
        painter.add(egui::Shape::line(points, stroke));

        painter.text(
            view.pos(lane.label_pos),
            egui::Align2::LEFT_BOTTOM,
            &lane.label,
            egui::FontId::monospace(12.0),
            timeline::label(),
        );
    }

    if let Some(overlay) = &frame.overlay {
        painter.rect_filled(rect, 0.0, rgba(overlay.tint));
        painter.text(
            view.pos(overlay.label_pos),
            egui::Align2::CENTER_CENTER,
            overlay.label,
            egui::FontId::proportional(24.0),
            rgba(palette::PAUSE_TEXT),
        );
    }
}
