//! Dark slate theme shared by every viewer panel

use egui::Color32;

use crate::core::timeline::palette;
use crate::core::KeyStatus;

/// Slate palette with three status accents
pub mod colors {
    use super::Color32;

    // === Backgrounds ===
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);    // #111827
    pub const BG_PANEL: Color32 = Color32::from_rgb(31, 41, 55);      // #1F2937
    pub const BG_HOVER: Color32 = Color32::from_rgb(55, 65, 81);      // #374151

    // === Text ===
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(243, 244, 246);   // #F3F4F6
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 163, 175); // #9CA3AF
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(107, 114, 128);     // #6B7280

    pub const BORDER: Color32 = Color32::from_rgb(55, 65, 81);

    // === Key status ===
    pub const KEY_IS: Color32 = Color32::from_rgb(250, 204, 21);    // #FACC15
    pub const KEY_WAS: Color32 = Color32::from_rgb(13, 148, 136);   // #0D9488
    pub const KEY_NEVER: Color32 = Color32::from_rgb(75, 85, 99);   // #4B5563

    // === Event log ===
    pub const DOWN: Color32 = Color32::from_rgb(74, 222, 128);      // #4ADE80
    pub const UP: Color32 = Color32::from_rgb(248, 113, 113);       // #F87171

    // === Controls ===
    pub const BUTTON_PAUSE: Color32 = Color32::from_rgb(37, 99, 235);  // #2563EB
    pub const BUTTON_RESET: Color32 = Color32::from_rgb(220, 38, 38);  // #DC2626
}

/// Engine RGBA → egui colour
pub fn rgba(c: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// Timeline colours, same values the CPU raster uses
pub mod timeline {
    use super::{palette, rgba, Color32};

    pub fn background() -> Color32 {
        rgba(palette::BACKGROUND)
    }
    pub fn grid() -> Color32 {
        rgba(palette::GRID)
    }
    pub fn label() -> Color32 {
        rgba(palette::LABEL)
    }
    pub fn trace() -> Color32 {
        rgba(palette::TRACE)
    }
}

/// Tile fill for a key's tri-state status
pub fn status_fill(status: KeyStatus) -> Color32 {
    match status {
        KeyStatus::Is => colors::KEY_IS,
        KeyStatus::Was => colors::KEY_WAS,
        KeyStatus::Never => colors::KEY_NEVER,
    }
}

/// Text colour readable on top of `status_fill`
pub fn status_text(status: KeyStatus) -> Color32 {
    match status {
        KeyStatus::Is => colors::BG_PRIMARY,
        KeyStatus::Was | KeyStatus::Never => colors::TEXT_PRIMARY,
    }
}

/// Flat dark egui Visuals
pub fn minimal_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.faint_bg_color = BG_PANEL;

    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_PRIMARY;
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    visuals.widgets.inactive.bg_fill = BG_PANEL;
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.weak_bg_fill = BG_PANEL;

    visuals.widgets.hovered.bg_fill = BG_HOVER;
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.hovered.weak_bg_fill = BG_HOVER;

    visuals.widgets.active.bg_fill = BG_HOVER;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.active.weak_bg_fill = BG_HOVER;

    visuals.selection.bg_fill = BG_HOVER;
    visuals.selection.stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colours_are_distinct() {
        let fills = [
            status_fill(KeyStatus::Never),
            status_fill(KeyStatus::Was),
            status_fill(KeyStatus::Is),
        ];
        assert_ne!(fills[0], fills[1]);
        assert_ne!(fills[1], fills[2]);
        assert_ne!(fills[0], fills[2]);
    }

    #[test]
    fn timeline_colours_follow_engine_palette() {
        assert_eq!(timeline::background(), Color32::from_rgb(0x1f, 0x29, 0x37));
        assert_eq!(timeline::trace(), Color32::from_rgb(0x10, 0xb9, 0x81));
    }
}
