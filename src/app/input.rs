//! egui input → capture filter → session
//!
//! Key events carry layout-independent codes (`KeyA`, `Digit1`, `Space`).
//! egui has no key events for modifiers, so those are diffed per frame.

use eframe::egui;
use tracing::trace;

use super::ChatterApp;
use crate::core::{suppresses_default, CaptureSignal, MouseButton};

/// Physical code for an egui key, in DOM `KeyboardEvent.code` form
pub(crate) fn key_code(key: egui::Key) -> String {
    let name = format!("{key:?}");
    match name.as_str() {
        "OpenBracket" => "BracketLeft".to_string(),
        "CloseBracket" => "BracketRight".to_string(),
        "Backtick" => "Backquote".to_string(),
        "Equals" => "Equal".to_string(),
        n if n.len() == 1 && n.chars().all(|c| c.is_ascii_alphabetic()) => format!("Key{n}"),
        n if n.len() == 4 && n.starts_with("Num") => format!("Digit{}", &n[3..]),
        _ => name,
    }
}

pub(crate) fn button_index(button: egui::PointerButton) -> u16 {
    match button {
        egui::PointerButton::Primary => MouseButton::Left.index(),
        egui::PointerButton::Middle => MouseButton::Middle.index(),
        egui::PointerButton::Secondary => MouseButton::Right.index(),
        egui::PointerButton::Extra1 => 3,
        egui::PointerButton::Extra2 => 4,
    }
}

/// Modifier transitions between two frames, as (code, pressed)
///
/// egui reports modifiers without a side, so they map to the left-hand
/// codes. The logo key is only visible on macOS (`mac_cmd`); elsewhere egui
/// folds it away and `command` mirrors Control.
pub(crate) fn modifier_changes(
    prev: egui::Modifiers,
    next: egui::Modifiers,
) -> Vec<(&'static str, bool)> {
    [
        ("ShiftLeft", prev.shift, next.shift),
        ("ControlLeft", prev.ctrl, next.ctrl),
        ("AltLeft", prev.alt, next.alt),
        ("MetaLeft", prev.mac_cmd, next.mac_cmd),
    ]
    .into_iter()
    .filter(|(_, before, after)| before != after)
    .map(|(code, _, after)| (code, after))
    .collect()
}

impl ChatterApp {
    pub(crate) fn capture_input(&mut self, ctx: &egui::Context, now: f64) {
        let (events, modifiers) = ctx.input(|i| (i.events.clone(), i.modifiers));

        let mut signals: Vec<CaptureSignal> = Vec::new();
        for event in &events {
            match event {
                egui::Event::Key {
                    key,
                    physical_key,
                    pressed,
                    repeat,
                    ..
                } => {
                    let code = key_code(physical_key.unwrap_or(*key));
                    let signal = if *pressed {
                        self.capture.key_down(&code, *repeat, now)
                    } else {
                        self.capture.key_up(&code, now)
                    };
                    signals.extend(signal);
                }
                egui::Event::PointerButton {
                    button, pressed, ..
                } => {
                    let index = button_index(*button);
                    signals.push(if *pressed {
                        self.capture.mouse_down(index, now)
                    } else {
                        self.capture.mouse_up(index, now)
                    });
                }
                _ => {}
            }
        }

        for (code, pressed) in modifier_changes(self.prev_modifiers, modifiers) {
            let signal = if pressed {
                self.capture.key_down(code, false, now)
            } else {
                self.capture.key_up(code, now)
            };
            signals.extend(signal);
        }
        self.prev_modifiers = modifiers;

        for signal in signals {
            trace!(key = signal.key(), "Captured");
            self.session.dispatch(signal.into());
        }

        // Keep captured keys away from widgets (Space/Enter/Tab focus)
        ctx.input_mut(|i| {
            i.events.retain(|event| match event {
                egui::Event::Key {
                    key, physical_key, ..
                } => !suppresses_default(&key_code(physical_key.unwrap_or(*key))),
                _ => true,
            })
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_match_dom_names() {
        assert_eq!(key_code(egui::Key::A), "KeyA");
        assert_eq!(key_code(egui::Key::Num7), "Digit7");
        assert_eq!(key_code(egui::Key::Space), "Space");
        assert_eq!(key_code(egui::Key::ArrowLeft), "ArrowLeft");
        assert_eq!(key_code(egui::Key::F5), "F5");
        assert_eq!(key_code(egui::Key::OpenBracket), "BracketLeft");
        assert_eq!(key_code(egui::Key::Backtick), "Backquote");
    }

    #[test]
    fn backquote_keeps_default_handling() {
        assert!(!suppresses_default(&key_code(egui::Key::Backtick)));
        assert!(suppresses_default(&key_code(egui::Key::Space)));
    }

    #[test]
    fn pointer_buttons_follow_dom_numbering() {
        assert_eq!(button_index(egui::PointerButton::Primary), 0);
        assert_eq!(button_index(egui::PointerButton::Middle), 1);
        assert_eq!(button_index(egui::PointerButton::Secondary), 2);
    }

    #[test]
    fn modifier_diff_reports_edges_only() {
        let none = egui::Modifiers::NONE;
        let shift = egui::Modifiers::SHIFT;
        assert_eq!(modifier_changes(none, shift), vec![("ShiftLeft", true)]);
        assert_eq!(modifier_changes(shift, shift), vec![]);
        assert_eq!(modifier_changes(shift, none), vec![("ShiftLeft", false)]);
    }

    #[test]
    fn command_alias_does_not_double_control() {
        // Non-mac platforms set `command` alongside `ctrl`
        let ctrl = egui::Modifiers {
            ctrl: true,
            command: true,
            ..egui::Modifiers::NONE
        };
        assert_eq!(
            modifier_changes(egui::Modifiers::NONE, ctrl),
            vec![("ControlLeft", true)]
        );
    }

    #[test]
    fn mac_command_is_meta() {
        let cmd = egui::Modifiers {
            mac_cmd: true,
            command: true,
            ..egui::Modifiers::NONE
        };
        let changes = modifier_changes(egui::Modifiers::NONE, cmd);
        assert_eq!(changes, vec![("MetaLeft", true)]);
        assert!(!suppresses_default(changes[0].0), "MetaLeft keeps platform handling");
    }
}
