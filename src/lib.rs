//! chatter-scope - live keyboard/mouse chatter timeline
//!
//! Captures press/release transitions with millisecond timestamps, keeps a
//! rolling window of history and renders one square-wave lane per key so
//! switch bounce shows up as extra pulses.
//!
//! - `core`: event buffer, state reconstruction, timeline, scheduling
//! - `app`: egui viewer shared by the native and WASM builds
//! - `chatter-cli`: headless replay of scripted input

pub mod config;
pub mod core;
pub mod time;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod theme;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web {
    use tracing::info;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::ChatterApp;
    use crate::config::Config;

    /// Page globals act as the environment: `window.CHATTER_WINDOW_MS = "5000"`,
    /// with the JSON document under `window.__chatter_config`
    fn window_var(name: &str) -> Option<String> {
        let window = web_sys::window()?;
        let global = match name {
            "CHATTER_CONFIG" => "__chatter_config",
            other => other,
        };
        js_sys::Reflect::get(&window, &JsValue::from_str(global))
            .ok()
            .and_then(|v| v.as_string())
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let config = Config::from_lookup(window_var);
        info!(window_ms = config.timeline.window_ms, "Starting chatter-scope");

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async move {
            let canvas = web_sys::window()
                .expect("no window")
                .document()
                .expect("no document")
                .get_element_by_id("canvas")
                .expect("no canvas element")
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .expect("not a canvas element");

            eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(move |cc| Ok(Box::new(ChatterApp::new(cc, config)))),
                )
                .await
                .expect("Failed to start eframe");
        });
    }
}
