//! Native chatter viewer
//!
//! Run with: cargo run --features native --bin chatter-scope

use chatter_scope::app::ChatterApp;
use chatter_scope::config::Config;
use eframe::egui;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> eframe::Result {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chatter_scope=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = Config::from_env();
    info!(
        window_ms = config.timeline.window_ms,
        tick_ms = config.tick_ms,
        "Starting chatter-scope"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("chatter-scope")
            .with_inner_size([1000.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "chatter-scope",
        options,
        Box::new(move |cc| Ok(Box::new(ChatterApp::new(cc, config)))),
    )
}
