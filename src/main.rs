//! Headless replay of scripted input through the chatter pipeline
//!
//! Run with: cargo run --features cli --bin chatter-cli -- bounce.jsonl --out frame.ppm
//!
//! Reads a JSON-lines script (file or `-` for stdin), plays it back in real
//! time through the capture filter, session and timeline exactly as the
//! viewer would, logs periodic stats and optionally writes the final frame.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use chatter_scope::config::Config;
use clap::Parser;
use chatter_scope::core::events::parse_mouse_key;
use chatter_scope::core::{
    rasterize, Action, AnimationScheduler, CaptureFilter, CaptureSignal, Housekeeping,
    ScriptStep, Session, Timeline,
};
use chatter_scope::time::now_millis;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Replay a JSON-lines input script through the chatter timeline
#[derive(Parser, Debug)]
#[command(name = "chatter-cli", about = "Replay scripted input through the chatter timeline")]
struct Args {
    /// Script file; `-` or omitted reads stdin
    script: Option<PathBuf>,

    /// Write the final frame as a binary PPM
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl Args {
    fn script_path(&self) -> Option<&PathBuf> {
        self.script.as_ref().filter(|path| path.as_os_str() != "-")
    }
}

fn read_script(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Feed one script step through the capture filter
fn apply_step(capture: &mut CaptureFilter, step: &ScriptStep, at: f64) -> Option<CaptureSignal> {
    match (parse_mouse_key(&step.key), step.pressed) {
        (Some(button), true) => Some(capture.mouse_down(button, at)),
        (Some(button), false) => Some(capture.mouse_up(button, at)),
        (None, true) => capture.key_down(&step.key, false, at),
        (None, false) => capture.key_up(&step.key, at),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chatter_scope=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::from_env();
    let text = read_script(args.script_path())?;
    let steps = chatter_scope::core::parse_script(&text);
    if steps.is_empty() {
        warn!("Script has no playable steps");
    }
    info!(steps = steps.len(), "Script loaded");

    let mut session = Session::new(config.session_policy());
    let mut capture = CaptureFilter::new(config.simulated_hold_ms);
    let mut timeline = Timeline::new(config.timeline);
    let mut scheduler = AnimationScheduler::new(config.tick_ms);
    let mut housekeeping = Housekeeping::new(config.eviction_period_ms);

    let started = Instant::now();
    let origin = now_millis();
    scheduler.mount(origin);
    housekeeping.mount(origin);

    let mut render_tick = interval(Duration::from_secs_f64(config.tick_ms / 1000.0));
    render_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut evict_tick = interval(Duration::from_secs_f64(config.eviction_period_ms / 1000.0));
    evict_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats_interval = interval(Duration::from_secs(5));

    let mut pending = steps.iter().peekable();
    let mut frames = 0u64;
    let mut events_last_interval = 0usize;

    loop {
        let next_at = pending
            .peek()
            .map(|step| started + Duration::from_secs_f64(step.at / 1000.0));

        tokio::select! {
            _ = sleep_until(next_at.unwrap_or(started)), if next_at.is_some() => {
                let elapsed = started.elapsed().as_secs_f64() * 1000.0;
                while let Some(step) = pending.next_if(|s| s.at <= elapsed) {
                    // Stamp with the scripted time so replays are reproducible
                    let at = step.timestamp(origin);
                    if let Some(signal) = apply_step(&mut capture, step, at) {
                        session.dispatch(signal.into());
                        events_last_interval += 1;
                    }
                }
            }
            _ = render_tick.tick() => {
                let now = now_millis();
                for signal in capture.poll_due(now) {
                    session.dispatch(signal.into());
                    events_last_interval += 1;
                }
                if scheduler.poll(now) {
                    timeline.render(session.buffer.as_slice(), now, false);
                    frames += 1;
                }
            }
            _ = evict_tick.tick() => {
                let now = now_millis();
                if housekeeping.poll(now) {
                    session.dispatch(Action::Evict { now });
                }
            }
            _ = stats_interval.tick() => {
                let now = now_millis();
                info!(
                    events = session.buffer.len(),
                    keys = session.active_keys(now).len(),
                    frames,
                    "/sec" = format!("{:.1}", events_last_interval as f64 / 5.0),
                    "stats"
                );
                events_last_interval = 0;
            }
        }

        if pending.peek().is_none() && capture.next_due().is_none() {
            break;
        }
    }

    let now = now_millis();
    let frame = timeline.render(session.buffer.as_slice(), now, false);
    for lane in &frame.lanes {
        info!(key = %lane.key, pulses = lane.pulses, "Lane summary");
    }
    info!(
        events = session.buffer.len(),
        lanes = frame.lanes.len(),
        frames,
        "Replay finished"
    );

    if let Some(path) = &args.out {
        let raster = rasterize(frame);
        std::fs::write(path, raster.to_ppm())?;
        info!(path = %path.display(), width = raster.width(), height = raster.height(), "Frame written");
    }

    scheduler.unmount();
    housekeeping.unmount();
    debug!("Timers released");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("chatter-cli").chain(list.iter().copied()))
    }

    #[test]
    fn parses_script_and_out() {
        let parsed = args(&["bounce.jsonl", "--out", "frame.ppm"]).unwrap();
        assert_eq!(parsed.script_path(), Some(&PathBuf::from("bounce.jsonl")));
        assert_eq!(parsed.out, Some(PathBuf::from("frame.ppm")));
    }

    #[test]
    fn accepts_equals_and_short_forms() {
        let parsed = args(&["--out=frame.ppm"]).unwrap();
        assert_eq!(parsed.out, Some(PathBuf::from("frame.ppm")));
        let parsed = args(&["-o", "frame.ppm", "bounce.jsonl"]).unwrap();
        assert_eq!(parsed.out, Some(PathBuf::from("frame.ppm")));
    }

    #[test]
    fn dash_or_nothing_reads_stdin() {
        assert!(args(&["-"]).unwrap().script_path().is_none());
        assert!(args(&[]).unwrap().script_path().is_none());
    }

    #[test]
    fn help_is_not_a_failure() {
        let err = args(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn rejects_unknown_flags_and_missing_out() {
        assert!(args(&["--fast"]).is_err());
        assert!(args(&["--out"]).is_err());
    }

    #[test]
    fn steps_route_through_capture() {
        let mut capture = CaptureFilter::default();
        let press = ScriptStep {
            at: 0.0,
            key: "Mouse0".to_string(),
            pressed: true,
        };
        assert_eq!(
            apply_step(&mut capture, &press, 5.0),
            Some(CaptureSignal::Press {
                key: "Mouse0".to_string(),
                at: 5.0
            })
        );

        let stray_up = ScriptStep {
            at: 0.0,
            key: "KeyA".to_string(),
            pressed: false,
        };
        assert_eq!(apply_step(&mut capture, &stray_up, 6.0), None);
    }
}
