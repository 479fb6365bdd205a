//! Top-level run loop.
//!
//! `run()` wires a hand source and a control sink to the engine, then ticks
//! the driver at a fixed cadence until the stop flag is raised or a scripted
//! source runs out.  Source and sink selection happens here; everything per
//! frame lives in [`crate::driver::LoopDriver`].

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hand_pose::HandSource;
use pinch_engine::{EngineConfig, EngineState, GestureEngine};
use volume_sink::midi::open_midi_sink;
use volume_sink::{ControlSink, NullSink};

#[cfg(not(feature = "leap"))]
use hand_pose::sim::SimHandSource;
#[cfg(feature = "leap")]
use hand_pose::leap::LeapHandSource;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
pub struct AppConfig {
    pub engine: EngineConfig,
    /// Target frame cadence.
    pub frame_interval: Duration,
    /// MIDI channel for the CC sink.
    pub midi_channel: u8,
    /// Open a real MIDI sink; `false` routes commands to the null sink.
    pub use_midi: bool,
    /// Simulation script length (ignored in hardware mode).
    pub sim_frames: usize,
    /// Simulation sweep peak ratio (ignored in hardware mode).
    pub sim_max_ratio: f32,
    /// Print a live status line while running.
    pub echo_status: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            engine: EngineConfig::default(),
            frame_interval: Duration::from_millis(33), // ~30 fps camera cadence
            midi_channel: 0,
            use_midi: true,
            sim_frames: 240,
            sim_max_ratio: 1.8,
            echo_status: true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RunSummary
// ════════════════════════════════════════════════════════════════════════════

/// Counters reported once the loop ends.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames_without_hand: u64,
    pub sink_errors: u64,
    pub commands_dropped: u64,
    pub final_state: EngineState,
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full control loop until `stop` is raised or the source is
/// exhausted.
///
/// This is the entry point called from `main.rs`.  The sink is acquired
/// once and reused across ticks; when no MIDI port can be opened the loop
/// still runs, with commands going to the null sink.
pub fn run(cfg: AppConfig, stop: Arc<AtomicBool>) -> anyhow::Result<RunSummary> {
    let engine = GestureEngine::new(cfg.engine);

    let sink: Box<dyn ControlSink> = if cfg.use_midi {
        open_midi_sink(cfg.midi_channel)
    } else {
        Box::new(NullSink)
    };

    #[cfg(feature = "leap")]
    let source = LeapHandSource::open().map_err(anyhow::Error::msg)?;

    #[cfg(not(feature = "leap"))]
    let source = SimHandSource::sweep(cfg.sim_frames, cfg.sim_max_ratio);

    let driver = crate::driver::LoopDriver::new(source, engine, sink);
    Ok(drive(driver, stop, cfg.frame_interval, cfg.echo_status))
}

/// Tick the driver until stopped or exhausted.  Split from [`run`] so tests
/// can drive an arbitrary source/sink pair without sleeping.
pub(crate) fn drive<S: HandSource, C: ControlSink>(
    mut driver: crate::driver::LoopDriver<S, C>,
    stop: Arc<AtomicBool>,
    frame_interval: Duration,
    echo_status: bool,
) -> RunSummary {
    while !stop.load(Ordering::Relaxed) && !driver.source_exhausted() {
        let state = driver.tick();

        if echo_status {
            print!(
                "\r  ratio {:>5.2}   volume {:>3}%   {:<8}",
                state.ratio,
                state.volume,
                if state.muted { "MUTED" } else { "active" }
            );
            io::stdout().flush().ok();
        }

        if !frame_interval.is_zero() {
            thread::sleep(frame_interval);
        }
    }

    if echo_status {
        println!();
    }

    RunSummary {
        ticks: driver.ticks(),
        frames_without_hand: driver.frames_without_hand(),
        sink_errors: driver.sink_errors(),
        commands_dropped: driver.commands_dropped(),
        final_state: driver.state(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::LoopDriver;
    use hand_pose::sim::SimHandSource;
    use volume_sink::SimSink;

    fn summary_for(script: Vec<Option<f32>>) -> RunSummary {
        let driver = LoopDriver::new(
            SimHandSource::from_script(script),
            GestureEngine::new(EngineConfig::default()),
            SimSink::default(),
        );
        drive(
            driver,
            Arc::new(AtomicBool::new(false)),
            Duration::ZERO,
            false,
        )
    }

    #[test]
    fn drive_runs_script_to_exhaustion() {
        let summary = summary_for(vec![Some(1.0), None, Some(0.05)]);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.frames_without_hand, 1);
        assert_eq!(summary.sink_errors, 0);
        assert!(summary.final_state.muted);
    }

    #[test]
    fn stop_flag_halts_before_first_tick() {
        let driver = LoopDriver::new(
            SimHandSource::hold(1.0, 100),
            GestureEngine::new(EngineConfig::default()),
            SimSink::default(),
        );
        let stop = Arc::new(AtomicBool::new(true));
        let summary = drive(driver, stop, Duration::ZERO, false);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn default_config_is_the_original_tuning() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.engine.pinch_threshold, 0.15);
        assert_eq!(cfg.engine.max_ratio, 1.5);
        assert_eq!(cfg.engine.smoothing_step, 3);
        assert_eq!(cfg.engine.unmute_margin, 0.0);
    }

    #[test]
    fn sweep_summary_ends_open_handed() {
        let driver = LoopDriver::new(
            SimHandSource::sweep(60, 1.8),
            GestureEngine::new(EngineConfig::default()),
            SimSink::default(),
        );
        let summary = drive(
            driver,
            Arc::new(AtomicBool::new(false)),
            Duration::ZERO,
            false,
        );
        assert_eq!(summary.ticks, 60);
        // the raised-cosine sweep closes mid-script and reopens at the end
        assert!(!summary.final_state.muted);
        assert!(summary.final_state.volume > 50);
    }
}
