//! The per-tick loop driver.
//!
//! `LoopDriver` owns the three collaborators and sequences exactly one
//! provider query, one engine computation, and one sink update per tick.
//! It owns no control logic: what to do lives in the engine, the driver
//! decides only when and in what order writes reach the sink.

use hand_pose::HandSource;
use pinch_engine::{ControlUpdate, EngineState, GestureEngine, PoseSample};
use volume_sink::{apply_update, ControlSink};

// ════════════════════════════════════════════════════════════════════════════
// LoopDriver
// ════════════════════════════════════════════════════════════════════════════

pub struct LoopDriver<S: HandSource, C: ControlSink> {
    source: S,
    engine: GestureEngine,
    sink: C,

    // ── counters ─────────────────────────────────────────────────────────
    ticks: u64,
    frames_without_hand: u64,
    sink_errors: u64,
    commands_dropped: u64,
}

impl<S: HandSource, C: ControlSink> LoopDriver<S, C> {
    pub fn new(source: S, engine: GestureEngine, sink: C) -> Self {
        LoopDriver {
            source,
            engine,
            sink,
            ticks: 0,
            frames_without_hand: 0,
            sink_errors: 0,
            commands_dropped: 0,
        }
    }

    /// One frame: query the source, run the engine, apply the update.
    ///
    /// Sink interaction is best-effort — a failed write drops this frame's
    /// commands and the loop carries on.  The returned state reflects the
    /// engine's intent, not necessarily sink reality.
    pub fn tick(&mut self) -> EngineState {
        self.ticks += 1;

        let hand = self.source.next_hand();
        let sample = hand.as_ref().and_then(PoseSample::from_hand);
        if sample.is_none() {
            self.frames_without_hand += 1;
        }

        let mut update = self.engine.process(sample.as_ref());

        if sample.is_some() {
            self.reconcile_mute(&mut update);
        }

        if !update.is_empty() {
            if let Err(e) = apply_update(&mut self.sink, &update) {
                self.sink_errors += 1;
                self.commands_dropped += 1;
                log::warn!("sink write failed, command dropped: {}", e);
            }
        }

        self.engine.state()
    }

    /// Re-assert the engine's mute intent when the sink drifted.
    ///
    /// An external actor may mute or unmute the endpoint behind our back;
    /// whenever a hand is in frame, a disagreement between the sink's mute
    /// flag and the engine's is resolved in the engine's favor, even
    /// without a state transition this frame.
    fn reconcile_mute(&mut self, update: &mut ControlUpdate) {
        if update.mute.is_some() {
            return; // a transition this frame already carries the intent
        }
        match self.sink.get_mute() {
            Ok(actual) if actual != self.engine.state().muted => {
                log::debug!(
                    "sink mute drifted to {}, re-asserting {}",
                    actual,
                    self.engine.state().muted
                );
                update.mute = Some(self.engine.state().muted);
            }
            Ok(_) => {}
            Err(e) => {
                self.sink_errors += 1;
                log::debug!("sink mute query failed: {}", e);
            }
        }
    }

    // ── Accessors for the run loop and presentation ──────────────────────

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn source_exhausted(&self) -> bool {
        self.source.exhausted()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames_without_hand(&self) -> u64 {
        self.frames_without_hand
    }

    pub fn sink_errors(&self) -> u64 {
        self.sink_errors
    }

    pub fn commands_dropped(&self) -> u64 {
        self.commands_dropped
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut C {
        &mut self.sink
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::sim::SimHandSource;
    use pinch_engine::EngineConfig;
    use volume_sink::{SimSink, SinkOp};

    fn config() -> EngineConfig {
        EngineConfig {
            pinch_threshold: 0.15,
            min_ratio: 0.1,
            max_ratio: 1.8,
            smoothing_step: 5,
            unmute_margin: 0.0,
        }
    }

    fn driver(script: Vec<Option<f32>>, sink: SimSink) -> LoopDriver<SimHandSource, SimSink> {
        LoopDriver::new(
            SimHandSource::from_script(script),
            GestureEngine::new(config()),
            sink,
        )
    }

    #[test]
    fn open_hand_sets_sink_volume() {
        let mut d = driver(vec![Some(1.8)], SimSink::default());
        let state = d.tick();
        assert!(!state.muted);
        assert_eq!(state.volume, 100);
        assert!((d.sink().volume() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pinch_mutes_the_sink() {
        let mut d = driver(vec![Some(1.0), Some(0.05)], SimSink::default());
        d.tick();
        let state = d.tick();
        assert!(state.muted);
        assert!(d.sink().muted());
    }

    #[test]
    fn unmute_write_precedes_volume_write() {
        let mut d = driver(vec![Some(0.05), Some(1.0)], SimSink::default());
        d.tick(); // mute
        d.tick(); // unmute + volume
        let ops = &d.sink().ops;
        assert_eq!(ops[ops.len() - 2], SinkOp::SetMute(false));
        assert!(matches!(ops[ops.len() - 1], SinkOp::SetVolume(_)));
    }

    #[test]
    fn no_hand_frames_are_counted_not_errors() {
        let mut d = driver(vec![None, None, Some(1.0)], SimSink::default());
        d.tick();
        let state = d.tick();
        assert_eq!(state.ratio, 0.0);
        d.tick();
        assert_eq!(d.frames_without_hand(), 2);
        assert_eq!(d.sink_errors(), 0);
        assert_eq!(d.ticks(), 3);
    }

    #[test]
    fn no_hand_emits_no_sink_write() {
        let mut d = driver(vec![None, None], SimSink::default());
        d.tick();
        d.tick();
        assert!(d.sink().ops.is_empty());
    }

    #[test]
    fn sink_failure_drops_command_and_loop_survives() {
        let mut sink = SimSink::default();
        sink.fail_next(2); // get_mute probe + set_volume both fail
        let mut d = driver(vec![Some(1.0), Some(1.0)], sink);

        let state = d.tick();
        assert_eq!(state.volume, 100); // engine intent survives the drop
        assert_eq!(d.commands_dropped(), 1);
        assert!(d.sink_errors() >= 1);

        d.tick(); // sink recovered
        assert!((d.sink().volume() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn external_mute_is_reverted_while_active() {
        let mut sink = SimSink::default();
        sink.set_mute(true).unwrap(); // external actor muted the endpoint
        sink.ops.clear();
        let mut d = driver(vec![Some(1.0)], sink);

        d.tick();
        assert!(!d.sink().muted());
        assert_eq!(d.sink().ops[0], SinkOp::SetMute(false));
    }

    #[test]
    fn external_unmute_is_reverted_while_muted() {
        let mut d = driver(vec![Some(0.05), Some(0.04)], SimSink::default());
        d.tick(); // transition into MUTED
        assert!(d.sink().muted());

        d.sink_mut().set_mute(false).unwrap(); // external actor
        d.sink_mut().ops.clear();

        d.tick(); // steady pinch, no transition — the drift probe re-asserts
        assert!(d.sink().muted());
        assert_eq!(d.sink().ops, vec![SinkOp::SetMute(true)]);
    }

    #[test]
    fn agreeing_sink_gets_no_redundant_mute_write() {
        let mut d = driver(vec![Some(0.05), Some(0.04)], SimSink::default());
        d.tick();
        d.sink_mut().ops.clear();
        d.tick(); // steady pinch, sink already muted → no write at all
        assert!(d.sink().ops.is_empty());
    }

    #[test]
    fn steady_active_frames_rewrite_volume_only() {
        let mut d = driver(vec![Some(1.0), Some(1.0), Some(1.0)], SimSink::default());
        d.tick();
        d.tick();
        d.tick();
        assert!(d
            .sink()
            .ops
            .iter()
            .all(|op| matches!(op, SinkOp::SetVolume(_))));
        assert_eq!(d.sink().ops.len(), 3);
    }

    #[test]
    fn muted_frames_leave_volume_untouched() {
        let mut d = driver(vec![Some(1.8), Some(0.05), Some(0.05)], SimSink::default());
        d.tick();
        let volume_before = d.sink().volume();
        d.tick();
        d.tick();
        assert_eq!(d.sink().volume(), volume_before);
        assert!(d.sink().muted());
    }

    #[test]
    fn exhaustion_tracks_the_script() {
        let mut d = driver(vec![Some(1.0)], SimSink::default());
        assert!(!d.source_exhausted());
        d.tick();
        assert!(d.source_exhausted());
    }
}
