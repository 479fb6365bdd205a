//! # pinch_engine
//!
//! Pure, per-frame transformation from an optional hand pose to a mute
//! state and a quantized volume level.
//!
//! The gesture signal is the **pinch ratio**: Euclidean distance between
//! thumb tip and index tip, divided by the distance between wrist and
//! middle-finger base.  Both distances scale together with hand size and
//! camera depth, so the ratio is scale-invariant.
//!
//! | Ratio | State | Effect |
//! |---|---|---|
//! | `<= pinch_threshold` | MUTED | mute command on entry |
//! | `> pinch_threshold (+ margin)` | ACTIVE | unmute on entry, volume command every frame |
//!
//! The engine performs no I/O and never consults the clock: given the same
//! pose and configuration it always produces the same output, which is what
//! makes the state machine unit-testable frame by frame.

use hand_pose::{Hand, Landmark};

// ════════════════════════════════════════════════════════════════════════════
// EngineConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tuning constants, fixed at engine construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Mute boundary: ratios at or below this pinch the microphone shut.
    pub pinch_threshold: f32,
    /// Ratio mapped to 0% volume.
    pub min_ratio: f32,
    /// Ratio mapped to 100% volume.
    pub max_ratio: f32,
    /// Quantization granularity for the computed volume, in percent.
    pub smoothing_step: u8,
    /// Optional hysteresis band: leaving MUTED requires
    /// `ratio > pinch_threshold + unmute_margin`.  Zero reproduces the
    /// single-threshold behavior of the original controller.
    pub unmute_margin: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            pinch_threshold: 0.15,
            min_ratio: 0.15,
            max_ratio: 1.5,
            smoothing_step: 3,
            unmute_margin: 0.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PoseSample — the four control landmarks
// ════════════════════════════════════════════════════════════════════════════

/// The subset of a detected hand the engine actually reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseSample {
    pub thumb_tip: Landmark,
    pub index_tip: Landmark,
    pub wrist: Landmark,
    pub middle_base: Landmark,
}

impl PoseSample {
    /// Extract the four control landmarks by fixed index.
    /// `None` when the hand is too short to carry them.
    pub fn from_hand(hand: &Hand) -> Option<Self> {
        Some(PoseSample {
            thumb_tip: hand.thumb_tip()?,
            index_tip: hand.index_tip()?,
            wrist: hand.wrist()?,
            middle_base: hand.middle_base()?,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EngineState & ControlUpdate
// ════════════════════════════════════════════════════════════════════════════

/// Observable per-frame state, owned exclusively by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineState {
    /// Pinch ratio of the last frame; 0.0 when no hand was detected.
    pub ratio: f32,
    pub muted: bool,
    /// Quantized volume in percent, `0..=100`.
    pub volume: u8,
}

/// Commands emitted by one `process` call: at most one mute-state change
/// and at most one volume change per frame.  The consumer must apply the
/// mute change before the volume change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlUpdate {
    pub mute: Option<bool>,
    /// Target volume as a scalar in `[0, 1]`.
    pub volume: Option<f32>,
}

impl ControlUpdate {
    pub fn is_empty(&self) -> bool {
        self.mute.is_none() && self.volume.is_none()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEngine
// ════════════════════════════════════════════════════════════════════════════

/// Floor applied to the scale distance before dividing.
pub const SCALE_FLOOR: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MuteState {
    Active,
    Muted,
}

/// The per-frame gesture-to-control state machine.
#[derive(Clone, Debug)]
pub struct GestureEngine {
    config: EngineConfig,
    mute_state: MuteState,
    state: EngineState,
}

impl GestureEngine {
    pub fn new(config: EngineConfig) -> Self {
        GestureEngine {
            config,
            mute_state: MuteState::Active,
            state: EngineState::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Pinch ratio of a sample, with the scale distance floored to
    /// [`SCALE_FLOOR`] so coincident wrist/knuckle landmarks cannot blow
    /// up the division.
    pub fn ratio_of(sample: &PoseSample) -> f32 {
        let pinch = sample.thumb_tip.distance_to(&sample.index_tip);
        let scale = sample.wrist.distance_to(&sample.middle_base).max(SCALE_FLOOR);
        pinch / scale
    }

    /// One frame: optional pose in, commands out.
    ///
    /// Absent sample: ratio reads 0.0, state is otherwise unchanged, no
    /// command is emitted.
    pub fn process(&mut self, sample: Option<&PoseSample>) -> ControlUpdate {
        let mut update = ControlUpdate::default();

        let sample = match sample {
            Some(s) => s,
            None => {
                self.state.ratio = 0.0;
                return update;
            }
        };

        let ratio = Self::ratio_of(sample);
        self.state.ratio = ratio;

        if ratio <= self.config.pinch_threshold {
            if self.mute_state == MuteState::Active {
                self.mute_state = MuteState::Muted;
                self.state.muted = true;
                update.mute = Some(true);
            }
            return update;
        }

        // Inside the hysteresis band: stay muted, emit nothing.
        if self.mute_state == MuteState::Muted
            && ratio <= self.config.pinch_threshold + self.config.unmute_margin
        {
            return update;
        }

        if self.mute_state == MuteState::Muted {
            self.mute_state = MuteState::Active;
            self.state.muted = false;
            update.mute = Some(false);
        }

        let volume = self.map_volume(ratio);
        self.state.volume = volume;
        update.volume = Some(f32::from(volume) / 100.0);
        update
    }

    /// Linear interpolation of `ratio` from `[min_ratio, max_ratio]` onto
    /// `[0, 100]`, then quantization to the smoothing step.
    fn map_volume(&self, ratio: f32) -> u8 {
        let lo = self.config.min_ratio;
        let hi = self.config.max_ratio.max(lo);
        let span = (hi - lo).max(f32::EPSILON);
        let raw = (ratio.clamp(lo, hi) - lo) / span * 100.0;

        let step = f32::from(self.config.smoothing_step.max(1));
        (step * (raw / step).round()).clamp(0.0, 100.0) as u8
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::sim::synth_hand;

    /// Reference tuning: threshold 0.15, domain [0.1, 1.8], step 5.
    fn scenario_config() -> EngineConfig {
        EngineConfig {
            pinch_threshold: 0.15,
            min_ratio: 0.1,
            max_ratio: 1.8,
            smoothing_step: 5,
            unmute_margin: 0.0,
        }
    }

    fn sample(ratio: f32) -> PoseSample {
        PoseSample::from_hand(&synth_hand(ratio)).unwrap()
    }

    fn engine() -> GestureEngine {
        GestureEngine::new(scenario_config())
    }

    // ── ratio ─────────────────────────────────────────────────────────────

    #[test]
    fn ratio_recovers_scripted_value() {
        for &r in &[0.05, 0.15, 0.5, 1.0, 1.8, 2.5] {
            assert!((GestureEngine::ratio_of(&sample(r)) - r).abs() < 1e-3);
        }
    }

    #[test]
    fn coincident_scale_landmarks_use_floor() {
        let p = PoseSample {
            thumb_tip: Landmark::new(0.4, 0.5),
            index_tip: Landmark::new(0.6, 0.5),
            wrist: Landmark::new(0.5, 0.8),
            middle_base: Landmark::new(0.5, 0.8),
        };
        let ratio = GestureEngine::ratio_of(&p);
        assert!(ratio.is_finite());
        // pinch 0.2 over the floored scale 0.01
        assert!((ratio - 20.0).abs() < 1e-3);
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn pinch_below_threshold_mutes_without_volume() {
        let mut e = engine();
        let update = e.process(Some(&sample(0.05)));
        assert!(e.state().muted);
        assert_eq!(update.mute, Some(true));
        assert_eq!(update.volume, None);
    }

    #[test]
    fn mute_command_emitted_only_on_transition() {
        let mut e = engine();
        assert_eq!(e.process(Some(&sample(0.05))).mute, Some(true));
        assert_eq!(e.process(Some(&sample(0.05))).mute, None);
        assert_eq!(e.process(Some(&sample(0.04))).mute, None);
    }

    #[test]
    fn open_hand_unmutes_and_sets_volume() {
        let mut e = engine();
        e.process(Some(&sample(0.05)));
        let update = e.process(Some(&sample(1.0)));
        assert!(!e.state().muted);
        assert_eq!(update.mute, Some(false));
        assert!(update.volume.is_some());
    }

    #[test]
    fn active_frames_emit_volume_every_frame() {
        let mut e = engine();
        for _ in 0..3 {
            let update = e.process(Some(&sample(1.0)));
            assert!(update.volume.is_some());
            assert_eq!(update.mute, None); // initial state is already active
        }
    }

    #[test]
    fn threshold_boundary_is_inclusive_for_mute() {
        // Powers of two keep the float math exact at the boundary.
        let mut e = GestureEngine::new(EngineConfig {
            pinch_threshold: 0.125,
            ..scenario_config()
        });
        let p = PoseSample {
            thumb_tip: Landmark::new(0.0, 0.0),
            index_tip: Landmark::new(0.125, 0.0),
            wrist: Landmark::new(0.0, 0.0),
            middle_base: Landmark::new(1.0, 0.0),
        };
        e.process(Some(&p));
        assert!(e.state().muted);
    }

    // ── volume mapping ────────────────────────────────────────────────────

    #[test]
    fn volume_spans_zero_to_hundred() {
        let mut e = engine();
        for r in [0.2, 0.5, 0.945, 1.3, 1.8, 2.4] {
            e.process(Some(&sample(r)));
            assert!(e.state().volume <= 100);
        }
    }

    #[test]
    fn volume_is_monotonic_over_active_domain() {
        let mut e = engine();
        let mut last = 0u8;
        let mut r = 0.16;
        while r <= 1.8 {
            e.process(Some(&sample(r)));
            assert!(e.state().volume >= last, "regression at ratio {}", r);
            last = e.state().volume;
            r += 0.01;
        }
    }

    #[test]
    fn volume_is_quantized_to_step() {
        let mut e = engine();
        let mut r = 0.16;
        while r <= 2.0 {
            e.process(Some(&sample(r)));
            let v = e.state().volume;
            assert!(
                v == 0 || v == 100 || v % 5 == 0,
                "volume {} at ratio {}",
                v,
                r
            );
            r += 0.013;
        }
    }

    #[test]
    fn ratio_above_domain_clamps_to_full_volume() {
        let mut e = engine();
        let update = e.process(Some(&sample(2.5)));
        assert_eq!(e.state().volume, 100);
        assert_eq!(update.volume, Some(1.0));
    }

    // ── end-to-end scenarios ──────────────────────────────────────────────

    #[test]
    fn deep_pinch_emits_no_volume_command() {
        let mut e = engine();
        let update = e.process(Some(&sample(0.05)));
        assert!(e.state().muted);
        assert_eq!(update.volume, None);
    }

    #[test]
    fn min_ratio_maps_to_zero_volume() {
        // Threshold below the interpolation domain so that min_ratio is an
        // active frame.
        let mut e = GestureEngine::new(EngineConfig {
            pinch_threshold: 0.05,
            ..scenario_config()
        });
        let update = e.process(Some(&sample(0.1)));
        assert!(!e.state().muted);
        assert_eq!(e.state().volume, 0);
        assert_eq!(update.volume, Some(0.0));
    }

    #[test]
    fn max_ratio_maps_to_full_volume() {
        let mut e = engine();
        e.process(Some(&sample(1.8)));
        assert!(!e.state().muted);
        assert_eq!(e.state().volume, 100);
    }

    #[test]
    fn domain_midpoint_maps_to_half_volume() {
        let mut e = engine();
        e.process(Some(&sample(0.95)));
        assert_eq!(e.state().volume, 50);
        e.process(Some(&sample(0.945)));
        assert_eq!(e.state().volume, 50);
    }

    #[test]
    fn no_hand_reports_zero_ratio_and_no_command() {
        let mut e = engine();
        e.process(Some(&sample(1.0)));
        let before = e.state();
        let update = e.process(None);
        assert!(update.is_empty());
        assert_eq!(e.state().ratio, 0.0);
        assert_eq!(e.state().muted, before.muted);
        assert_eq!(e.state().volume, before.volume);
    }

    // ── determinism ───────────────────────────────────────────────────────

    #[test]
    fn identical_active_frames_yield_identical_output() {
        let mut e = engine();
        let s = sample(0.9);
        let first = e.process(Some(&s));
        let second = e.process(Some(&s));
        assert_eq!(first, second);
        assert_eq!(first, e.clone().process(Some(&s)));
    }

    #[test]
    fn identical_muted_frames_yield_identical_output() {
        let mut e = engine();
        e.process(Some(&sample(0.05)));
        let s = sample(0.05);
        assert_eq!(e.process(Some(&s)), e.process(Some(&s)));
    }

    // ── hysteresis margin ─────────────────────────────────────────────────

    #[test]
    fn ratio_inside_margin_band_stays_muted() {
        let mut e = GestureEngine::new(EngineConfig {
            unmute_margin: 0.1,
            ..scenario_config()
        });
        e.process(Some(&sample(0.05)));
        let update = e.process(Some(&sample(0.2))); // 0.15 < 0.2 <= 0.25
        assert!(e.state().muted);
        assert!(update.is_empty());
    }

    #[test]
    fn ratio_above_margin_band_unmutes() {
        let mut e = GestureEngine::new(EngineConfig {
            unmute_margin: 0.1,
            ..scenario_config()
        });
        e.process(Some(&sample(0.05)));
        let update = e.process(Some(&sample(0.3)));
        assert!(!e.state().muted);
        assert_eq!(update.mute, Some(false));
    }

    #[test]
    fn margin_does_not_gate_frames_that_never_muted() {
        let mut e = GestureEngine::new(EngineConfig {
            unmute_margin: 0.1,
            ..scenario_config()
        });
        let update = e.process(Some(&sample(0.2)));
        assert!(!e.state().muted);
        assert!(update.volume.is_some());
    }

    // ── short hands ───────────────────────────────────────────────────────

    #[test]
    fn short_hand_yields_no_sample() {
        let hand = Hand::new(vec![Landmark::default(); 9]);
        assert!(PoseSample::from_hand(&hand).is_none());
    }
}
