//! Simulated hand source — deterministic, scripted pinch trajectories.
//!
//! A script is a sequence of per-frame entries: `Some(ratio)` synthesizes a
//! full 21-point hand whose control landmarks reproduce the requested
//! pinch/scale ratio exactly; `None` is a frame with no hand detected.
//! Because the geometry is synthesized, downstream ratio computations recover
//! the scripted value to float precision, which makes end-to-end loop tests
//! deterministic.

use crate::{Hand, Landmark, INDEX_TIP, LANDMARK_COUNT, MIDDLE_BASE, THUMB_TIP, WRIST};
use crate::HandSource;

// ════════════════════════════════════════════════════════════════════════════
// Synthesis geometry
// ════════════════════════════════════════════════════════════════════════════

/// Wrist anchor of every synthesized hand.
const SIM_WRIST: Landmark = Landmark { x: 0.5, y: 0.85 };

/// Scale distance (wrist ↔ middle base) of every synthesized hand.
/// Well above the 0.01 degenerate-geometry floor.
const SIM_SCALE: f32 = 0.25;

/// Height at which the pinching fingertips sit.
const SIM_PINCH_Y: f32 = 0.45;

/// Synthesize a full hand whose pinch/scale ratio equals `ratio`.
///
/// The 17 landmarks that the control computation never reads are filled with
/// a fixed palm-center point.
pub fn synth_hand(ratio: f32) -> Hand {
    let ratio = ratio.max(0.0);
    let pinch = ratio * SIM_SCALE;

    let mut pts = vec![Landmark::new(0.5, 0.6); LANDMARK_COUNT];
    pts[WRIST] = SIM_WRIST;
    pts[MIDDLE_BASE] = Landmark::new(SIM_WRIST.x, SIM_WRIST.y - SIM_SCALE);
    pts[THUMB_TIP] = Landmark::new(0.5 - pinch / 2.0, SIM_PINCH_Y);
    pts[INDEX_TIP] = Landmark::new(0.5 + pinch / 2.0, SIM_PINCH_Y);
    Hand::new(pts)
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource
// ════════════════════════════════════════════════════════════════════════════

/// Hand source that replays a fixed script, then reports exhaustion.
pub struct SimHandSource {
    script: Vec<Option<f32>>,
    cursor: usize,
}

impl SimHandSource {
    /// Replay an explicit per-frame script.
    pub fn from_script(script: Vec<Option<f32>>) -> Self {
        SimHandSource { script, cursor: 0 }
    }

    /// One full open → pinch → open arc over `frames` frames.
    ///
    /// The ratio follows a raised cosine from `max_ratio` down to 0.0 and
    /// back, so a sweep exercises the full volume range plus the mute state.
    pub fn sweep(frames: usize, max_ratio: f32) -> Self {
        let n = frames.max(2);
        let script = (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                let ratio = max_ratio * 0.5 * (1.0 + (std::f32::consts::TAU * t).cos());
                Some(ratio)
            })
            .collect();
        SimHandSource { script, cursor: 0 }
    }

    /// Hold a constant ratio for `frames` frames.
    pub fn hold(ratio: f32, frames: usize) -> Self {
        SimHandSource {
            script: vec![Some(ratio); frames],
            cursor: 0,
        }
    }

    /// Frames remaining in the script.
    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.cursor)
    }
}

impl HandSource for SimHandSource {
    fn next_hand(&mut self) -> Option<Hand> {
        let entry = self.script.get(self.cursor).copied()?;
        self.cursor += 1;
        entry.map(synth_hand)
    }

    fn exhausted(&self) -> bool {
        self.cursor >= self.script.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
