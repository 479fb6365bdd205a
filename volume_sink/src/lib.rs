//! # volume_sink
//!
//! Abstraction over an audio endpoint's volume/mute control.
//!
//! The [`ControlSink`] trait exposes get/set of a scalar volume in `[0, 1]`
//! and a boolean mute flag.  Every operation can fail independently with a
//! [`SinkError`], and failures are recoverable by contract: a caller drops
//! the command for that frame and carries on.  No sink failure is fatal.
//!
//! Backends:
//!
//! * [`SimSink`] — in-memory, with scripted failure injection for tests.
//! * [`NullSink`] — accepts every write, reports silence; the graceful
//!   fallback when no real backend can be opened.
//! * [`midi::MidiSink`] — real-time MIDI CC 7 over `midir`.

use pinch_engine::ControlUpdate;
use thiserror::Error;

pub mod midi;

// ════════════════════════════════════════════════════════════════════════════
// SinkError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink's device cannot be reached at all.
    #[error("control sink unavailable")]
    Unavailable,

    /// A backend-specific send/query failure.
    #[error("sink backend error: {0}")]
    Backend(String),
}

// ════════════════════════════════════════════════════════════════════════════
// ControlSink trait
// ════════════════════════════════════════════════════════════════════════════

/// Get/set volume and mute on an audio endpoint, best-effort.
///
/// Implementations clamp volumes to `[0, 1]` on write.
pub trait ControlSink {
    fn get_volume(&self) -> Result<f32, SinkError>;
    fn set_volume(&mut self, volume: f32) -> Result<(), SinkError>;
    fn get_mute(&self) -> Result<bool, SinkError>;
    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError>;

    /// Clamped relative volume adjustment; returns the resulting volume.
    fn nudge_volume(&mut self, delta: f32) -> Result<f32, SinkError> {
        let target = (self.get_volume()? + delta).clamp(0.0, 1.0);
        self.set_volume(target)?;
        Ok(target)
    }
}

impl<T: ControlSink + ?Sized> ControlSink for Box<T> {
    fn get_volume(&self) -> Result<f32, SinkError> {
        (**self).get_volume()
    }
    fn set_volume(&mut self, volume: f32) -> Result<(), SinkError> {
        (**self).set_volume(volume)
    }
    fn get_mute(&self) -> Result<bool, SinkError> {
        (**self).get_mute()
    }
    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError> {
        (**self).set_mute(muted)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// apply_update — ordered command application
// ════════════════════════════════════════════════════════════════════════════

/// Apply one frame's [`ControlUpdate`] to a sink.
///
/// The mute-state change always precedes the volume change: unmuting before
/// raising volume avoids an audible jump, muting before zeroing avoids a
/// click.  On the first failure the remainder of the update is dropped —
/// writing volume after a failed mute write would reorder the two.
pub fn apply_update<S: ControlSink + ?Sized>(
    sink: &mut S,
    update: &ControlUpdate,
) -> Result<(), SinkError> {
    if let Some(muted) = update.mute {
        sink.set_mute(muted)?;
    }
    if let Some(volume) = update.volume {
        sink.set_volume(volume)?;
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// SimSink — in-memory sink with failure injection
// ════════════════════════════════════════════════════════════════════════════

/// One recorded write, for asserting ordering in tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SinkOp {
    SetVolume(f32),
    SetMute(bool),
}

/// In-memory sink.  `fail_next(n)` makes the next `n` operations fail with
/// [`SinkError::Unavailable`], which is how driver tests exercise the
/// drop-and-continue path.
#[derive(Debug, Default)]
pub struct SimSink {
    volume: f32,
    muted: bool,
    // Cell: get operations take `&self` but still consume a failure.
    failures_left: std::cell::Cell<u32>,
    /// Every successful write, in order.
    pub ops: Vec<SinkOp>,
}

impl SimSink {
    pub fn new(volume: f32, muted: bool) -> Self {
        SimSink {
            volume: volume.clamp(0.0, 1.0),
            muted,
            failures_left: std::cell::Cell::new(0),
            ops: Vec::new(),
        }
    }

    /// Fail the next `n` sink operations (gets and sets alike).
    pub fn fail_next(&mut self, n: u32) {
        self.failures_left.set(n);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn check_failure(&self) -> Result<(), SinkError> {
        let left = self.failures_left.get();
        if left > 0 {
            self.failures_left.set(left - 1);
            return Err(SinkError::Unavailable);
        }
        Ok(())
    }
}

impl ControlSink for SimSink {
    fn get_volume(&self) -> Result<f32, SinkError> {
        self.check_failure()?;
        Ok(self.volume)
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), SinkError> {
        self.check_failure()?;
        self.volume = volume.clamp(0.0, 1.0);
        self.ops.push(SinkOp::SetVolume(self.volume));
        Ok(())
    }

    fn get_mute(&self) -> Result<bool, SinkError> {
        self.check_failure()?;
        Ok(self.muted)
    }

    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError> {
        self.check_failure()?;
        self.muted = muted;
        self.ops.push(SinkOp::SetMute(muted));
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NullSink — accepts everything, reports silence
// ════════════════════════════════════════════════════════════════════════════

/// Sink of last resort: every write succeeds and goes nowhere.
#[derive(Debug, Default)]
pub struct NullSink;

impl ControlSink for NullSink {
    fn get_volume(&self) -> Result<f32, SinkError> {
        Ok(0.0)
    }
    fn set_volume(&mut self, _volume: f32) -> Result<(), SinkError> {
        Ok(())
    }
    fn get_mute(&self) -> Result<bool, SinkError> {
        Ok(false)
    }
    fn set_mute(&mut self, _muted: bool) -> Result<(), SinkError> {
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
