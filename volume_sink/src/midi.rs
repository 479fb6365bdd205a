//! Real-time MIDI CC sink over `midir`.
//!
//! Volume maps to Control Change 7 (channel volume) scaled to 0–127; mute
//! sends CC 7 value 0 and unmute restores the pre-mute level.  MIDI is a
//! write-only transport, so the get operations report the last written
//! values rather than querying the device.

use midir::{MidiOutput, MidiOutputConnection};

use crate::{ControlSink, NullSink, SinkError};

/// Channel-volume controller number.
pub const VOLUME_CC: u8 = 7;

/// Scale a `[0, 1]` volume to a 7-bit CC value.
pub fn cc_value(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 127.0).round() as u8
}

// ════════════════════════════════════════════════════════════════════════════
// MidiSink
// ════════════════════════════════════════════════════════════════════════════

pub struct MidiSink {
    conn: MidiOutputConnection,
    channel: u8,
    volume: f32,
    muted: bool,
}

impl MidiSink {
    pub fn new(conn: MidiOutputConnection, channel: u8) -> Self {
        MidiSink {
            conn,
            channel: channel & 0x0F,
            volume: 0.0,
            muted: false,
        }
    }

    fn send_volume_cc(&mut self, value: u8) -> Result<(), SinkError> {
        self.conn
            .send(&[0xB0 | self.channel, VOLUME_CC, value])
            .map_err(|e| SinkError::Backend(e.to_string()))
    }
}

impl ControlSink for MidiSink {
    fn get_volume(&self) -> Result<f32, SinkError> {
        Ok(self.volume)
    }

    /// While muted only the shadow level changes; the wire stays at 0 until
    /// unmute restores it.
    fn set_volume(&mut self, volume: f32) -> Result<(), SinkError> {
        let volume = volume.clamp(0.0, 1.0);
        if !self.muted {
            self.send_volume_cc(cc_value(volume))?;
        }
        self.volume = volume;
        Ok(())
    }

    fn get_mute(&self) -> Result<bool, SinkError> {
        Ok(self.muted)
    }

    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError> {
        if muted {
            self.send_volume_cc(0)?;
        } else {
            self.send_volume_cc(cc_value(self.volume))?;
        }
        self.muted = muted;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_sink — enumerate ports and pick first available
// ════════════════════════════════════════════════════════════════════════════

/// Try to open the first available MIDI output port as a control sink.
/// Falls back to [`NullSink`] with a warning if none can be opened.
pub fn open_midi_sink(channel: u8) -> Box<dyn ControlSink> {
    let midi_out = match MidiOutput::new("pinch_volume_sink") {
        Ok(m) => m,
        Err(e) => {
            log::warn!("MIDI init error: {} — using null sink", e);
            return Box::new(NullSink);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        log::warn!("no MIDI output ports found — using null sink");
        log::info!("install a MIDI synthesiser such as:");
        log::info!("  macOS: built-in CoreMIDI (always available)");
        log::info!("  Linux: `timidity -iA` or `fluidsynth`");
        log::info!("  Windows: built-in GS Wavetable Synth");
        return Box::new(NullSink);
    }

    // Prefer a softsynth if visible
    let port_idx = ports
        .iter()
        .enumerate()
        .find(|(_, p)| {
            midi_out
                .port_name(p)
                .map(|n| {
                    let n = n.to_lowercase();
                    n.contains("fluid")
                        || n.contains("timidity")
                        || n.contains("microsoft")
                        || n.contains("synth")
                })
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out
        .port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());

    match midi_out.connect(port, "pinch-volume") {
        Ok(conn) => {
            log::info!("opened MIDI port: {}", name);
            Box::new(MidiSink::new(conn, channel))
        }
        Err(e) => {
            log::warn!("failed to connect to {}: {} — using null sink", name, e);
            Box::new(NullSink)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cc_value_spans_seven_bits() {
        assert_eq!(cc_value(0.0), 0);
        assert_eq!(cc_value(1.0), 127);
        assert_eq!(cc_value(0.5), 64); // 63.5 rounds up
    }

    #[test]
    fn cc_value_clamps_out_of_range() {
        assert_eq!(cc_value(-0.3), 0);
        assert_eq!(cc_value(2.0), 127);
    }
}
