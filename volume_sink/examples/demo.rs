//! Demonstrates the sink trait against the in-memory backend, then tries
//! a real MIDI port (falling back to the null sink when none exists).

use pinch_engine::ControlUpdate;
use volume_sink::midi::open_midi_sink;
use volume_sink::{apply_update, ControlSink, SimSink};

fn main() {
    env_logger::init();
    println!("\n=== Volume Sink Demo ===\n");

    // ── 1. In-memory sink ─────────────────────────────────────────────────
    println!("1. SimSink");
    let mut sink = SimSink::new(0.5, false);
    sink.set_volume(0.8).unwrap();
    sink.set_mute(true).unwrap();
    println!(
        "   volume {:.2}  muted {}",
        sink.get_volume().unwrap(),
        sink.get_mute().unwrap()
    );
    let v = sink.nudge_volume(-0.2).unwrap();
    println!("   nudged -20% → {:.2}", v);
    println!("   write log: {:?}", sink.ops);
    println!();

    // ── 2. Ordered application of a frame update ──────────────────────────
    println!("2. apply_update (mute always precedes volume)");
    let mut sink = SimSink::default();
    let update = ControlUpdate {
        mute: Some(false),
        volume: Some(0.65),
    };
    apply_update(&mut sink, &update).unwrap();
    println!("   applied: {:?}", sink.ops);
    println!();

    // ── 3. Real MIDI port, if any ─────────────────────────────────────────
    println!("3. MIDI CC sink (null fallback without a port)");
    let mut sink = open_midi_sink(0);
    for v in [0.0, 0.25, 0.5, 0.75, 1.0] {
        if let Err(e) = sink.set_volume(v) {
            println!("   set_volume({:.2}) failed: {}", v, e);
        }
    }
    let _ = sink.set_mute(true);
    let _ = sink.set_mute(false);
    println!("   ramp sent");
}
