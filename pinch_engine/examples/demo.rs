//! Walks the engine through a full pinch sweep and prints the state machine.

use hand_pose::sim::SimHandSource;
use hand_pose::HandSource;
use pinch_engine::{EngineConfig, GestureEngine, PoseSample};

fn main() {
    println!("\n=== Pinch Engine Demo ===\n");

    let config = EngineConfig {
        pinch_threshold: 0.15,
        min_ratio: 0.1,
        max_ratio: 1.8,
        smoothing_step: 5,
        unmute_margin: 0.0,
    };
    println!(
        "   threshold {:.2}  domain [{:.2}, {:.2}]  step {}%",
        config.pinch_threshold, config.min_ratio, config.max_ratio, config.smoothing_step
    );
    println!();

    let mut engine = GestureEngine::new(config);
    let mut source = SimHandSource::sweep(24, 1.8);

    println!("   frame  ratio   state   volume  commands");
    let mut frame = 0;
    while !source.exhausted() {
        let hand = source.next_hand();
        let sample = hand.as_ref().and_then(PoseSample::from_hand);
        let update = engine.process(sample.as_ref());
        let state = engine.state();

        let mut commands = String::new();
        if let Some(m) = update.mute {
            commands.push_str(if m { "MUTE " } else { "UNMUTE " });
        }
        if let Some(v) = update.volume {
            commands.push_str(&format!("vol={:.2}", v));
        }

        println!(
            "   {:>5}  {:>5.2}  {:>6}  {:>5}%  {}",
            frame,
            state.ratio,
            if state.muted { "MUTED" } else { "ACTIVE" },
            state.volume,
            commands
        );
        frame += 1;
    }
}
