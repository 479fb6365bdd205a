//! pinch_volume — interactive entry point.

use pinch_volume::app::{run, AppConfig};
use pinch_engine::EngineConfig;
use volume_sink::midi::open_midi_sink;
use volume_sink::ControlSink;

use std::io::{self, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       Pinch Volume — Hand Gesture Volume Controller          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Scripted pinch sweep  (use --features leap for hardware)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: threshold 0.15, domain [0.15, 1.5], step 3%\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Pinch thumb and index together to mute; open the hand to");
    println!("  raise the volume.  Stop with Ctrl-C.");
    println!();

    let stop = Arc::new(AtomicBool::new(false));
    match run(cfg, stop) {
        Ok(summary) => {
            println!();
            println!(
                "  ✓  {} ticks — {} without a hand, {} sink errors, {} commands dropped",
                summary.ticks,
                summary.frames_without_hand,
                summary.sink_errors,
                summary.commands_dropped
            );
            println!(
                "  ✓  final state: ratio {:.2}, volume {}%, {}",
                summary.final_state.ratio,
                summary.final_state.volume,
                if summary.final_state.muted { "muted" } else { "unmuted" }
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn configure_interactively() -> AppConfig {
    println!("  Configure the gesture engine:");
    let pinch_threshold = read_f32("    Pinch (mute) threshold (default 0.15): ", 0.15);
    let min_ratio = read_f32("    Ratio at 0% volume (default 0.15): ", 0.15);
    let max_ratio = {
        let m = read_f32("    Ratio at 100% volume (default 1.5): ", 1.5);
        if m <= min_ratio {
            println!("    ⚠  must exceed the 0% ratio — using {}.", min_ratio + 1.0);
            min_ratio + 1.0
        } else {
            m
        }
    };
    let smoothing_step = {
        let s: u8 = read_line("    Volume step % (default 3): ").trim().parse().unwrap_or(3);
        s.clamp(1, 50)
    };
    let unmute_margin = read_f32("    Unmute hysteresis margin (default 0.0): ", 0.0).max(0.0);

    println!("  Configure the control sink:");
    let use_midi = !matches!(
        read_line("    Sink: 1=MIDI CC  2=none (default 1): ").trim(),
        "2"
    );
    let midi_channel: u8 = read_line("    MIDI channel 0–15 (default 0): ")
        .trim()
        .parse::<u8>()
        .unwrap_or(0)
        .min(15);

    let fps: u64 = {
        let f = read_line("    Frames per second (default 30): ")
            .trim()
            .parse()
            .unwrap_or(30);
        f.clamp(1, 120)
    };

    let sim_frames: usize = read_line("    Sweep length in frames (default 240): ")
        .trim()
        .parse()
        .unwrap_or(240)
        .max(2);

    if use_midi && read_line("  Check the sink first? y/N: ").trim().eq_ignore_ascii_case("y") {
        sink_check(midi_channel);
    }

    AppConfig {
        engine: EngineConfig {
            pinch_threshold,
            min_ratio,
            max_ratio,
            smoothing_step,
            unmute_margin,
        },
        frame_interval: Duration::from_millis(1000 / fps),
        midi_channel,
        use_midi,
        sim_frames,
        sim_max_ratio: 1.8_f32.max(max_ratio),
        echo_status: true,
    }
}

/// Manual volume nudge loop against a freshly opened sink.
/// Lets the user confirm the endpoint reacts before handing it to gestures.
fn sink_check(channel: u8) {
    let mut sink = open_midi_sink(channel);
    println!("    +  volume up 20%    -  volume down 20%    Enter  done");
    loop {
        match read_line("    sink> ").trim() {
            "+" => match sink.nudge_volume(0.2) {
                Ok(v) => println!("    volume → {:.0}%", v * 100.0),
                Err(e) => println!("    ⚠  {}", e),
            },
            "-" => match sink.nudge_volume(-0.2) {
                Ok(v) => println!("    volume → {:.0}%", v * 100.0),
                Err(e) => println!("    ⚠  {}", e),
            },
            "" => break,
            other => println!("    ⚠  unknown command {:?}", other),
        }
    }
}

fn read_f32(prompt: &str, default: f32) -> f32 {
    read_line(prompt).trim().parse().unwrap_or(default)
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
