//! Demonstrates scripted hand synthesis and the source trait.

use hand_pose::sim::{synth_hand, SimHandSource};
use hand_pose::HandSource;

fn show(label: &str, ratio: f32) {
    let hand = synth_hand(ratio);
    let pinch = hand
        .thumb_tip()
        .unwrap()
        .distance_to(&hand.index_tip().unwrap());
    let scale = hand.wrist().unwrap().distance_to(&hand.middle_base().unwrap());
    println!(
        "   {:<18} pinch={:.4}  scale={:.4}  ratio={:.3}",
        label,
        pinch,
        scale,
        pinch / scale
    );
}

fn main() {
    println!("\n=== Hand Pose Synthesis Demo ===\n");

    // ── 1. Single synthesized hands across the gesture range ─────────────
    println!("1. Synthesized hands");
    show("pinched (0.05):", 0.05);
    show("closed (0.3):", 0.3);
    show("half open (0.9):", 0.9);
    show("wide open (1.8):", 1.8);
    println!();

    // ── 2. A sweep script played through the source trait ─────────────────
    println!("2. Sweep script, 12 frames, max ratio 1.8");
    let mut src = SimHandSource::sweep(12, 1.8);
    let mut frame = 0;
    while let Some(hand) = src.next_hand() {
        let pinch = hand
            .thumb_tip()
            .unwrap()
            .distance_to(&hand.index_tip().unwrap());
        let scale = hand.wrist().unwrap().distance_to(&hand.middle_base().unwrap());
        println!("   frame {:>2}  ratio {:.3}", frame, pinch / scale);
        frame += 1;
    }
    println!("   exhausted: {}", src.exhausted());

    // ── 3. Scripted detection gaps ────────────────────────────────────────
    println!("\n3. Script with detection gaps");
    let mut src = SimHandSource::from_script(vec![Some(1.0), None, None, Some(0.1)]);
    let mut frame = 0;
    loop {
        if src.exhausted() {
            break;
        }
        match src.next_hand() {
            Some(_) => println!("   frame {}  hand detected", frame),
            None => println!("   frame {}  no hand", frame),
        }
        frame += 1;
    }
}
