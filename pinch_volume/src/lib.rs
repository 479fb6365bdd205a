//! # pinch_volume
//!
//! Pinch-gesture volume controller.
//!
//! One synchronous loop ties three collaborators together, one frame at a
//! time:
//!
//! ```text
//! HandSource ──▶ GestureEngine ──▶ ControlSink
//!      (hand_pose)    (pinch_engine)    (volume_sink)
//!                └──── LoopDriver orchestrates ────┘
//! ```
//!
//! ## Gesture → Control mapping
//!
//! | Gesture | Effect |
//! |---|---|
//! | Thumb–index pinch (ratio ≤ threshold) | Mute |
//! | Hand opening past the threshold | Unmute, then volume tracks the ratio |
//! | Wide open (ratio ≥ max_ratio) | 100 % volume |
//! | No hand in frame | Nothing — last state holds |
//!
//! The ratio is pinch distance over wrist-to-knuckle distance, so the
//! mapping is independent of how far the hand sits from the camera.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: a scripted pinch sweep drives the
//!   loop.  No hardware needed.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller.

pub mod app;
pub mod driver;
