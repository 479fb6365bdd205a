//! # hand_pose
//!
//! Normalized 2-D hand-landmark model and the sources that produce it.
//!
//! A detected hand is an ordered sequence of landmarks in image-space
//! coordinates (conceptually `[0, 1]`, never clamped).  Consumers address
//! the four control points by fixed index:
//!
//! | Index | Landmark |
//! |---|---|
//! | 0 | Wrist |
//! | 4 | Thumb tip |
//! | 8 | Index tip |
//! | 9 | Middle-finger base (MCP knuckle) |
//!
//! The public interface is the pull-based [`HandSource`] trait: one query
//! yields zero or one hands.  Consumers don't need to know whether the hand
//! came from real hardware or a script.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: [`sim::SimHandSource`] replays a
//!   scripted pinch trajectory.  No hardware needed.
//! * `leap` — **Hardware mode**: [`leap::LeapHandSource`] polls a real
//!   LeapMotion controller via LeapC.

pub mod sim;

#[cfg(feature = "leap")]
pub mod leap;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

/// Wrist landmark index.
pub const WRIST: usize = 0;
/// Thumb-tip landmark index.
pub const THUMB_TIP: usize = 4;
/// Index-tip landmark index.
pub const INDEX_TIP: usize = 8;
/// Middle-finger base (MCP knuckle) landmark index.
pub const MIDDLE_BASE: usize = 9;

/// Landmarks in a full hand.
pub const LANDMARK_COUNT: usize = 21;

/// Minimum landmark count for a hand to carry all four control points.
pub const MIN_LANDMARKS: usize = 10;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single 2-D point in normalized image-space coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }

    /// Euclidean distance to another landmark.
    pub fn distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// One frame's detected hand: an ordered sequence of landmarks.
///
/// A full hand has [`LANDMARK_COUNT`] points, but any sequence with at least
/// [`MIN_LANDMARKS`] points carries the four control landmarks and is usable.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    landmarks: Vec<Landmark>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Hand { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// True when all four control landmarks are addressable.
    pub fn has_control_points(&self) -> bool {
        self.landmarks.len() >= MIN_LANDMARKS
    }

    /// Landmark at `index`, or `None` past the end of the sequence.
    pub fn landmark(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }

    pub fn wrist(&self) -> Option<Landmark> {
        self.landmark(WRIST)
    }

    pub fn thumb_tip(&self) -> Option<Landmark> {
        self.landmark(THUMB_TIP)
    }

    pub fn index_tip(&self) -> Option<Landmark> {
        self.landmark(INDEX_TIP)
    }

    pub fn middle_base(&self) -> Option<Landmark> {
        self.landmark(MIDDLE_BASE)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver zero-or-one [`Hand`]s per query.
///
/// The call is synchronous and pull-based: one query per frame, invoked by
/// the loop driver.  Returning `None` means "no hand detected this frame" —
/// a normal condition, never an error.
pub trait HandSource {
    fn next_hand(&mut self) -> Option<Hand>;

    /// True once the source will never yield another hand (a finished
    /// script).  Live sources stay `false` forever.
    fn exhausted(&self) -> bool {
        false
    }
}

impl<T: HandSource + ?Sized> HandSource for Box<T> {
    fn next_hand(&mut self) -> Option<Hand> {
        (**self).next_hand()
    }

    fn exhausted(&self) -> bool {
        (**self).exhausted()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
