//! LeapMotion hand source (feature = "leap").
//!
//! Polls a LeapC connection and projects the first tracked hand's joints
//! from millimeter device-space into normalized image-like coordinates.
//! Only the four control landmarks carry real joint positions; the rest of
//! the sequence is filled with the palm center, which the control
//! computation never reads.
//!
//! The projection divides both axes by the same span, so the pinch/scale
//! ratio is unaffected by the choice of span.

use leaprs::{Connection, ConnectionConfig, Event};

use crate::{Hand, HandSource, Landmark, INDEX_TIP, LANDMARK_COUNT, MIDDLE_BASE, THUMB_TIP, WRIST};

/// Device-space span (mm) mapped onto one normalized unit.
const LEAP_SPAN_MM: f32 = 500.0;

/// Per-query poll timeout (ms) — bounded by the caller's frame budget.
const POLL_TIMEOUT_MS: u32 = 50;

/// Project a device-space point (mm) into normalized image-like coordinates.
/// Leap y grows upward; image y grows downward.
fn project(x: f32, y: f32) -> Landmark {
    Landmark::new(0.5 + x / LEAP_SPAN_MM, 1.0 - y / LEAP_SPAN_MM)
}

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
pub struct LeapHandSource {
    connection: Connection,
}

impl LeapHandSource {
    /// Open the LeapC connection and the device.
    pub fn open() -> Result<Self, String> {
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| format!("failed to create LeapC connection: {:?}", e))?;
        connection
            .open()
            .map_err(|e| format!("failed to open LeapMotion device: {:?}", e))?;
        log::info!("LeapMotion connection open");
        Ok(LeapHandSource { connection })
    }
}

impl HandSource for LeapHandSource {
    fn next_hand(&mut self) -> Option<Hand> {
        let msg = match self.connection.poll(POLL_TIMEOUT_MS) {
            Ok(m) => m,
            Err(_) => return None,
        };

        if let Event::Tracking(frame) = msg.event() {
            let hand = frame.hands().next()?;
            let fingers: Vec<_> = hand.digits().collect();
            if fingers.len() < 3 {
                return None;
            }

            let palm = hand.palm().position();
            let thumb = fingers[0].distal().next_joint();
            let index = fingers[1].distal().next_joint();
            // Metacarpal of the middle finger: proximal end sits at the
            // wrist, distal end at the MCP knuckle.
            let wrist = fingers[2].metacarpal().prev_joint();
            let knuckle = fingers[2].metacarpal().next_joint();

            let mut pts = vec![project(palm.x, palm.y); LANDMARK_COUNT];
            pts[WRIST] = project(wrist.x, wrist.y);
            pts[THUMB_TIP] = project(thumb.x, thumb.y);
            pts[INDEX_TIP] = project(index.x, index.y);
            pts[MIDDLE_BASE] = project(knuckle.x, knuckle.y);
            return Some(Hand::new(pts));
        }

        None
    }
}
