//! Trackball motion to directional keys

use recovery_protocol::codes::{KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP, REL_X, REL_Y};

/// Accumulated motion that produces one directional key
pub const TRACKBALL_THRESHOLD: i32 = 3;

/// Per-axis relative motion accumulator
#[derive(Debug, Clone, Default)]
pub struct Trackball {
    sum_x: i32,
    sum_y: i32,
}

impl Trackball {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one relative report
    ///
    /// Returns a directional key code once an axis crosses the threshold;
    /// that axis then starts over.
    pub fn feed(&mut self, code: u16, value: i32) -> Option<u16> {
        let (sum, positive, negative) = match code {
            REL_Y => (&mut self.sum_y, KEY_DOWN, KEY_UP),
            REL_X => (&mut self.sum_x, KEY_RIGHT, KEY_LEFT),
            _ => return None,
        };

        *sum = sum.saturating_add(value);
        let key = if *sum > TRACKBALL_THRESHOLD {
            positive
        } else if *sum < -TRACKBALL_THRESHOLD {
            negative
        } else {
            return None;
        };
        *sum = 0;
        Some(key)
    }

    /// Drop accumulated motion on both axes
    pub fn reset(&mut self) {
        self.sum_x = 0;
        self.sum_y = 0;
    }
}
