//! Multi-touch point tracking
//!
//! Panels report each contact as a run of absolute-axis values closed by a
//! `SYN_MT_REPORT` marker. The tracker collects one contact per cycle and,
//! when the cycle closes, compares it with the stored state for that
//! identity to synthesize exactly one discrete event.

use recovery_protocol::{Touch, UiEvent};

/// Maximum concurrently tracked touch points
pub const MAX_TOUCH_POINTS: usize = 10;

/// Path length (logical pixels) below which a release on the primary
/// point counts as a tap
pub const TAP_THRESHOLD: i32 = 15;

/// State of one touch contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    /// Contact identity
    pub id: i32,
    /// Logical X
    pub x: i32,
    /// Logical Y
    pub y: i32,
    /// Contact pressure; 0 means released
    pub pressure: i32,
    /// Contact size reported by the panel
    pub size: i32,
    /// Cumulative path length while pressed
    pub path_len: i32,
    /// Signed horizontal run-length (previous X minus current X)
    pub run_x: i32,
}

impl TouchPoint {
    /// Returns true while the contact is pressed
    pub fn is_pressed(&self) -> bool {
        self.pressure != 0
    }

    fn to_touch(self, id: u8) -> Touch {
        Touch {
            id,
            x: self.x,
            y: self.y,
            pressure: self.pressure,
            path_len: self.path_len,
            run_x: self.run_x,
        }
    }
}

/// Tracks touch contacts across reporting cycles
#[derive(Debug, Clone)]
pub struct TouchTracker {
    /// Contact being assembled in the current cycle
    pending: TouchPoint,
    /// Last closed state per identity
    points: [TouchPoint; MAX_TOUCH_POINTS],
    /// Horizontal run-length that turns a release into a scroll
    scroll_threshold: i32,
}

impl TouchTracker {
    /// Create a tracker
    ///
    /// `scroll_threshold` is the run-length magnitude (logical pixels) above
    /// which a release becomes a scroll event.
    pub fn new(scroll_threshold: i32) -> Self {
        Self {
            pending: TouchPoint::default(),
            points: [TouchPoint::default(); MAX_TOUCH_POINTS],
            scroll_threshold,
        }
    }

    /// Forget all contacts
    pub fn reset(&mut self) {
        self.pending = TouchPoint::default();
        self.points = [TouchPoint::default(); MAX_TOUCH_POINTS];
    }

    /// Stored state of a contact
    pub fn point(&self, id: usize) -> Option<&TouchPoint> {
        self.points.get(id)
    }

    /// Update the pending contact's X (already scaled)
    pub fn set_x(&mut self, x: i32) {
        self.pending.x = x;
    }

    /// Update the pending contact's Y (already scaled)
    pub fn set_y(&mut self, y: i32) {
        self.pending.y = y;
    }

    /// Update the pending contact's pressure
    pub fn set_pressure(&mut self, pressure: i32) {
        self.pending.pressure = pressure;
    }

    /// Handle a width report
    ///
    /// Some panels send no tracking id and carry the identity in the high
    /// byte instead; it is only used if no identity was set this cycle.
    pub fn set_width(&mut self, raw: i32) {
        if self.pending.id == 0 {
            self.pending.id = raw >> 8;
        }
        self.pending.size = raw & 0xFF;
    }

    /// Update the pending contact's identity
    pub fn set_tracking_id(&mut self, id: i32) {
        self.pending.id = id;
    }

    /// Close the reporting cycle
    ///
    /// Returns the synthesized event, or `None` when the identity is out of
    /// range. The pending contact is cleared either way.
    pub fn close_cycle(&mut self) -> Option<UiEvent> {
        let mut current = core::mem::take(&mut self.pending);
        let slot = usize::try_from(current.id)
            .ok()
            .filter(|&slot| slot < MAX_TOUCH_POINTS)?;
        let id = slot as u8;
        let previous = self.points[slot];

        if current.is_pressed() && previous.is_pressed() {
            let dx = previous.x - current.x;
            let step = previous.x.abs_diff(current.x) + previous.y.abs_diff(current.y);
            current.path_len = previous.path_len.saturating_add(step as i32);
            current.run_x = if (dx < 0 && previous.run_x > 0) || (dx > 0 && previous.run_x < 0) {
                dx
            } else {
                previous.run_x.saturating_add(dx)
            };
        } else {
            current.path_len = 0;
            current.run_x = 0;
        }
        self.points[slot] = current;

        let event = match (previous.is_pressed(), current.is_pressed()) {
            (false, true) => UiEvent::Down(current.to_touch(id)),
            (true, false) => {
                let last = previous.to_touch(id);
                if previous.run_x.unsigned_abs() > self.scroll_threshold.unsigned_abs() {
                    if previous.run_x > 0 {
                        UiEvent::ScrollDown(last)
                    } else {
                        UiEvent::ScrollUp(last)
                    }
                } else if slot == 0 && previous.path_len < TAP_THRESHOLD {
                    UiEvent::Tap(last)
                } else {
                    UiEvent::Up(last)
                }
            }
            _ => UiEvent::Move(current.to_touch(id)),
        };
        Some(event)
    }
}
