//! Raw event dispatch
//!
//! Routes each raw report to the touch tracker, the trackball accumulator
//! or straight through as a key, and tags the result with whether it was
//! synthesized.

use recovery_hal::DevicePolicy;
use recovery_protocol::codes::{
    ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_TOUCH_MAJOR, ABS_MT_TRACKING_ID,
    ABS_MT_WIDTH_MAJOR, KEY_MAX, SYN_MT_REPORT,
};
use recovery_protocol::{EventType, RawEvent, UiEvent};

use crate::config::UiConfig;

use super::touch::TouchTracker;
use super::trackball::Trackball;

/// A discrete event ready for the key queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NormalizedEvent {
    pub event: UiEvent,
    /// Key value (0 release, 1 press, 2 repeat); touch events carry id + 1
    pub value: i32,
    /// Synthesized by the normalizer; these have no matching release and
    /// stay out of the held-key table
    pub synthetic: bool,
}

impl NormalizedEvent {
    /// Events with a positive value go to the consumer
    pub fn should_queue(&self) -> bool {
        self.value > 0
    }

    /// Real key events update the held-key table
    pub fn should_record(&self) -> bool {
        !self.synthetic
    }
}

/// Turns raw reports into discrete events
#[derive(Debug, Clone)]
pub struct Normalizer {
    touch: TouchTracker,
    trackball: Trackball,
}

impl Normalizer {
    /// Create a normalizer with an explicit scroll threshold
    pub fn new(scroll_threshold: i32) -> Self {
        Self {
            touch: TouchTracker::new(scroll_threshold),
            trackball: Trackball::new(),
        }
    }

    /// Scroll threshold is 10% of the vertical resolution
    pub fn from_config(config: &UiConfig) -> Self {
        Self::new(config.screen.height as i32 / 10)
    }

    /// Touch tracker state
    pub fn touch(&self) -> &TouchTracker {
        &self.touch
    }

    /// Process one raw report
    ///
    /// Returns `None` for reports that only update internal state.
    pub fn feed<P: DevicePolicy + ?Sized>(
        &mut self,
        raw: RawEvent,
        policy: &P,
    ) -> Option<NormalizedEvent> {
        match raw.event_type() {
            EventType::Syn => {
                if raw.code != SYN_MT_REPORT {
                    return None;
                }
                let event = self.touch.close_cycle()?;
                let id = event.touch().map_or(0, |t| t.id);
                Some(NormalizedEvent {
                    event,
                    value: id as i32 + 1,
                    synthetic: true,
                })
            }
            EventType::Abs => {
                match raw.code {
                    ABS_MT_POSITION_X => self.touch.set_x(policy.normalize_x(raw.value)),
                    ABS_MT_POSITION_Y => self.touch.set_y(policy.normalize_y(raw.value)),
                    ABS_MT_TOUCH_MAJOR => self.touch.set_pressure(raw.value),
                    ABS_MT_WIDTH_MAJOR => self.touch.set_width(raw.value),
                    ABS_MT_TRACKING_ID => self.touch.set_tracking_id(raw.value),
                    _ => {}
                }
                None
            }
            EventType::Rel => {
                let key = self.trackball.feed(raw.code, raw.value)?;
                Some(NormalizedEvent {
                    event: UiEvent::Key(key),
                    value: 1,
                    synthetic: true,
                })
            }
            EventType::Key => {
                self.trackball.reset();
                if raw.code > KEY_MAX {
                    return None;
                }
                Some(NormalizedEvent {
                    event: UiEvent::Key(raw.code),
                    value: raw.value,
                    synthetic: false,
                })
            }
            EventType::Other(_) => {
                self.trackball.reset();
                None
            }
        }
    }
}
