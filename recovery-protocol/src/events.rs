//! Raw input events and the discrete events delivered to the UI consumer

use crate::codes::{EV_ABS, EV_KEY, EV_REL, EV_SYN};

/// Event type of a raw input report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventType {
    /// Synchronization marker
    Syn,
    /// Key or button state change
    Key,
    /// Relative axis motion (trackball)
    Rel,
    /// Absolute axis report (touch panel)
    Abs,
    /// Anything else the kernel may report
    Other(u16),
}

impl EventType {
    /// Classify a raw `type` field
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            EV_SYN => EventType::Syn,
            EV_KEY => EventType::Key,
            EV_REL => EventType::Rel,
            EV_ABS => EventType::Abs,
            other => EventType::Other(other),
        }
    }

    /// Convert back to the raw `type` field
    pub fn to_raw(self) -> u16 {
        match self {
            EventType::Syn => EV_SYN,
            EventType::Key => EV_KEY,
            EventType::Rel => EV_REL,
            EventType::Abs => EV_ABS,
            EventType::Other(raw) => raw,
        }
    }
}

/// One raw input report as read from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawEvent {
    /// Raw event type
    pub kind: u16,
    /// Type-specific code (key code, axis)
    pub code: u16,
    /// Value (key state, axis position or delta)
    pub value: i32,
}

impl RawEvent {
    pub const fn new(kind: u16, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Key or button event
    pub const fn key(code: u16, value: i32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    /// Relative axis event
    pub const fn rel(code: u16, value: i32) -> Self {
        Self::new(EV_REL, code, value)
    }

    /// Absolute axis event
    pub const fn abs(code: u16, value: i32) -> Self {
        Self::new(EV_ABS, code, value)
    }

    /// Synchronization marker
    pub const fn syn(code: u16) -> Self {
        Self::new(EV_SYN, code, 0)
    }

    /// Classified event type
    pub fn event_type(&self) -> EventType {
        EventType::from_raw(self.kind)
    }
}

/// Touch identity and gesture metrics attached to synthesized touch events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Touch {
    /// Touch point identity (0 is the primary point)
    pub id: u8,
    /// Logical screen X
    pub x: i32,
    /// Logical screen Y
    pub y: i32,
    /// Contact pressure (0 when released)
    pub pressure: i32,
    /// Cumulative path length while pressed
    pub path_len: i32,
    /// Signed horizontal run-length; restarts on direction reversal
    pub run_x: i32,
}

/// Discrete UI event
///
/// Touch variants carry the identity and metrics of the point that produced
/// them. Up, Tap and the scroll variants report the last held position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiEvent {
    /// Key or button code (includes trackball directions)
    Key(u16),
    /// Touch point moved (or reported without a pressure change)
    Move(Touch),
    /// Touch point pressed
    Down(Touch),
    /// Touch point released
    Up(Touch),
    /// Short press and release on the primary point
    Tap(Touch),
    /// Horizontal swipe toward larger X
    ScrollUp(Touch),
    /// Horizontal swipe toward smaller X
    ScrollDown(Touch),
}

impl UiEvent {
    /// Touch metrics for touch variants
    pub fn touch(&self) -> Option<&Touch> {
        match self {
            UiEvent::Key(_) => None,
            UiEvent::Move(t)
            | UiEvent::Down(t)
            | UiEvent::Up(t)
            | UiEvent::Tap(t)
            | UiEvent::ScrollUp(t)
            | UiEvent::ScrollDown(t) => Some(t),
        }
    }

    /// Key code for key events
    pub fn key_code(&self) -> Option<u16> {
        match self {
            UiEvent::Key(code) => Some(*code),
            _ => None,
        }
    }

    /// Returns true for events that end a touch (release, tap, scroll)
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            UiEvent::Up(_) | UiEvent::Tap(_) | UiEvent::ScrollUp(_) | UiEvent::ScrollDown(_)
        )
    }

    /// Returns true for pointer motion reports
    pub fn is_move(&self) -> bool {
        matches!(self, UiEvent::Move(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::*;

    #[test]
    fn test_event_type_classification() {
        assert_eq!(RawEvent::syn(SYN_MT_REPORT).event_type(), EventType::Syn);
        assert_eq!(RawEvent::key(KEY_POWER, 1).event_type(), EventType::Key);
        assert_eq!(RawEvent::rel(REL_Y, 2).event_type(), EventType::Rel);
        assert_eq!(RawEvent::abs(ABS_MT_POSITION_X, 5).event_type(), EventType::Abs);
        assert_eq!(RawEvent::new(0x15, 0, 0).event_type(), EventType::Other(0x15));
        assert_eq!(EventType::Other(0x15).to_raw(), 0x15);
    }

    #[test]
    fn test_ui_event_accessors() {
        let touch = Touch {
            id: 0,
            x: 10,
            y: 20,
            pressure: 40,
            path_len: 3,
            run_x: -1,
        };
        assert_eq!(UiEvent::Tap(touch).touch(), Some(&touch));
        assert!(UiEvent::Tap(touch).is_release());
        assert!(UiEvent::ScrollDown(touch).is_release());
        assert!(!UiEvent::Down(touch).is_release());
        assert!(UiEvent::Move(touch).is_move());
        assert_eq!(UiEvent::Key(KEY_UP).key_code(), Some(KEY_UP));
        assert_eq!(UiEvent::Key(KEY_UP).touch(), None);
        assert_eq!(UiEvent::Up(touch).key_code(), None);
    }
}
