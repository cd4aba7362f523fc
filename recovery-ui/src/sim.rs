//! Replay input device
//!
//! Feeds a prepared sequence of raw events, either built in code or
//! decoded from a captured evdev byte stream. Once the sequence is used
//! up reads wait forever, like an idle touch panel.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use recovery_hal::{InputDevice, InputError};
use recovery_protocol::codes::{
    ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_TOUCH_MAJOR, ABS_MT_TRACKING_ID, SYN_MT_REPORT,
    SYN_REPORT,
};
use recovery_protocol::{EventReader, RawEvent, RecordLayout};

/// Input device that replays queued raw events
#[derive(Debug, Clone, Default)]
pub struct ReplayInput {
    events: VecDeque<RawEvent>,
    /// Report `Closed` instead of waiting once empty
    close_when_empty: bool,
}

impl ReplayInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = RawEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            close_when_empty: false,
        }
    }

    /// Decode a captured `input_event` stream
    ///
    /// A trailing partial record is ignored.
    pub fn from_capture(bytes: &[u8], layout: RecordLayout) -> Self {
        let mut reader = EventReader::new(layout);
        let mut events = VecDeque::new();
        reader.feed_slice(bytes, |event| events.push_back(event));
        Self {
            events,
            close_when_empty: false,
        }
    }

    /// Load a capture file
    pub fn load(path: impl AsRef<Path>, layout: RecordLayout) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        Ok(Self::from_capture(&bytes, layout))
    }

    /// Report the stream as closed once every event was read
    pub fn close_when_empty(mut self) -> Self {
        self.close_when_empty = true;
        self
    }

    pub fn push(&mut self, event: RawEvent) {
        self.events.push_back(event);
    }

    /// Queue one touch point report in native panel coordinates
    pub fn touch(&mut self, id: i32, x: i32, y: i32, pressure: i32) {
        self.push(RawEvent::abs(ABS_MT_TRACKING_ID, id));
        self.push(RawEvent::abs(ABS_MT_POSITION_X, x));
        self.push(RawEvent::abs(ABS_MT_POSITION_Y, y));
        self.push(RawEvent::abs(ABS_MT_TOUCH_MAJOR, pressure));
        self.push(RawEvent::syn(SYN_MT_REPORT));
        self.push(RawEvent::syn(SYN_REPORT));
    }

    /// Queue a key press followed by its release
    pub fn key_stroke(&mut self, code: u16) {
        self.push(RawEvent::key(code, 1));
        self.push(RawEvent::syn(SYN_REPORT));
        self.push(RawEvent::key(code, 0));
        self.push(RawEvent::syn(SYN_REPORT));
    }

    /// Events not read yet
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputDevice for ReplayInput {
    fn init(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    async fn read_event(&mut self) -> Result<RawEvent, InputError> {
        match self.events.pop_front() {
            Some(event) => Ok(event),
            None if self.close_when_empty => Err(InputError::Closed),
            None => core::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use recovery_protocol::codes::KEY_POWER;

    #[test]
    fn test_capture_decoding() {
        let layout = RecordLayout::Time64;
        let mut bytes = vec![0u8; layout.record_size() * 2 + 5];
        let size = layout.record_size();
        layout
            .encode(&RawEvent::key(KEY_POWER, 1), &mut bytes[..size])
            .unwrap();
        layout
            .encode(&RawEvent::syn(SYN_REPORT), &mut bytes[size..2 * size])
            .unwrap();

        let mut input = ReplayInput::from_capture(&bytes, layout).close_when_empty();
        assert_eq!(input.remaining(), 2);
        block_on(async {
            assert_eq!(input.read_event().await, Ok(RawEvent::key(KEY_POWER, 1)));
            assert_eq!(input.read_event().await, Ok(RawEvent::syn(SYN_REPORT)));
            assert_eq!(input.read_event().await, Err(InputError::Closed));
        });
    }

    #[test]
    fn test_touch_script() {
        let mut input = ReplayInput::new();
        input.touch(0, 100, 200, 40);
        assert_eq!(input.remaining(), 6);
        input.key_stroke(KEY_POWER);
        assert_eq!(input.remaining(), 10);
    }
}
