//! Decoding of evdev `input_event` records
//!
//! Record format (little-endian):
//! - TV_SEC (8 or 4 bytes): timestamp seconds
//! - TV_USEC (8 or 4 bytes): timestamp microseconds
//! - TYPE (2 bytes): event type
//! - CODE (2 bytes): event code
//! - VALUE (4 bytes): signed value
//!
//! 64-bit kernels produce 24-byte records, 32-bit kernels 16-byte records.
//! The timestamp is skipped; the UI keeps its own clock.

use heapless::Vec;

use crate::events::RawEvent;

/// Largest supported record size
pub const MAX_RECORD_SIZE: usize = 24;

/// Errors that can occur while encoding records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Record layout, determined by the width of `struct timeval`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordLayout {
    /// 64-bit `timeval` (24-byte records)
    #[default]
    Time64,
    /// 32-bit `timeval` (16-byte records)
    Time32,
}

impl RecordLayout {
    /// Size of one record in bytes
    pub const fn record_size(self) -> usize {
        match self {
            RecordLayout::Time64 => 24,
            RecordLayout::Time32 => 16,
        }
    }

    /// Offset of the TYPE field
    const fn header_size(self) -> usize {
        self.record_size() - 8
    }

    /// Encode an event into a buffer with a zero timestamp
    ///
    /// Returns the number of bytes written
    pub fn encode(self, event: &RawEvent, buffer: &mut [u8]) -> Result<usize, WireError> {
        let size = self.record_size();
        if buffer.len() < size {
            return Err(WireError::BufferTooSmall);
        }

        let header = self.header_size();
        buffer[..header].fill(0);
        buffer[header..header + 2].copy_from_slice(&event.kind.to_le_bytes());
        buffer[header + 2..header + 4].copy_from_slice(&event.code.to_le_bytes());
        buffer[header + 4..size].copy_from_slice(&event.value.to_le_bytes());

        Ok(size)
    }

    /// Decode a complete record
    fn decode(self, record: &[u8]) -> RawEvent {
        let header = self.header_size();
        let kind = u16::from_le_bytes([record[header], record[header + 1]]);
        let code = u16::from_le_bytes([record[header + 2], record[header + 3]]);
        let value = i32::from_le_bytes([
            record[header + 4],
            record[header + 5],
            record[header + 6],
            record[header + 7],
        ]);
        RawEvent::new(kind, code, value)
    }
}

/// Incremental reader for a stream of `input_event` records
///
/// Bytes may arrive in arbitrary chunks; a record is produced once all of
/// its bytes have been fed.
#[derive(Debug, Clone)]
pub struct EventReader {
    layout: RecordLayout,
    buffer: Vec<u8, MAX_RECORD_SIZE>,
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new(RecordLayout::default())
    }
}

impl EventReader {
    /// Create a reader for the given record layout
    pub fn new(layout: RecordLayout) -> Self {
        Self {
            layout,
            buffer: Vec::new(),
        }
    }

    /// Record layout this reader decodes
    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Number of bytes of an incomplete record currently buffered
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Reset the reader state, discarding any partial record
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Feed a single byte to the reader
    ///
    /// Returns `Some(event)` when the byte completes a record.
    pub fn feed(&mut self, byte: u8) -> Option<RawEvent> {
        // Cannot overflow: the buffer is drained at record_size <= capacity
        let _ = self.buffer.push(byte);
        if self.buffer.len() < self.layout.record_size() {
            return None;
        }

        let event = self.layout.decode(&self.buffer);
        self.buffer.clear();
        Some(event)
    }

    /// Feed a chunk of bytes, calling `sink` for every completed record
    ///
    /// Returns the number of records decoded.
    pub fn feed_slice(&mut self, bytes: &[u8], mut sink: impl FnMut(RawEvent)) -> usize {
        let mut count = 0;
        for &byte in bytes {
            if let Some(event) = self.feed(byte) {
                sink(event);
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::*;

    fn capture(layout: RecordLayout, events: &[RawEvent]) -> Vec<u8, 256> {
        let mut out = Vec::new();
        let mut record = [0u8; MAX_RECORD_SIZE];
        for event in events {
            let len = layout.encode(event, &mut record).unwrap();
            out.extend_from_slice(&record[..len]).unwrap();
        }
        out
    }

    #[test]
    fn test_decode_64bit_record() {
        // Hand-built record: timestamp 1.5s, EV_ABS, ABS_MT_POSITION_X, 300
        let mut record = [0u8; 24];
        record[0] = 1;
        record[8..12].copy_from_slice(&500_000u32.to_le_bytes());
        record[16..18].copy_from_slice(&EV_ABS.to_le_bytes());
        record[18..20].copy_from_slice(&ABS_MT_POSITION_X.to_le_bytes());
        record[20..24].copy_from_slice(&300i32.to_le_bytes());

        let mut reader = EventReader::new(RecordLayout::Time64);
        for &byte in &record[..23] {
            assert_eq!(reader.feed(byte), None);
        }
        assert_eq!(
            reader.feed(record[23]),
            Some(RawEvent::abs(ABS_MT_POSITION_X, 300))
        );
        assert_eq!(reader.pending(), 0);
    }

    #[test]
    fn test_decode_32bit_negative_value() {
        let bytes = capture(RecordLayout::Time32, &[RawEvent::rel(REL_Y, -4)]);
        assert_eq!(bytes.len(), 16);

        let mut reader = EventReader::new(RecordLayout::Time32);
        let mut decoded = None;
        assert_eq!(reader.feed_slice(&bytes, |e| decoded = Some(e)), 1);
        assert_eq!(decoded, Some(RawEvent::rel(REL_Y, -4)));
    }

    #[test]
    fn test_chunked_stream() {
        let events = [
            RawEvent::abs(ABS_MT_TRACKING_ID, 0),
            RawEvent::abs(ABS_MT_TOUCH_MAJOR, 40),
            RawEvent::syn(SYN_MT_REPORT),
            RawEvent::key(KEY_POWER, 1),
        ];
        let bytes = capture(RecordLayout::Time64, &events);

        let mut reader = EventReader::default();
        let mut decoded: Vec<RawEvent, 8> = Vec::new();
        for chunk in bytes.chunks(7) {
            reader.feed_slice(chunk, |e| decoded.push(e).unwrap());
        }
        assert_eq!(&decoded[..], &events[..]);
    }

    #[test]
    fn test_reset_discards_partial_record() {
        let mut reader = EventReader::default();
        reader.feed(0xFF);
        reader.feed(0xFF);
        assert_eq!(reader.pending(), 2);
        reader.reset();
        assert_eq!(reader.pending(), 0);

        let bytes = capture(RecordLayout::Time64, &[RawEvent::key(KEY_UP, 1)]);
        let mut last = None;
        reader.feed_slice(&bytes, |e| last = Some(e));
        assert_eq!(last, Some(RawEvent::key(KEY_UP, 1)));
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut small = [0u8; 16];
        assert_eq!(
            RecordLayout::Time64.encode(&RawEvent::key(KEY_UP, 1), &mut small),
            Err(WireError::BufferTooSmall)
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn record_count_matches_stream_length(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
                let mut reader = EventReader::new(RecordLayout::Time32);
                let count = reader.feed_slice(&bytes, |_| {});
                prop_assert_eq!(count, bytes.len() / 16);
                prop_assert_eq!(reader.pending(), bytes.len() % 16);
            }
        }
    }
}
