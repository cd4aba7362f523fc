//! Bounded FIFO of discrete events
//!
//! The producer never blocks: when the buffer is full the new event is
//! dropped. Consecutive moves are coalesced so drags cannot flood the
//! buffer. Every produced event gets a sequence number whether or not it
//! is queued, so the consumer can tell which release directly followed
//! the event that drew live highlight feedback.

use heapless::Deque;
use recovery_protocol::UiEvent;

/// Maximum pending events
pub const KEY_QUEUE_CAPACITY: usize = 256;

/// What happened to a pushed event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PushOutcome {
    /// Appended to the buffer
    Queued,
    /// Move discarded because the newest entry already is a move
    Coalesced,
    /// Buffer full, event discarded
    Dropped,
}

/// Result of a push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pushed {
    /// Sequence number assigned to the event
    pub seq: u32,
    pub outcome: PushOutcome,
}

/// Event handed to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPress {
    pub event: UiEvent,
    /// True for a release whose preceding event drew highlight feedback
    pub after_feedback: bool,
}

/// Bounded event FIFO
#[derive(Debug, Clone)]
pub struct KeyBuffer {
    entries: Deque<(u32, UiEvent), KEY_QUEUE_CAPACITY>,
    next_seq: u32,
    feedback_seq: Option<u32>,
}

impl Default for KeyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBuffer {
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            next_seq: 0,
            feedback_seq: None,
        }
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an event without blocking
    pub fn push(&mut self, event: UiEvent) -> Pushed {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        let tail_is_move = self.entries.back().is_some_and(|(_, e)| e.is_move());
        let outcome = if event.is_move() && tail_is_move {
            PushOutcome::Coalesced
        } else if self.entries.push_back((seq, event)).is_err() {
            PushOutcome::Dropped
        } else {
            PushOutcome::Queued
        };

        Pushed { seq, outcome }
    }

    /// Record that live highlight feedback was drawn for event `seq`
    pub fn mark_feedback(&mut self, seq: u32) {
        self.feedback_seq = Some(seq);
    }

    /// Remove the oldest event
    pub fn pop(&mut self) -> Option<KeyPress> {
        let (seq, event) = self.entries.pop_front()?;
        let after_feedback =
            event.is_release() && self.feedback_seq == Some(seq.wrapping_sub(1));
        Some(KeyPress {
            event,
            after_feedback,
        })
    }

    /// Drop all pending events
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_protocol::codes::{KEY_DOWN, KEY_UP};
    use recovery_protocol::Touch;

    fn touch_at(x: i32, y: i32) -> Touch {
        Touch {
            x,
            y,
            pressure: 40,
            ..Touch::default()
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut buffer = KeyBuffer::new();
        buffer.push(UiEvent::Key(KEY_UP));
        buffer.push(UiEvent::Key(KEY_DOWN));
        assert_eq!(buffer.pop().unwrap().event, UiEvent::Key(KEY_UP));
        assert_eq!(buffer.pop().unwrap().event, UiEvent::Key(KEY_DOWN));
        assert!(buffer.pop().is_none());
    }

    #[test]
    fn test_overflow_drops_newest() {
        let mut buffer = KeyBuffer::new();
        for _ in 0..KEY_QUEUE_CAPACITY {
            assert_eq!(buffer.push(UiEvent::Key(KEY_UP)).outcome, PushOutcome::Queued);
        }
        assert_eq!(buffer.push(UiEvent::Key(KEY_DOWN)).outcome, PushOutcome::Dropped);
        assert_eq!(buffer.len(), KEY_QUEUE_CAPACITY);
    }

    #[test]
    fn test_consecutive_moves_coalesce() {
        let mut buffer = KeyBuffer::new();
        buffer.push(UiEvent::Down(touch_at(1, 1)));
        assert_eq!(buffer.push(UiEvent::Move(touch_at(2, 2))).outcome, PushOutcome::Queued);
        assert_eq!(buffer.push(UiEvent::Move(touch_at(3, 3))).outcome, PushOutcome::Coalesced);
        buffer.push(UiEvent::Up(touch_at(3, 3)));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_release_after_feedback() {
        let mut buffer = KeyBuffer::new();
        let down = buffer.push(UiEvent::Down(touch_at(5, 5)));
        buffer.mark_feedback(down.seq);
        buffer.push(UiEvent::Tap(touch_at(5, 5)));

        assert!(!buffer.pop().unwrap().after_feedback);
        assert!(buffer.pop().unwrap().after_feedback);

        // A release that did not directly follow the feedback event
        let down = buffer.push(UiEvent::Down(touch_at(5, 5)));
        buffer.mark_feedback(down.seq);
        buffer.push(UiEvent::Key(KEY_UP));
        buffer.push(UiEvent::Up(touch_at(5, 5)));
        buffer.pop();
        buffer.pop();
        assert!(!buffer.pop().unwrap().after_feedback);
    }

    #[test]
    fn test_clear() {
        let mut buffer = KeyBuffer::new();
        buffer.push(UiEvent::Key(KEY_UP));
        buffer.clear();
        assert!(buffer.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bounded_and_ordered(codes in proptest::collection::vec(1u16..700, 0..600)) {
                let mut buffer = KeyBuffer::new();
                for &code in &codes {
                    buffer.push(UiEvent::Key(code));
                    prop_assert!(buffer.len() <= KEY_QUEUE_CAPACITY);
                }
                let kept = codes.len().min(KEY_QUEUE_CAPACITY);
                for &code in &codes[..kept] {
                    prop_assert_eq!(buffer.pop().map(|k| k.event), Some(UiEvent::Key(code)));
                }
                prop_assert!(buffer.pop().is_none());
            }
        }
    }
}
