//! Key queue shared by the input task and the consumer
//!
//! The buffer and the held-key table sit behind one short critical
//! section; a signal wakes the consumer when an event is queued.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use recovery_core::input::{KeyBuffer, KeyPress, KeyTable, PushOutcome, Pushed};
use recovery_protocol::UiEvent;

struct Keys {
    buffer: KeyBuffer,
    pressed: KeyTable,
}

/// Pending events plus the held-key table
pub struct KeyQueue {
    keys: Mutex<CriticalSectionRawMutex, RefCell<Keys>>,
    ready: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for KeyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyQueue {
    pub const fn new() -> Self {
        Self {
            keys: Mutex::new(RefCell::new(Keys {
                buffer: KeyBuffer::new(),
                pressed: KeyTable::new(),
            })),
            ready: Signal::new(),
        }
    }

    /// Queue an event without blocking
    pub fn push(&self, event: UiEvent) -> Pushed {
        let pushed = self.keys.lock(|keys| keys.borrow_mut().buffer.push(event));
        if pushed.outcome == PushOutcome::Queued {
            self.ready.signal(());
        }
        pushed
    }

    /// Record that live feedback was drawn for event `seq`
    pub fn mark_feedback(&self, seq: u32) {
        self.keys.lock(|keys| keys.borrow_mut().buffer.mark_feedback(seq));
    }

    /// Update the held-key table
    pub fn record(&self, code: u16, value: i32) {
        self.keys.lock(|keys| keys.borrow_mut().pressed.record(code, value));
    }

    /// Returns true if `code` is held
    pub fn is_pressed(&self, code: u16) -> bool {
        self.keys.lock(|keys| keys.borrow().pressed.value(code) != 0)
    }

    /// Run `f` against the held-key table
    pub fn with_pressed<T>(&self, f: impl FnOnce(&KeyTable) -> T) -> T {
        self.keys.lock(|keys| f(&keys.borrow().pressed))
    }

    /// Take the oldest event, if any
    pub fn try_pop(&self) -> Option<KeyPress> {
        self.keys.lock(|keys| keys.borrow_mut().buffer.pop())
    }

    /// Wait for the next event
    pub async fn wait(&self) -> KeyPress {
        loop {
            if let Some(key) = self.try_pop() {
                return key;
            }
            self.ready.wait().await;
        }
    }

    /// Drop all pending events
    pub fn clear(&self) {
        self.keys.lock(|keys| keys.borrow_mut().buffer.clear());
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.keys.lock(|keys| keys.borrow().buffer.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use recovery_protocol::codes::{KEY_DOWN, KEY_POWER, KEY_UP};
    use recovery_protocol::Touch;

    #[test]
    fn test_fifo_order() {
        let queue = KeyQueue::new();
        queue.push(UiEvent::Key(KEY_DOWN));
        queue.push(UiEvent::Key(KEY_UP));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_pop().unwrap().event, UiEvent::Key(KEY_DOWN));
        assert_eq!(queue.try_pop().unwrap().event, UiEvent::Key(KEY_UP));
        assert!(queue.try_pop().is_none());
    }

    #[test]
    fn test_wait_wakes_on_push() {
        let queue = KeyQueue::new();
        let (key, _) = block_on(join(queue.wait(), async {
            queue.push(UiEvent::Key(KEY_POWER));
        }));
        assert_eq!(key.event, UiEvent::Key(KEY_POWER));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_coalesced_moves() {
        let queue = KeyQueue::new();
        let touch = Touch::default();
        assert_eq!(queue.push(UiEvent::Move(touch)).outcome, PushOutcome::Queued);
        assert_eq!(queue.push(UiEvent::Move(touch)).outcome, PushOutcome::Coalesced);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_pressed_table() {
        let queue = KeyQueue::new();
        queue.record(KEY_POWER, 1);
        assert!(queue.is_pressed(KEY_POWER));
        assert!(queue.with_pressed(|keys| keys.value(KEY_POWER) == 1));
        queue.record(KEY_POWER, 0);
        assert!(!queue.is_pressed(KEY_POWER));
    }

    #[test]
    fn test_clear() {
        let queue = KeyQueue::new();
        queue.push(UiEvent::Key(KEY_DOWN));
        queue.clear();
        assert!(queue.is_empty());
    }
}
