//! Table of currently held keys

use recovery_hal::KeyState;
use recovery_protocol::codes::KEY_CNT;

/// Last reported value per key code (0 released, 1 pressed, 2 autorepeat)
#[derive(Debug, Clone)]
pub struct KeyTable {
    values: [u8; KEY_CNT],
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyTable {
    pub const fn new() -> Self {
        Self {
            values: [0; KEY_CNT],
        }
    }

    /// Record the latest value for a key; out-of-range codes are ignored
    pub fn record(&mut self, code: u16, value: i32) {
        if let Some(slot) = self.values.get_mut(code as usize) {
            *slot = value.clamp(0, u8::MAX as i32) as u8;
        }
    }

    /// Last recorded value for a key
    pub fn value(&self, code: u16) -> u8 {
        self.values.get(code as usize).copied().unwrap_or(0)
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.values = [0; KEY_CNT];
    }
}

impl KeyState for KeyTable {
    fn is_pressed(&self, code: u16) -> bool {
        self.value(code) != 0
    }
}
