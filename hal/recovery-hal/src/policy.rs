//! Device policy hooks
//!
//! Everything that differs between devices but not between UI builds:
//! touch panel scaling, key combinations and the reboot action.

/// Read access to the table of currently held keys
pub trait KeyState {
    /// Returns true if the key is currently held
    fn is_pressed(&self, code: u16) -> bool;
}

/// Device-specific input policy
pub trait DevicePolicy {
    /// Scale a native touch X coordinate to logical screen pixels
    fn normalize_x(&self, raw: i32) -> i32;

    /// Scale a native touch Y coordinate to logical screen pixels
    fn normalize_y(&self, raw: i32) -> i32;

    /// Returns true if `code` completes the display toggle combination
    ///
    /// `keys` already reflects the press of `code`.
    fn toggle_display(&self, keys: &dyn KeyState, code: u16) -> bool;

    /// Returns true if `code` completes the immediate reboot combination
    fn reboot_now(&self, keys: &dyn KeyState, code: u16) -> bool;

    /// Reboot the device
    fn reboot(&self);
}
