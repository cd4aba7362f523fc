//! Linux input event codes used by the recovery UI
//!
//! Values match `linux/input-event-codes.h`.

// Event types
pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;

// Synchronization codes
pub const SYN_REPORT: u16 = 0;
pub const SYN_MT_REPORT: u16 = 2;

// Relative axes
pub const REL_X: u16 = 0x00;
pub const REL_Y: u16 = 0x01;

// Multi-touch absolute axes
pub const ABS_MT_TOUCH_MAJOR: u16 = 0x30;
pub const ABS_MT_WIDTH_MAJOR: u16 = 0x32;
pub const ABS_MT_POSITION_X: u16 = 0x35;
pub const ABS_MT_POSITION_Y: u16 = 0x36;
pub const ABS_MT_TRACKING_ID: u16 = 0x39;

// Keys
pub const KEY_ENTER: u16 = 28;
pub const KEY_HOME: u16 = 102;
pub const KEY_UP: u16 = 103;
pub const KEY_LEFT: u16 = 105;
pub const KEY_RIGHT: u16 = 106;
pub const KEY_END: u16 = 107;
pub const KEY_DOWN: u16 = 108;
pub const KEY_VOLUMEDOWN: u16 = 114;
pub const KEY_VOLUMEUP: u16 = 115;
pub const KEY_POWER: u16 = 116;
pub const KEY_MENU: u16 = 139;
pub const KEY_BACK: u16 = 158;
pub const KEY_SCROLLUP: u16 = 177;
pub const KEY_SCROLLDOWN: u16 = 178;
pub const KEY_CAMERA: u16 = 212;
pub const KEY_SEARCH: u16 = 217;

/// Left mouse button; reported by pointer-style devices
pub const BTN_MOUSE: u16 = 0x110;

/// Highest valid key code
pub const KEY_MAX: u16 = 0x2ff;

/// Number of entries in a per-key table
pub const KEY_CNT: usize = KEY_MAX as usize + 1;
