//! Configurable device policy
//!
//! Linear touch scaling from the panel's native bounds to the screen and
//! key combinations taken from the configuration. The reboot action is
//! supplied by the runtime.

use recovery_hal::{DevicePolicy, KeyState};

use crate::config::{ComboConfig, ScreenConfig, TouchConfig, UiConfig};

/// Device policy driven by [`UiConfig`]
#[derive(Debug, Clone)]
pub struct PanelPolicy<F = fn()> {
    screen: ScreenConfig,
    touch: TouchConfig,
    combos: ComboConfig,
    reboot: F,
}

impl<F: Fn()> PanelPolicy<F> {
    pub fn new(config: &UiConfig, reboot: F) -> Self {
        Self {
            screen: config.screen,
            touch: config.touch,
            combos: config.combos.clone(),
            reboot,
        }
    }
}

/// Scale `raw` from `0..=native` to `0..=logical`; identity when unset
fn scale(raw: i32, native: u16, logical: u16) -> i32 {
    if native == 0 {
        return raw;
    }
    (raw as i64 * logical as i64 / native as i64) as i32
}

/// True if `code` is part of a non-empty combo whose keys are all held
fn combo_complete(combo: &[u16], keys: &dyn KeyState, code: u16) -> bool {
    !combo.is_empty() && combo.contains(&code) && combo.iter().all(|&key| keys.is_pressed(key))
}

impl<F: Fn()> DevicePolicy for PanelPolicy<F> {
    fn normalize_x(&self, raw: i32) -> i32 {
        scale(raw, self.touch.max_x, self.screen.width)
    }

    fn normalize_y(&self, raw: i32) -> i32 {
        scale(raw, self.touch.max_y, self.screen.height)
    }

    fn toggle_display(&self, keys: &dyn KeyState, code: u16) -> bool {
        combo_complete(&self.combos.toggle_display, keys, code)
    }

    fn reboot_now(&self, keys: &dyn KeyState, code: u16) -> bool {
        combo_complete(&self.combos.reboot, keys, code)
    }

    fn reboot(&self) {
        (self.reboot)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyTable;
    use core::cell::Cell;
    use recovery_protocol::codes::{KEY_POWER, KEY_VOLUMEDOWN, KEY_VOLUMEUP};

    #[test]
    fn test_touch_scaling() {
        let policy = PanelPolicy::new(&UiConfig::default(), || {});
        assert_eq!(policy.normalize_x(1535), 768);
        assert_eq!(policy.normalize_y(2559), 1280);
        assert_eq!(policy.normalize_x(0), 0);
        assert_eq!(policy.normalize_y(1000), 500);
    }

    #[test]
    fn test_identity_when_unset() {
        let mut config = UiConfig::default();
        config.touch.max_x = 0;
        config.touch.max_y = 0;
        let policy = PanelPolicy::new(&config, || {});
        assert_eq!(policy.normalize_x(1234), 1234);
        assert_eq!(policy.normalize_y(77), 77);
    }

    #[test]
    fn test_combos() {
        let mut config = UiConfig::default();
        config.combos.toggle_display.push(KEY_VOLUMEUP).unwrap();
        config.combos.toggle_display.push(KEY_POWER).unwrap();
        let policy = PanelPolicy::new(&config, || {});

        let mut keys = KeyTable::new();
        keys.record(KEY_POWER, 1);
        assert!(!policy.toggle_display(&keys, KEY_POWER));
        keys.record(KEY_VOLUMEUP, 1);
        assert!(policy.toggle_display(&keys, KEY_VOLUMEUP));
        // Keys outside the combo never complete it
        keys.record(KEY_VOLUMEDOWN, 1);
        assert!(!policy.toggle_display(&keys, KEY_VOLUMEDOWN));
        // Empty combo
        assert!(!policy.reboot_now(&keys, KEY_POWER));
    }

    #[test]
    fn test_reboot_hook() {
        let called = Cell::new(false);
        let policy = PanelPolicy::new(&UiConfig::default(), || called.set(true));
        policy.reboot();
        assert!(called.get());
    }
}
