//! Configuration type definitions
//!
//! Screen geometry, font metrics, menu layout and device key combinations.
//! Everything here is plain data; the runtime loads it from TOML.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum keys in one combination
pub const MAX_COMBO_KEYS: usize = 4;

/// Screen resolution in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScreenConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 768,
            height: 1280,
        }
    }
}

/// Native touch panel bounds
///
/// A bound of 0 means the panel already reports logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TouchConfig {
    pub max_x: u16,
    pub max_y: u16,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            max_x: 1535,
            max_y: 2559,
        }
    }
}

/// Character cell size of the console font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontConfig {
    pub char_width: u16,
    pub char_height: u16,
}

impl FontConfig {
    /// Cell size for low-density panels
    pub const LDPI: Self = Self {
        char_width: 7,
        char_height: 16,
    };
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            char_width: 10,
            char_height: 18,
        }
    }
}

/// Menu button layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MenuConfig {
    /// Vertical spacing between successive button rows
    pub row_height: u16,
    /// Height of one button
    pub button_height: u16,
    /// Height of the control icon strip at the bottom of the screen
    pub control_strip_height: u16,
    /// Number of staggered button columns
    pub columns: u8,
    /// Share of the screen height (percent) usable by buttons
    pub page_percent: u8,
    /// Append a "go back" row to every menu
    pub show_back_button: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            row_height: 60,
            button_height: 120,
            control_strip_height: 100,
            columns: 2,
            page_percent: 80,
            show_back_button: false,
        }
    }
}

/// Device key combinations
///
/// A combination fires when its last key is pressed while all others are
/// held. Empty combinations never fire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComboConfig {
    pub toggle_display: Vec<u16, MAX_COMBO_KEYS>,
    pub reboot: Vec<u16, MAX_COMBO_KEYS>,
}

/// Complete UI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiConfig {
    pub screen: ScreenConfig,
    pub touch: TouchConfig,
    pub font: FontConfig,
    pub menu: MenuConfig,
    pub combos: ComboConfig,
    /// Animation and input poll rate
    pub refresh_hz: u8,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            touch: TouchConfig::default(),
            font: FontConfig::default(),
            menu: MenuConfig::default(),
            combos: ComboConfig::default(),
            refresh_hz: 24,
        }
    }
}

/// Configuration validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Screen width or height is zero
    ZeroScreen,
    /// Character cell width or height is zero
    ZeroFont,
    /// Row or button height is zero
    ZeroRowHeight,
    /// Column count outside 1..=4
    Columns,
    /// Page percentage outside 1..=100
    PagePercent,
    /// Refresh rate is zero
    RefreshRate,
}

impl UiConfig {
    /// Check that the configuration describes a usable layout
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ValidationError::ZeroScreen);
        }
        if self.font.char_width == 0 || self.font.char_height == 0 {
            return Err(ValidationError::ZeroFont);
        }
        if self.menu.row_height == 0 || self.menu.button_height == 0 {
            return Err(ValidationError::ZeroRowHeight);
        }
        if !(1..=4).contains(&self.menu.columns) {
            return Err(ValidationError::Columns);
        }
        if !(1..=100).contains(&self.menu.page_percent) {
            return Err(ValidationError::PagePercent);
        }
        if self.refresh_hz == 0 {
            return Err(ValidationError::RefreshRate);
        }
        Ok(())
    }

    /// Refresh period in milliseconds
    pub fn refresh_period_ms(&self) -> u64 {
        1000 / self.refresh_hz.max(1) as u64
    }
}
