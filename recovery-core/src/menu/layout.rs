//! Menu geometry
//!
//! Buttons are laid out in `columns` staggered columns: item `i` sits
//! `i * row_height` below the header, in column `i % columns`, and is
//! `button_height` tall. With two columns and a button twice the row
//! height, left and right buttons interleave.
//!
//! ```text
//!  ┌──────────── header lines ────────────┐
//!  │ ┌────────┐                           │
//!  │ │ item 0 │ ┌────────┐                │
//!  │ └────────┘ │ item 1 │                │
//!  │ ┌────────┐ └────────┘                │
//!  │ │ item 2 │ ┌────────┐                │
//!  │ └────────┘ │ item 3 │                │
//!  ├──────────── control strip ───────────┤
//!  │  back   down     up    select        │
//!  └──────────────────────────────────────┘
//! ```

use crate::config::UiConfig;
use crate::console::LOG_MAX_ROWS;

/// Icons of the control strip, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    Back,
    Down,
    Up,
    Select,
}

impl Control {
    /// All controls in strip order
    pub const ALL: [Control; 4] = [Control::Back, Control::Down, Control::Up, Control::Select];

    /// Position in the strip
    pub fn index(self) -> usize {
        match self {
            Control::Back => 0,
            Control::Down => 1,
            Control::Up => 2,
            Control::Select => 3,
        }
    }
}

/// Pixel geometry of menus on one screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuGeometry {
    pub width: i32,
    pub height: i32,
    pub char_width: i32,
    pub char_height: i32,
    pub row_height: i32,
    pub button_height: i32,
    pub strip_height: i32,
    pub columns: i32,
    /// Button rows that fit on one page
    pub max_rows: i32,
    /// Console text columns
    pub text_cols: usize,
    /// Console text rows
    pub text_rows: usize,
    /// Characters per button before an item is split
    pub allowed_chars: usize,
}

impl MenuGeometry {
    pub fn from_config(config: &UiConfig) -> Self {
        let width = config.screen.width as i32;
        let height = config.screen.height as i32;
        let char_width = (config.font.char_width as i32).max(1);
        let char_height = (config.font.char_height as i32).max(1);
        let row_height = (config.menu.row_height as i32).max(1);

        Self {
            width,
            height,
            char_width,
            char_height,
            row_height,
            button_height: (config.menu.button_height as i32).max(1),
            strip_height: config.menu.control_strip_height as i32,
            columns: (config.menu.columns as i32).max(1),
            max_rows: height * config.menu.page_percent as i32 / 100 / row_height,
            text_cols: ((width / char_width) as usize).min(95),
            text_rows: ((height / char_height) as usize).min(LOG_MAX_ROWS),
            allowed_chars: ((width * 2 / 5 / char_width) as usize).max(3),
        }
    }

    /// Button rows taken up by `lines` text lines
    pub fn button_equivalent(&self, lines: usize) -> i32 {
        lines as i32 * self.char_height / self.row_height
    }

    /// Y where the first button starts
    pub fn header_offset(&self, headers: usize) -> i32 {
        headers as i32 * self.char_height
    }

    /// Buttons visible on one page below `headers` header lines
    pub fn visible_rows(&self, headers: usize) -> usize {
        (self.max_rows - self.button_equivalent(headers)).max(1) as usize
    }

    /// Column of item `index` on the page
    pub fn column_of(&self, index: usize) -> i32 {
        index as i32 % self.columns
    }

    /// Top-left corner of the button for page-relative item `index`
    pub fn button_origin(&self, index: usize, headers: usize) -> (i32, i32) {
        let column_width = self.width / self.columns;
        (
            self.column_of(index) * column_width,
            self.header_offset(headers) + index as i32 * self.row_height,
        )
    }

    /// True if `y` lies in the control strip
    pub fn in_strip(&self, y: i32) -> bool {
        y > self.height - self.strip_height
    }

    /// Horizontal hit-box (exclusive bounds) of a control icon
    pub fn control_bounds(&self, control: Control) -> (i32, i32) {
        let slot = self.width / Control::ALL.len() as i32;
        let left = control.index() as i32 * slot;
        (left, left + slot)
    }

    /// Center of a control icon
    pub fn control_center(&self, control: Control) -> (i32, i32) {
        let (left, right) = self.control_bounds(control);
        ((left + right) / 2, self.height - self.strip_height / 2)
    }

    /// Control under `x`, if any
    pub fn control_at(&self, x: i32) -> Option<Control> {
        Control::ALL.into_iter().find(|&control| {
            let (left, right) = self.control_bounds(control);
            left < x && x < right
        })
    }

    /// Page-relative item under a point, given `page_rows` drawn buttons
    pub fn row_at(&self, x: i32, y: i32, headers: usize, page_rows: usize) -> Option<usize> {
        let top = self.header_offset(headers);
        if y <= top || y >= top + page_rows as i32 * self.row_height || x < 0 || x >= self.width {
            return None;
        }

        let column = x * self.columns / self.width;
        let offset = y - top - column * self.row_height;
        if offset < 0 {
            return None;
        }
        let index = (offset / (self.columns * self.row_height) * self.columns + column) as usize;
        (index < page_rows).then_some(index)
    }
}
