//! Menu content, selection and pagination

use heapless::{String, Vec};
use recovery_protocol::{Touch, UiEvent};

use super::layout::{Control, MenuGeometry};
use crate::console::LOG_MAX_ROWS;

/// Maximum header lines plus menu rows
pub const MENU_MAX_ROWS: usize = 250;

/// Maximum characters per menu line
pub const MENU_MAX_COLS: usize = 64;

/// Text of the synthetic "go back" row
pub const BACK_ROW_TEXT: &str = " - +++++Go Back+++++";

/// One line of menu text
pub type MenuLine = String<MENU_MAX_COLS>;

/// One selectable menu row
///
/// Items too long for a button are split: `text` holds the head followed
/// by a `-` continuation mark and `continuation` holds the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuRow {
    pub text: MenuLine,
    pub continuation: Option<MenuLine>,
}

impl MenuRow {
    /// Returns true if the row is drawn as two lines
    pub fn is_split(&self) -> bool {
        self.continuation.is_some()
    }
}

/// Outcome of a touch gesture on a shown menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Gesture did not hit anything
    NoAction,
    /// Row tapped
    Select(usize),
    /// Back control, or swipe back on the first page
    GoBack,
    /// Move the highlight down
    HighlightDown,
    /// Move the highlight up
    HighlightUp,
    /// Activate the highlighted row
    SelectItem,
    /// Swiped to another page; the payload is the new selection
    Page(usize),
}

impl From<Control> for MenuAction {
    fn from(control: Control) -> Self {
        match control {
            Control::Back => MenuAction::GoBack,
            Control::Down => MenuAction::HighlightDown,
            Control::Up => MenuAction::HighlightUp,
            Control::Select => MenuAction::SelectItem,
        }
    }
}

/// A shown menu
#[derive(Debug, Clone)]
pub struct Menu {
    geometry: MenuGeometry,
    headers: Vec<MenuLine, LOG_MAX_ROWS>,
    rows: Vec<MenuRow, MENU_MAX_ROWS>,
    /// Rows returned to the caller (excludes the back row)
    item_count: usize,
    start: usize,
    selection: usize,
    /// Control icon highlighted by the current touch
    pressed_control: Option<Control>,
}

impl Menu {
    /// Build a menu
    ///
    /// Headers beyond the console height and items beyond the row capacity
    /// are dropped. `initial_selection` is clamped to the item range.
    pub fn new(
        geometry: MenuGeometry,
        headers: &[&str],
        items: &[&str],
        initial_selection: usize,
        back_row: bool,
    ) -> Self {
        let mut header_lines = Vec::new();
        for header in headers.iter().take(geometry.text_rows.min(LOG_MAX_ROWS)) {
            let _ = header_lines.push(center_header(&geometry, header));
        }

        let capacity = MENU_MAX_ROWS - header_lines.len() - usize::from(back_row);
        let mut rows = Vec::new();
        for item in items.iter().take(capacity) {
            let _ = rows.push(split_item(&geometry, item));
        }
        let item_count = rows.len();
        if back_row {
            let _ = rows.push(MenuRow {
                text: truncated(BACK_ROW_TEXT.chars(), MENU_MAX_COLS),
                continuation: None,
            });
        }

        let selection = initial_selection.min(rows.len().saturating_sub(1));
        let mut menu = Self {
            geometry,
            headers: header_lines,
            rows,
            item_count,
            start: selection,
            selection,
            pressed_control: None,
        };
        menu.scroll_to_selection();
        menu
    }

    /// Selectable items, not counting the back row
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// All rows including the back row
    pub fn rows(&self) -> &[MenuRow] {
        &self.rows
    }

    pub fn headers(&self) -> &[MenuLine] {
        &self.headers
    }

    pub fn geometry(&self) -> &MenuGeometry {
        &self.geometry
    }

    /// Selected row
    pub fn selection(&self) -> usize {
        self.selection
    }

    /// First row of the visible page
    pub fn window_start(&self) -> usize {
        self.start
    }

    /// Rows per page
    pub fn visible_rows(&self) -> usize {
        self.geometry.visible_rows(self.headers.len())
    }

    /// Rows drawn on the current page
    pub fn page_rows(&self) -> usize {
        self.visible_rows().min(self.rows.len() - self.start)
    }

    /// More rows follow the current page
    pub fn has_more_below(&self) -> bool {
        self.start + self.visible_rows() < self.rows.len()
    }

    /// Rows precede the current page
    pub fn has_more_above(&self) -> bool {
        self.start > 0
    }

    pub fn pressed_control(&self) -> Option<Control> {
        self.pressed_control
    }

    /// Move the selection
    ///
    /// Negative targets count from the end, targets past the end wrap to
    /// the start. Returns the normalized selection.
    pub fn select(&mut self, target: isize) -> usize {
        let len = self.rows.len();
        if len == 0 {
            return 0;
        }
        self.selection = target.rem_euclid(len as isize) as usize;
        self.scroll_to_selection();
        self.selection
    }

    /// Row under a point on the current page
    pub fn row_at(&self, x: i32, y: i32) -> Option<usize> {
        self.geometry
            .row_at(x, y, self.headers.len(), self.page_rows())
            .map(|index| self.start + index)
            .filter(|&row| row < self.rows.len())
    }

    /// Live feedback for a held touch
    ///
    /// Over a row the row becomes the selection; over the control strip
    /// the icon is highlighted. Returns true if anything changed.
    pub fn highlight_at(&mut self, touch: &Touch) -> bool {
        if touch.pressure <= 0 {
            return false;
        }

        if self.geometry.in_strip(touch.y) {
            return match self.geometry.control_at(touch.x) {
                Some(control) if self.pressed_control != Some(control) => {
                    self.pressed_control = Some(control);
                    true
                }
                _ => false,
            };
        }

        match self.row_at(touch.x, touch.y) {
            Some(row) if row != self.selection => {
                self.selection = row;
                true
            }
            _ => false,
        }
    }

    /// Map a finished touch gesture to an action
    ///
    /// Horizontal swipes page the menu; short touches hit rows or controls.
    pub fn handle_touch(&mut self, event: &UiEvent) -> MenuAction {
        let touch = match event {
            UiEvent::Up(t) | UiEvent::Tap(t) | UiEvent::ScrollUp(t) | UiEvent::ScrollDown(t) => t,
            _ => return MenuAction::NoAction,
        };

        let height = self.geometry.height;
        let is_scroll = matches!(event, UiEvent::ScrollUp(_) | UiEvent::ScrollDown(_));
        let horizontal = (touch.path_len.abs() - touch.run_x.abs()).abs() < height / 5;

        if is_scroll && horizontal {
            return self.page(matches!(event, UiEvent::ScrollUp(_)));
        }
        if touch.path_len >= height / 10 {
            return MenuAction::NoAction;
        }

        if self.geometry.in_strip(touch.y) {
            self.geometry
                .control_at(touch.x)
                .map_or(MenuAction::NoAction, MenuAction::from)
        } else {
            self.row_at(touch.x, touch.y)
                .map_or(MenuAction::NoAction, MenuAction::Select)
        }
    }

    /// Clear touch highlight state
    pub fn release_highlight(&mut self) {
        self.pressed_control = None;
    }

    fn page(&mut self, forward: bool) -> MenuAction {
        let visible = self.visible_rows();
        let last = self.rows.len().saturating_sub(1);

        if forward {
            if !self.has_more_below() {
                return MenuAction::NoAction;
            }
            self.start = (self.start + visible.saturating_sub(2).max(1)).min(self.max_start());
            self.selection = (self.start + 1).min(last);
        } else {
            if self.start == 0 {
                return MenuAction::GoBack;
            }
            self.start = self.start.saturating_sub(visible);
            self.selection = self.start;
        }
        MenuAction::Page(self.selection)
    }

    fn max_start(&self) -> usize {
        self.rows.len().saturating_sub(self.visible_rows())
    }

    fn scroll_to_selection(&mut self) {
        let visible = self.visible_rows();
        if self.selection < self.start {
            self.start = self.selection;
        }
        if self.selection >= self.start + visible {
            self.start = self.selection + 1 - visible;
        }
        self.start = self.start.min(self.max_start());
    }
}

fn truncated(chars: impl Iterator<Item = char>, max: usize) -> MenuLine {
    let mut line = MenuLine::new();
    for c in chars.take(max) {
        if line.push(c).is_err() {
            break;
        }
    }
    line
}

fn center_header(geometry: &MenuGeometry, header: &str) -> MenuLine {
    let len = header.chars().count() as i32;
    let pad = ((geometry.width - len * geometry.char_width) / (geometry.char_width * 2)).max(0);
    let padded = core::iter::repeat(' ').take(pad as usize).chain(header.chars());
    truncated(padded, geometry.text_cols)
}

fn split_item(geometry: &MenuGeometry, item: &str) -> MenuRow {
    let allowed = geometry.allowed_chars;
    let len = item.chars().count();
    if len <= allowed {
        return MenuRow {
            text: truncated(item.chars(), geometry.text_cols.saturating_sub(1)),
            continuation: None,
        };
    }

    let head = allowed - 2;
    let text = truncated(item.chars().take(head).chain(core::iter::once('-')), MENU_MAX_COLS);
    let rest = item.chars().skip(head);
    let continuation = if len > 2 * allowed - 1 {
        truncated(rest.take(allowed - 3).chain("...".chars()), MENU_MAX_COLS)
    } else {
        truncated(rest, geometry.text_cols.saturating_sub(3))
    };

    MenuRow {
        text,
        continuation: Some(continuation),
    }
}
