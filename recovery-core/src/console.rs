//! Scrollback text console
//!
//! A fixed ring of fixed-width lines. Writing past the last column or a
//! newline starts the next line; once the ring is full the oldest line is
//! overwritten.

use core::fmt;

use heapless::{String, Vec};

use crate::config::UiConfig;

/// Maximum console rows
pub const LOG_MAX_ROWS: usize = 40;

/// Maximum console columns (line buffer bytes)
pub const LOG_MAX_COLS: usize = 96;

/// Ring buffer of console lines
#[derive(Debug, Clone)]
pub struct TextLog {
    lines: Vec<String<LOG_MAX_COLS>, LOG_MAX_ROWS>,
    cols: usize,
    row: usize,
    col: usize,
    top: usize,
}

impl TextLog {
    /// Create a console of `rows` x `cols` characters, clamped to capacity
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.clamp(1, LOG_MAX_ROWS);
        let mut lines = Vec::new();
        for _ in 0..rows {
            // Cannot fail: rows <= LOG_MAX_ROWS
            let _ = lines.push(String::new());
        }
        Self {
            lines,
            cols: cols.clamp(1, LOG_MAX_COLS - 1),
            row: 0,
            col: 0,
            top: 1 % rows,
        }
    }

    /// Size the console to the screen and font
    pub fn from_config(config: &UiConfig) -> Self {
        let rows = (config.screen.height / config.font.char_height.max(1)) as usize;
        let cols = (config.screen.width / config.font.char_width.max(1)) as usize;
        Self::new(rows, cols)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.lines.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Append one character
    pub fn push_char(&mut self, c: char) {
        if c == '\n' || self.col >= self.cols {
            self.advance_row();
        }
        if c != '\n' {
            if self.col == 0 {
                self.lines[self.row].clear();
            }
            // Multi-byte characters may not fit the line buffer; drop them
            if self.lines[self.row].push(c).is_ok() {
                self.col += 1;
            }
        }
    }

    /// Append a string
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            self.push_char(c);
        }
    }

    /// Restart writing at the beginning of the current line
    pub fn reset_col(&mut self) {
        self.col = 0;
    }

    /// Visible lines, oldest first; the last one is the line being written
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        let rows = self.lines.len();
        (0..rows).map(move |i| self.lines[(self.top + i) % rows].as_str())
    }

    fn advance_row(&mut self) {
        let rows = self.lines.len();
        self.col = 0;
        self.row = (self.row + 1) % rows;
        if self.row == self.top {
            self.top = (self.top + 1) % rows;
        }
        self.lines[self.row].clear();
    }
}

impl fmt::Write for TextLog {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}
