//! Menu engine
//!
//! Builds menu rows from caller strings, keeps the selection and the
//! visible page consistent, and maps touch gestures to rows or controls.

pub mod engine;
pub mod layout;

pub use engine::{Menu, MenuAction, MenuLine, MenuRow, BACK_ROW_TEXT, MENU_MAX_COLS, MENU_MAX_ROWS};
pub use layout::{Control, MenuGeometry};
