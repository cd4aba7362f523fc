//! Background loops
//!
//! Both loops borrow the UI for its whole lifetime and return within one
//! refresh period after [`crate::RecoveryUi::shutdown`].

pub mod animator;
pub mod input;

pub use animator::run_animator;
pub use input::run_input;
