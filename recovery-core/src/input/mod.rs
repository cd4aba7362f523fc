//! Input normalization
//!
//! Raw evdev reports go in, discrete [`UiEvent`]s come out. The pieces are
//! kept separate so each can be tested without the others:
//!
//! - [`touch::TouchTracker`] - multi-touch cycles to down/move/up/tap/scroll
//! - [`trackball::Trackball`] - relative motion to directional keys
//! - [`normalizer::Normalizer`] - dispatch by event type
//! - [`queue::KeyBuffer`] - bounded FIFO between producer and consumer
//! - [`pressed::KeyTable`] - currently held keys
//!
//! [`UiEvent`]: recovery_protocol::UiEvent

pub mod normalizer;
pub mod pressed;
pub mod queue;
pub mod touch;
pub mod trackball;

pub use normalizer::{NormalizedEvent, Normalizer};
pub use pressed::KeyTable;
pub use queue::{KeyBuffer, KeyPress, PushOutcome, Pushed, KEY_QUEUE_CAPACITY};
pub use touch::{TouchPoint, TouchTracker, MAX_TOUCH_POINTS, TAP_THRESHOLD};
pub use trackball::{Trackball, TRACKBALL_THRESHOLD};
