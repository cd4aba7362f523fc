//! Recovery UI input protocol
//!
//! This crate defines the raw input model read from Linux evdev devices and
//! the discrete events the recovery UI hands to its consumer.
//!
//! # Event flow
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌────────────┐   ┌─────────┐
//! │ input_event  │──▶│ RawEvent │──▶│ normalizer │──▶│ UiEvent │
//! │ 16/24B       │   │ type/code│   │ (core)     │   │         │
//! └──────────────┘   └──────────┘   └────────────┘   └─────────┘
//! ```
//!
//! Raw events carry the kernel's `(type, code, value)` triple. The
//! normalizer in `recovery-core` turns multi-touch cycles, trackball motion
//! and key presses into [`UiEvent`]s.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codes;
pub mod events;
pub mod wire;

pub use events::{EventType, RawEvent, Touch, UiEvent};
pub use wire::{EventReader, RecordLayout, WireError};
