//! Device-agnostic core logic for the recovery UI
//!
//! This crate contains all UI logic that does not depend on a renderer,
//! an input device or a runtime:
//!
//! - Configuration type definitions
//! - Input normalization (multi-touch, trackball, keys)
//! - Bounded key buffer and held-key table
//! - Menu construction, pagination and touch mapping
//! - Progress scopes and animation timing
//! - Scrollback text console
//! - Linear touch panel policy

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod input;
pub mod menu;
pub mod policy;
pub mod progress;
