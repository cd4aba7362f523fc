//! Recovery UI Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the recovery UI runs against.
//! Device ports implement them; the UI itself never touches device nodes
//! or board constants directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  recovery-ui (runtime, tasks)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  recovery-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ evdev reader  │       │ board policy  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`input::InputDevice`] - Raw event source
//! - [`policy::DevicePolicy`] - Coordinate scaling, key combos, reboot
//! - [`policy::KeyState`] - Read access to held keys

#![no_std]
#![deny(unsafe_code)]

pub mod input;
pub mod policy;

// Re-export key traits at crate root for convenience
pub use input::{InputDevice, InputError};
pub use policy::{DevicePolicy, KeyState};
