//! Renderer abstraction and screen composition for the recovery UI
//!
//! This crate provides:
//! - `Renderer` trait for framebuffer backends (fill, blit, text, flip)
//! - `IconSet` loading of the named surfaces the UI draws with
//! - `Compositor` that paints background, progress bar, menu and console
//!
//! # Architecture
//!
//! The compositor never owns state. The runtime holds the menu, progress
//! and console under its lock and hands a [`Scene`] to the compositor for
//! every repaint. Missing surfaces are tolerated: the compositor falls
//! back to plain fills so a device without artwork still shows a usable
//! menu.

#![cfg_attr(not(test), no_std)]

pub mod assets;
pub mod backend;
pub mod screen;

// Re-export key types
pub use assets::{Background, IconSet, MenuIcon};
pub use backend::{Color, Rect, RenderError, Renderer, SurfaceId};
pub use screen::{Compositor, Scene};
