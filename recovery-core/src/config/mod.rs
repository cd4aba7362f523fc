//! Configuration types
//!
//! The runtime parses these from TOML; defaults describe a 768x1280 panel.

pub mod types;

pub use types::*;
