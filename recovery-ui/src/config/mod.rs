//! Configuration loading and parsing
//!
//! Reads the UI configuration from a TOML file. Falls back to built-in
//! defaults if the file is missing or invalid.

pub mod loader;
pub mod toml;

pub use loader::{load_config, ConfigError};
pub use toml::parse_config;
