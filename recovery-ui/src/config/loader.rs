//! Configuration loading
//!
//! Loads the UI configuration from a TOML file.
//! Falls back to built-in defaults if the file is missing or invalid.

use core::fmt;
use std::fs;
use std::io;
use std::path::Path;

use recovery_core::config::{UiConfig, ValidationError};

use super::toml::parse_config;
use crate::logging::{debug, info, warn};

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No file at the given path
    NotFound,
    /// File exists but could not be read
    Io,
    /// TOML syntax or type error at a 1-based line (0 if unknown)
    Parse { line: usize },
    /// Parsed values describe an unusable layout
    Invalid(ValidationError),
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::Io,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound => f.write_str("configuration file not found"),
            ConfigError::Io => f.write_str("configuration file could not be read"),
            ConfigError::Parse { line } => write!(f, "TOML error on line {}", line),
            ConfigError::Invalid(e) => write!(f, "invalid configuration: {:?}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate the configuration at `path`
pub fn try_load_config(path: impl AsRef<Path>) -> Result<UiConfig, ConfigError> {
    let text = fs::read_to_string(path)?;
    debug!("Read {} bytes of TOML", text.len());

    let config = parse_config(&text)?;
    log_config_summary(&config);
    Ok(config)
}

/// Load the configuration at `path`, or the defaults
///
/// A missing file is expected on stock devices and is not an error.
pub fn load_config(path: impl AsRef<Path>) -> UiConfig {
    let path = path.as_ref();
    info!(
        "Loading configuration from {}",
        path.to_str().unwrap_or("<non-utf8 path>")
    );

    match try_load_config(path) {
        Ok(config) => config,
        Err(ConfigError::NotFound) => {
            info!("No configuration file, using defaults");
            UiConfig::default()
        }
        Err(e) => {
            warn!("Failed to load configuration: {:?}, using defaults", e);
            UiConfig::default()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &UiConfig) {
    info!("Configuration loaded successfully");
    debug!("  screen {}x{}", config.screen.width, config.screen.height);
    debug!("  touch bounds {}x{}", config.touch.max_x, config.touch.max_y);
    debug!(
        "  font cell {}x{}",
        config.font.char_width, config.font.char_height
    );
    debug!("  {} menu columns", config.menu.columns);
    debug!("  refresh {} Hz", config.refresh_hz);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "recovery-ui-{}-{}.toml",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("recovery-ui-does-not-exist.toml");
        assert_eq!(try_load_config(&path), Err(ConfigError::NotFound));
        assert_eq!(load_config(&path), UiConfig::default());
    }

    #[test]
    fn test_load_file() {
        let path = temp_file("load", "refresh_hz = 10\n[menu]\ncolumns = 3\n");
        let config = try_load_config(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.refresh_hz, 10);
        assert_eq!(config.menu.columns, 3);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let path = temp_file("invalid", "refresh_hz = 0\n");
        assert_eq!(
            try_load_config(&path),
            Err(ConfigError::Invalid(ValidationError::RefreshRate))
        );
        assert_eq!(load_config(&path), UiConfig::default());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::Parse { line: 4 }.to_string(),
            "TOML error on line 4"
        );
    }
}
