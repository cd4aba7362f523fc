//! TOML configuration parser
//!
//! Every section and key is optional; missing values take their
//! defaults. Example:
//!
//! ```toml
//! refresh_hz = 24
//!
//! [screen]
//! width = 768
//! height = 1280
//!
//! [touch]
//! max_x = 1535
//! max_y = 2559
//!
//! [menu]
//! columns = 2
//! show_back_button = true
//!
//! [combos]
//! toggle_display = [115, 116]   # volume up + power
//! ```

use recovery_core::config::UiConfig;

use super::loader::ConfigError;

/// Parse and validate a TOML configuration
pub fn parse_config(input: &str) -> Result<UiConfig, ConfigError> {
    let config: UiConfig = ::toml::from_str(input).map_err(|e| ConfigError::Parse {
        line: e.span().map_or(0, |span| line_of(input, span.start)),
    })?;
    config.validate()?;
    Ok(config)
}

/// 1-based line number of a byte offset
fn line_of(input: &str, offset: usize) -> usize {
    let end = offset.min(input.len());
    input.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_core::config::ValidationError;
    use recovery_protocol::codes::{KEY_POWER, KEY_VOLUMEUP};

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), UiConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let input = r#"
refresh_hz = 30

[screen]
width = 480
height = 800

[font]
char_width = 7
char_height = 16

[menu]
columns = 1
show_back_button = true

[combos]
toggle_display = [115, 116]
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.refresh_hz, 30);
        assert_eq!(config.screen.width, 480);
        assert_eq!(config.screen.height, 800);
        assert_eq!(config.font.char_height, 16);
        assert_eq!(config.menu.columns, 1);
        assert!(config.menu.show_back_button);
        // Unset keys keep their defaults
        assert_eq!(config.menu.row_height, 60);
        assert_eq!(config.touch.max_x, 1535);
        assert_eq!(config.combos.toggle_display.as_slice(), &[KEY_VOLUMEUP, KEY_POWER]);
        assert!(config.combos.reboot.is_empty());
    }

    #[test]
    fn test_syntax_error_line() {
        let input = "refresh_hz = 24\n[screen]\nwidth = = 3\n";
        assert!(matches!(parse_config(input), Err(ConfigError::Parse { line: 3 })));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let input = "[menu]\ncolumns = 9\n";
        assert_eq!(
            parse_config(input),
            Err(ConfigError::Invalid(ValidationError::Columns))
        );
    }
}
