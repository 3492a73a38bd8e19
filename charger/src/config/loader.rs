//! Configuration loader
//!
//! Reads an override file when one exists, falling back to the embedded
//! charger.toml.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use super::types::ChargerConfig;

/// Default configuration compiled into the binary
pub const EMBEDDED_CONFIG: &str = include_str!("../../charger.toml");

/// Environment variable naming an override file
pub const CONFIG_ENV: &str = "CHARGER_CONFIG";

/// Override file checked when the environment variable is unset
pub const VENDOR_CONFIG_PATH: &str = "/vendor/etc/charger.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse a TOML configuration document
pub fn parse_config(text: &str) -> Result<ChargerConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Load configuration from a file
pub fn load_from(path: &Path) -> Result<ChargerConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes of TOML from {}", text.len(), path.display());
    parse_config(&text)
}

fn embedded() -> ChargerConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            // charger.toml is validated by build.rs
            warn!("Embedded config rejected: {}, using defaults", e);
            ChargerConfig::default()
        }
    }
}

fn override_path() -> PathBuf {
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(VENDOR_CONFIG_PATH))
}

/// Load the active configuration
///
/// An override file that is missing is silently skipped; one that cannot
/// be read or parsed is reported and the embedded defaults are used.
pub fn load_config() -> ChargerConfig {
    let path = override_path();

    let config = if path.exists() {
        match load_from(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}, using embedded config", e);
                embedded()
            }
        }
    } else {
        debug!("No override at {}, using embedded config", path.display());
        embedded()
    };

    log_config_summary(&config);
    config
}

/// Log a summary of the loaded configuration
pub fn log_config_summary(config: &ChargerConfig) {
    info!("Configuration loaded successfully");
    debug!(
        "  display {} rotation {} ({}) overscan {}%",
        config.display.device.display(),
        config.display.rotation,
        if config.display.software_rotation { "software" } else { "hardware" },
        config.display.overscan_percent
    );
    debug!(
        "  style {:?}, time line {}",
        config.display.style, config.display.show_time
    );
    debug!(
        "  keys power {} alarm {}",
        config.input.power_key, config.input.alarm_key
    );
    if let Some(keyboard) = &config.lights.keyboard {
        debug!("  keyboard backlight {}", keyboard.display());
    }
    debug!("  mode {:?}", config.runtime.mode);
}

#[cfg(test)]
mod tests {
    use super::*;
    use charger_core::state::Mode;
    use charger_display::{Orientation, ProgressStyle};

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.display.rotation, 0);
        assert!(config.display.software_rotation);
        assert_eq!(config.display.style, ProgressStyle::Bar);
        assert_eq!(config.input.power_key, 116);
        assert_eq!(config.input.alarm_key, 504);
        assert_eq!(config.stats.interval_s, 15);
        assert_eq!(config.stats.max_failures, 50);
        assert_eq!(config.runtime.mode, Mode::Default);
        assert!(config.lights.keyboard.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [display]
            rotation = 90
            style = "ring"

            [runtime]
            mode = "input_test"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.orientation(), Orientation::Cw90);
        assert!(config.display.render_options().vertical);
        assert_eq!(config.display.style, ProgressStyle::Ring);
        assert_eq!(config.runtime.mode, Mode::InputTest);
        assert_eq!(config.display.device, PathBuf::from("/dev/graphics/fb0"));
        assert_eq!(config.input.power_key, 116);
    }

    #[test]
    fn test_hardware_rotation_keeps_layout() {
        let config = parse_config(
            r#"
            [display]
            rotation = 270
            software_rotation = false
            "#,
        )
        .unwrap();

        assert_eq!(config.display.flip_orientation(), Orientation::None);
        assert!(config.display.render_options().vertical);
    }

    #[test]
    fn test_keyboard_backlight() {
        let config = parse_config(
            r#"
            [lights]
            keyboard = "/sys/class/leds/keyboard-backlight"
            "#,
        )
        .unwrap();

        let paths = config.lights.paths();
        assert_eq!(
            paths.keyboard,
            Some(PathBuf::from("/sys/class/leds/keyboard-backlight"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charger.toml");
        fs::write(&path, "[input]\npower_key = 142\n").unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.input.key_map().power, 142);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(load_from(&missing), Err(ConfigError::Read { .. })));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[display\nrotation = ").unwrap();
        assert!(matches!(load_from(&broken), Err(ConfigError::Parse(_))));

        let wrong = dir.path().join("wrong.toml");
        fs::write(&wrong, "[runtime]\nmode = \"turbo\"\n").unwrap();
        assert!(matches!(load_from(&wrong), Err(ConfigError::Parse(_))));
    }
}
