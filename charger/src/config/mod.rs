//! Configuration loading and parsing
//!
//! Loads configuration from an override file or the embedded defaults.
//! Uses TOML format parsed with serde.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_from, log_config_summary, parse_config, ConfigError};
pub use types::{
    AlarmConfig, ChargerConfig, DisplayConfig, InputConfig, LightsConfig, PowerConfig,
    RtcConfig, RuntimeConfig, StatsConfig,
};
