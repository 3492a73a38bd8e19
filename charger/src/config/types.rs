//! Configuration types
//!
//! Every section and field has a default, so a partial override file is
//! accepted.

use std::path::PathBuf;

use charger_core::input::{KeyMap, KEY_BRL_DOT8, KEY_POWER};
use charger_core::state::Mode;
use charger_display::{Orientation, ProgressStyle, RenderOptions};
use charger_drivers::alarm::{ALARM_FLAG_PATH, POWERON_FLAG_PATH};
use charger_drivers::fbdev::FB_DEVICE_PATH;
use charger_drivers::evdev::INPUT_DIR;
use charger_drivers::miscdata::MISCDATA_PATH;
use charger_drivers::png::ASSET_DIR;
use charger_drivers::power::POWER_SUPPLY_ROOT;
use charger_drivers::rtc::{RTC_DEVICE_PATH, RTC_TIME_PATH};
use charger_drivers::LightPaths;
use serde::Deserialize;

/// Complete charger configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChargerConfig {
    pub display: DisplayConfig,
    pub power: PowerConfig,
    pub lights: LightsConfig,
    pub input: InputConfig,
    pub alarm: AlarmConfig,
    pub rtc: RtcConfig,
    pub stats: StatsConfig,
    pub runtime: RuntimeConfig,
}

/// Framebuffer and charge screen
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Framebuffer device
    pub device: PathBuf,
    /// Directory holding the PNG assets
    pub assets_dir: PathBuf,
    /// Panel rotation in degrees
    pub rotation: u32,
    /// Rotate frames in software before every flip
    ///
    /// When false the panel rotates in hardware; only the rotated art and
    /// layout are used.
    pub software_rotation: bool,
    /// Percent of each dimension left blank at the edges
    pub overscan_percent: u32,
    pub style: ProgressStyle,
    /// Draw `HH:MM` below the bar
    pub show_time: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from(FB_DEVICE_PATH),
            assets_dir: PathBuf::from(ASSET_DIR),
            rotation: 0,
            software_rotation: true,
            overscan_percent: 0,
            style: ProgressStyle::Bar,
            show_time: false,
        }
    }
}

impl DisplayConfig {
    /// Configured panel orientation
    pub fn orientation(&self) -> Orientation {
        Orientation::from_degrees(self.rotation)
    }

    /// Orientation applied by the drawing layer on flip
    pub fn flip_orientation(&self) -> Orientation {
        if self.software_rotation {
            self.orientation()
        } else {
            Orientation::None
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            style: self.style,
            show_time: self.show_time,
            vertical: self.orientation().is_quarter_turn(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// power_supply class directory
    pub supply_root: PathBuf,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            supply_root: PathBuf::from(POWER_SUPPLY_ROOT),
        }
    }
}

/// LED class directories
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub lcd: PathBuf,
    /// Keyboard backlight, switched with the LCD when present
    pub keyboard: Option<PathBuf>,
    pub green: PathBuf,
    pub red: PathBuf,
    pub blue: PathBuf,
}

impl Default for LightsConfig {
    fn default() -> Self {
        let paths = LightPaths::default();
        Self {
            lcd: paths.lcd,
            keyboard: paths.keyboard,
            green: paths.green,
            red: paths.red,
            blue: paths.blue,
        }
    }
}

impl LightsConfig {
    pub fn paths(&self) -> LightPaths {
        LightPaths {
            lcd: self.lcd.clone(),
            keyboard: self.keyboard.clone(),
            green: self.green.clone(),
            red: self.red.clone(),
            blue: self.blue.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding the `event*` nodes
    pub device_dir: PathBuf,
    pub power_key: u16,
    pub alarm_key: u16,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_dir: PathBuf::from(INPUT_DIR),
            power_key: KEY_POWER,
            alarm_key: KEY_BRL_DOT8,
        }
    }
}

impl InputConfig {
    pub fn key_map(&self) -> KeyMap {
        KeyMap {
            power: self.power_key,
            alarm: self.alarm_key,
        }
    }
}

/// Alarm flag files
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub alarm_flag: PathBuf,
    pub poweron_flag: PathBuf,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            alarm_flag: PathBuf::from(ALARM_FLAG_PATH),
            poweron_flag: PathBuf::from(POWERON_FLAG_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RtcConfig {
    pub time_file: PathBuf,
    pub device: PathBuf,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            time_file: PathBuf::from(RTC_TIME_PATH),
            device: PathBuf::from(RTC_DEVICE_PATH),
        }
    }
}

/// Statistics daemon
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// miscdata block device
    pub device: PathBuf,
    /// Seconds between updates
    pub interval_s: u32,
    /// Seconds between attempts to open the device
    pub retry_s: u32,
    /// Consecutive open failures before giving up
    pub max_failures: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from(MISCDATA_PATH),
            interval_s: 15,
            retry_s: 5,
            max_failures: 50,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Operating mode; test modes never reboot or power off
    pub mode: Mode,
}
