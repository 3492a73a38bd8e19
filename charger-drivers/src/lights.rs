//! Backlight and charge LED over sysfs
//!
//! Each channel is a LED class directory holding `brightness` and
//! `max_brightness`. Maxima are read once at construction; "on" means
//! half of the maximum.

use std::path::{Path, PathBuf};

use charger_core::charge::LedColor;
use charger_core::traits::{Brightness, LightError, Lights};
use log::{debug, error, warn};

use crate::error::DriverError;
use crate::sysfs::{read_int, write_int};

/// Channel directories
#[derive(Debug, Clone)]
pub struct LightPaths {
    pub lcd: PathBuf,
    /// Keyboard backlight, switched with the LCD
    pub keyboard: Option<PathBuf>,
    pub green: PathBuf,
    pub red: PathBuf,
    pub blue: PathBuf,
}

impl Default for LightPaths {
    fn default() -> Self {
        Self {
            lcd: PathBuf::from("/sys/class/backlight/sprd_backlight"),
            keyboard: None,
            green: PathBuf::from("/sys/class/leds/sc27xx:green"),
            red: PathBuf::from("/sys/class/leds/sc27xx:red"),
            blue: PathBuf::from("/sys/class/leds/sc27xx:blue"),
        }
    }
}

/// One brightness channel
#[derive(Debug, Clone)]
struct Channel {
    brightness: PathBuf,
    max: u32,
}

impl Channel {
    fn open(dir: &Path) -> Self {
        let max = match read_int(&dir.join("max_brightness")) {
            Ok(max) => max.max(0) as u32,
            Err(e) => {
                warn!("{}", e);
                0
            }
        };
        debug!("{}: max brightness {}", dir.display(), max);

        Self {
            brightness: dir.join("brightness"),
            max,
        }
    }

    fn half(&self) -> u32 {
        self.max / 2
    }

    fn write(&self, value: u32) -> Result<(), LightError> {
        write_int(&self.brightness, value).map_err(|e| {
            error!("{}", e);
            light_error(&e)
        })
    }
}

fn light_error(e: &DriverError) -> LightError {
    if e.is_not_found() {
        LightError::Unavailable
    } else {
        LightError::WriteFailed
    }
}

/// sysfs lights
#[derive(Debug, Clone)]
pub struct SysfsLights {
    lcd: Channel,
    keyboard: Option<Channel>,
    green: Channel,
    red: Channel,
    blue: Channel,
}

impl SysfsLights {
    /// Read channel maxima
    pub fn new(paths: &LightPaths) -> Self {
        Self {
            lcd: Channel::open(&paths.lcd),
            keyboard: paths.keyboard.as_deref().map(Channel::open),
            green: Channel::open(&paths.green),
            red: Channel::open(&paths.red),
            blue: Channel::open(&paths.blue),
        }
    }
}

impl Lights for SysfsLights {
    fn set_backlight(&self, level: Brightness) -> Result<(), LightError> {
        let value = |channel: &Channel| match level {
            Brightness::Off => 0,
            Brightness::Half => channel.half(),
        };

        self.lcd.write(value(&self.lcd))?;
        if let Some(keyboard) = &self.keyboard {
            keyboard.write(value(keyboard))?;
        }
        Ok(())
    }

    fn set_led(&self, color: LedColor) -> Result<(), LightError> {
        let (green, red) = match color {
            LedColor::Green => (self.green.half(), 0),
            LedColor::Red => (0, self.red.half()),
            LedColor::Amber => (self.green.half(), self.red.half()),
        };

        // Lit channel first
        if red > 0 && green == 0 {
            self.red.write(red)?;
            self.green.write(0)?;
        } else {
            self.green.write(green)?;
            self.red.write(red)?;
        }
        self.blue.write(0)
    }

    fn leds_off(&self) -> Result<(), LightError> {
        self.green.write(0)?;
        self.red.write(0)?;
        self.blue.write(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn channel(root: &Path, name: &str, max: u32) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("max_brightness"), format!("{}\n", max)).unwrap();
        fs::write(dir.join("brightness"), "0").unwrap();
        dir
    }

    fn value(dir: &Path) -> String {
        fs::read_to_string(dir.join("brightness")).unwrap()
    }

    fn fixture(root: &Path) -> LightPaths {
        LightPaths {
            lcd: channel(root, "lcd", 255),
            keyboard: Some(channel(root, "keyboard", 100)),
            green: channel(root, "green", 200),
            red: channel(root, "red", 50),
            blue: channel(root, "blue", 10),
        }
    }

    #[test]
    fn test_backlight_half_of_max() {
        let root = tempfile::tempdir().unwrap();
        let paths = fixture(root.path());
        let lights = SysfsLights::new(&paths);

        lights.set_backlight(Brightness::Half).unwrap();
        assert_eq!(value(&paths.lcd), "127");
        assert_eq!(value(paths.keyboard.as_ref().unwrap()), "50");

        lights.set_backlight(Brightness::Off).unwrap();
        assert_eq!(value(&paths.lcd), "0");
        assert_eq!(value(paths.keyboard.as_ref().unwrap()), "0");
    }

    #[test]
    fn test_led_colors() {
        let root = tempfile::tempdir().unwrap();
        let paths = fixture(root.path());
        let lights = SysfsLights::new(&paths);

        lights.set_led(LedColor::Green).unwrap();
        assert_eq!((value(&paths.green), value(&paths.red)), ("100".into(), "0".into()));

        lights.set_led(LedColor::Red).unwrap();
        assert_eq!((value(&paths.green), value(&paths.red)), ("0".into(), "25".into()));

        lights.set_led(LedColor::Amber).unwrap();
        assert_eq!((value(&paths.green), value(&paths.red)), ("100".into(), "25".into()));
        assert_eq!(value(&paths.blue), "0");
    }

    #[test]
    fn test_leds_off_clears_every_channel() {
        let root = tempfile::tempdir().unwrap();
        let paths = fixture(root.path());
        let lights = SysfsLights::new(&paths);

        lights.set_led(LedColor::Amber).unwrap();
        fs::write(paths.blue.join("brightness"), "5").unwrap();
        lights.leds_off().unwrap();
        for dir in [&paths.green, &paths.red, &paths.blue] {
            assert_eq!(value(dir), "0");
        }
    }

    #[test]
    fn test_missing_channel() {
        let root = tempfile::tempdir().unwrap();
        let mut paths = fixture(root.path());
        paths.lcd = root.path().join("absent");
        let lights = SysfsLights::new(&paths);

        assert_eq!(
            lights.set_backlight(Brightness::Half),
            Err(LightError::Unavailable)
        );
    }
}
