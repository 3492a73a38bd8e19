//! Backlight and LED trait

use crate::charge::LedColor;

/// Errors that can occur while writing a light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightError {
    /// Brightness file could not be opened
    Unavailable,
    /// Brightness write failed
    WriteFailed,
}

/// Backlight level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brightness {
    Off,
    /// Half of the hardware maximum
    Half,
}

/// Trait for the display backlight and the charge LED
pub trait Lights: Send + Sync {
    /// Set the display (and keyboard, if present) backlight
    fn set_backlight(&self, level: Brightness) -> Result<(), LightError>;

    /// Turn the charge LED on in the given color
    ///
    /// Channels not used by `color` are switched off.
    fn set_led(&self, color: LedColor) -> Result<(), LightError>;

    /// Turn every LED channel off
    fn leds_off(&self) -> Result<(), LightError>;
}
