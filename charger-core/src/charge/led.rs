//! Charge LED selection with write debouncing

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity at or above which the LED turns green
pub const LED_GREEN_THRESHOLD: i32 = 90;

/// Charge indicator LED color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LedColor {
    Green,
    Red,
    /// Red and green channels together
    Amber,
}

impl LedColor {
    /// Color for a battery level (%)
    ///
    /// Levels outside 0..=100 are clamped first.
    pub fn for_level(level: i32) -> Self {
        if level.clamp(0, 100) < LED_GREEN_THRESHOLD {
            LedColor::Red
        } else {
            LedColor::Green
        }
    }
}

/// Remembers the last LED color written
///
/// The LED is only rewritten when the selected color changes.
#[derive(Debug, Clone, Default)]
pub struct LedController {
    last: Option<LedColor>,
}

impl LedController {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Select the color for `level`
    ///
    /// Returns the color to write, or `None` when the LED already shows it.
    pub fn update(&mut self, level: i32) -> Option<LedColor> {
        let color = LedColor::for_level(level);
        if self.last == Some(color) {
            return None;
        }

        self.last = Some(color);
        Some(color)
    }

    /// Last color written
    pub fn current(&self) -> Option<LedColor> {
        self.last
    }
}
