//! Charge decisions
//!
//! LED color selection, battery health mapping and progress-bar
//! animation state. All pure; the charge monitor applies the results.

pub mod health;
pub mod led;
pub mod progress;

pub use health::{BatteryHealth, HealthIndex};
pub use led::{LedColor, LedController, LED_GREEN_THRESHOLD};
pub use progress::{
    clamp_level, Digits, ProgressBarKind, ProgressBarState, ProgressFrame, PROGRESS_STATES,
};
