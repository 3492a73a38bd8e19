//! Linux driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in charger-core and charger-display:
//!
//! - Power supply telemetry over sysfs
//! - Backlight and charge LED over sysfs
//! - Alarm flag files and RTC validation
//! - Key events from evdev
//! - Framebuffer device backend and PNG asset loading
//! - Wall clock, local time and the miscdata record store

pub mod alarm;
pub mod clock;
pub mod error;
pub mod evdev;
pub mod fbdev;
pub mod lights;
pub mod miscdata;
pub mod png;
pub mod power;
pub mod rtc;
pub mod sysfs;

pub use alarm::FlagFileAlarm;
pub use clock::{LocalTimeOfDay, SystemClock};
pub use error::DriverError;
pub use evdev::EvdevInput;
pub use fbdev::FbdevBackend;
pub use lights::{LightPaths, SysfsLights};
pub use miscdata::MiscdataStore;
pub use png::PngAssetLoader;
pub use power::SysfsBattery;
pub use rtc::SysfsRtc;
