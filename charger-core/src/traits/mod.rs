//! Collaborator traits
//!
//! These traits define the interface between the monitor logic and the
//! platform implementations (sysfs, evdev, fbdev, kernel reboot).

pub mod alarm;
pub mod battery;
pub mod clock;
pub mod input;
pub mod lights;
pub mod render;
pub mod rtc;
pub mod system;

pub use alarm::AlarmSource;
pub use battery::{BatteryError, BatteryMonitor, BatterySnapshot};
pub use clock::Clock;
pub use input::{InputError, InputSource};
pub use lights::{Brightness, LightError, Lights};
pub use render::{ProgressRenderer, RenderError};
pub use rtc::{RtcError, RtcValidator};
pub use system::{SystemControl, SystemError};
