//! Power supply telemetry
//!
//! Reads the `battery`, `ac` and `usb` supplies under the power supply
//! class directory (normally `/sys/class/power_supply`).

use std::path::{Path, PathBuf};

use charger_core::charge::BatteryHealth;
use charger_core::traits::{BatteryError, BatteryMonitor};
use log::{debug, warn};

use crate::error::DriverError;
use crate::sysfs::{read_int, read_trimmed};

pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// sysfs power supply reader
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    root: PathBuf,
}

impl SysfsBattery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn attribute_path(&self, supply: &str, name: &str) -> PathBuf {
        self.root.join(supply).join(name)
    }

    /// Read an integer attribute of the battery supply
    pub fn battery_attribute(&self, name: &str) -> Result<i32, DriverError> {
        read_int(&self.attribute_path("battery", name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn online(&self, supply: &str) -> bool {
        match read_int(&self.attribute_path(supply, "online")) {
            Ok(value) => value != 0,
            Err(e) => {
                debug!("{} online unreadable: {}", supply, e);
                false
            }
        }
    }
}

impl BatteryMonitor for SysfsBattery {
    fn probe(&self) -> Result<(), BatteryError> {
        match self.battery_attribute("capacity") {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(BatteryError::NotPresent),
            Err(_) => Err(BatteryError::ReadFailed),
        }
    }

    fn capacity(&self) -> i32 {
        match self.battery_attribute("capacity") {
            Ok(capacity) => capacity,
            Err(e) => {
                warn!("capacity read failed: {}", e);
                -1
            }
        }
    }

    fn ac_online(&self) -> bool {
        self.online("ac")
    }

    fn usb_online(&self) -> bool {
        self.online("usb")
    }

    fn health(&self) -> BatteryHealth {
        read_trimmed(&self.attribute_path("battery", "health"))
            .map(|text| BatteryHealth::from_sysfs(&text))
            .unwrap_or_default()
    }
}
