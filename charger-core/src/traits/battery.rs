//! Battery telemetry trait

use crate::charge::BatteryHealth;

/// Errors that can occur while probing the battery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryError {
    /// Power supply class not present (yet)
    NotPresent,
    /// Attribute could not be read
    ReadFailed,
}

/// Trait for battery and charger telemetry
///
/// Readings never fail hard: a failed capacity read is reported as a
/// negative value and a failed online read as offline.
pub trait BatteryMonitor: Send + Sync {
    /// Check that the battery is available
    ///
    /// Called by the startup retry loop.
    fn probe(&self) -> Result<(), BatteryError>;

    /// Battery capacity in percent, negative on read failure
    fn capacity(&self) -> i32;

    /// Check if the AC charger is online
    fn ac_online(&self) -> bool;

    /// Check if the USB charger is online
    fn usb_online(&self) -> bool;

    /// Battery health
    fn health(&self) -> BatteryHealth;

    /// Check if any charger is online
    fn charger_present(&self) -> bool {
        self.ac_online() || self.usb_online()
    }

    /// Read all telemetry at once
    fn snapshot(&self) -> BatterySnapshot {
        BatterySnapshot {
            capacity: self.capacity(),
            ac_online: self.ac_online(),
            usb_online: self.usb_online(),
            health: self.health(),
        }
    }
}

/// Battery telemetry at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatterySnapshot {
    /// Capacity in percent, negative on read failure
    pub capacity: i32,
    pub ac_online: bool,
    pub usb_online: bool,
    pub health: BatteryHealth,
}

impl BatterySnapshot {
    /// Check if both chargers are offline
    pub fn unplugged(&self) -> bool {
        !self.ac_online && !self.usb_online
    }
}
