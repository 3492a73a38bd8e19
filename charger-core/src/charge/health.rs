//! Battery health mapping

/// Battery health as reported by the power supply class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatteryHealth {
    #[default]
    Unknown,
    Good,
    Overheat,
    Dead,
    OverVoltage,
    UnspecifiedFailure,
    Cold,
    WatchdogTimerExpire,
    SafetyTimerExpire,
}

impl BatteryHealth {
    /// Parse the text of a `health` attribute
    ///
    /// Unrecognized text maps to `Unknown`.
    pub fn from_sysfs(text: &str) -> Self {
        match text.trim() {
            "Good" => BatteryHealth::Good,
            "Overheat" => BatteryHealth::Overheat,
            "Dead" => BatteryHealth::Dead,
            "Over voltage" => BatteryHealth::OverVoltage,
            "Unspecified failure" => BatteryHealth::UnspecifiedFailure,
            "Cold" => BatteryHealth::Cold,
            "Watchdog timer expire" => BatteryHealth::WatchdogTimerExpire,
            "Safety timer expire" => BatteryHealth::SafetyTimerExpire,
            _ => BatteryHealth::Unknown,
        }
    }
}

/// Which error icon to show instead of the progress bar
///
/// Zero means healthy; 1..=3 select the overheat, cold and over-voltage
/// icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct HealthIndex(u8);

impl HealthIndex {
    /// Healthy battery, no error icon
    pub const NONE: HealthIndex = HealthIndex(0);

    /// Number of error icons
    pub const ICONS: usize = 3;

    /// Build from a raw index, clamped into the icon range
    pub fn from_raw(raw: u8) -> Self {
        HealthIndex(raw.min(Self::ICONS as u8))
    }

    pub fn raw(&self) -> u8 {
        self.0
    }

    /// Check if an error icon must be shown
    pub fn is_error(&self) -> bool {
        self.0 > 0
    }

    /// Zero-based error icon slot
    pub fn icon(&self) -> Option<usize> {
        self.0.checked_sub(1).map(usize::from)
    }
}

impl From<BatteryHealth> for HealthIndex {
    fn from(health: BatteryHealth) -> Self {
        match health {
            BatteryHealth::Overheat => HealthIndex(1),
            BatteryHealth::Cold => HealthIndex(2),
            BatteryHealth::OverVoltage => HealthIndex(3),
            _ => HealthIndex::NONE,
        }
    }
}
