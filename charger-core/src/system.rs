//! System actions requested by the monitor threads
//!
//! Monitors never call into the kernel themselves. They return a
//! `SystemAction` and the binary performs it through `SystemControl`.

/// Why the device is rebooting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootReason {
    /// Long press of the power key
    Charger,
    /// RTC alarm is about to fire
    Alarm,
}

impl RebootReason {
    /// Argument passed to the kernel restart command
    pub fn as_str(&self) -> &'static str {
        match self {
            RebootReason::Charger => "charger",
            RebootReason::Alarm => "alarm",
        }
    }
}

/// Privileged action to perform after a monitor step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemAction {
    #[default]
    None,
    Reboot(RebootReason),
    PowerOff,
}

impl SystemAction {
    pub fn is_none(&self) -> bool {
        matches!(self, SystemAction::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reboot_reason_strings() {
        assert_eq!(RebootReason::Charger.as_str(), "charger");
        assert_eq!(RebootReason::Alarm.as_str(), "alarm");
    }

    #[test]
    fn test_default_action() {
        assert!(SystemAction::default().is_none());
        assert!(!SystemAction::PowerOff.is_none());
    }
}
