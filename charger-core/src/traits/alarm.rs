//! Alarm source trait

/// Trait for checking whether an RTC alarm is about to fire
pub trait AlarmSource: Send + Sync {
    /// Check if an alarm or scheduled power-on is imminent
    fn alarm_imminent(&self) -> bool;
}
