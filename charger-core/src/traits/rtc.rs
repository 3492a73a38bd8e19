//! RTC validation trait

/// Errors that can occur while validating the RTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcError {
    /// RTC time could not be read
    Unreadable,
    /// Default time could not be written
    SetFailed,
}

/// Trait for checking that the RTC holds a usable time
pub trait RtcValidator {
    /// Validate the RTC, programming a default time if it is unreadable
    fn validate(&mut self) -> Result<(), RtcError>;
}
