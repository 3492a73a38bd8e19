//! Key input trait

use crate::input::InputEvent;

/// Errors that can occur while polling input devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// No input device could be opened
    NoDevices,
    /// Polling or reading a device failed
    ReadFailed,
}

/// Trait for key event sources
pub trait InputSource: Send {
    /// Wait up to `timeout_ms` for the next event
    ///
    /// Returns `Ok(Some(event))` if an event arrived, `Ok(None)` on
    /// timeout.
    fn poll_event(&mut self, timeout_ms: u32) -> Result<Option<InputEvent>, InputError>;
}
