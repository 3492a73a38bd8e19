//! System control trait

use crate::system::SystemAction;

/// Errors that can occur while performing a system action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemError {
    /// Kernel refused the request
    Refused,
}

/// Trait for privileged reboot and power-off
pub trait SystemControl: Send + Sync {
    /// Perform `action`
    ///
    /// On success this normally does not return. `SystemAction::None`
    /// is a no-op.
    fn perform(&self, action: SystemAction) -> Result<(), SystemError>;
}
