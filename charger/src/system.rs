//! Kernel reboot and power-off

use std::ffi::CStr;
use std::io;

use charger_core::system::{RebootReason, SystemAction};
use charger_core::traits::{SystemControl, SystemError};
use log::{error, info};

/// Restart argument handed to the bootloader
pub fn restart_arg(reason: RebootReason) -> &'static CStr {
    match reason {
        RebootReason::Charger => c"charger",
        RebootReason::Alarm => c"alarm",
    }
}

/// Performs system actions with the reboot syscall
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxSystem;

impl LinuxSystem {
    fn power_off(&self) -> Result<(), SystemError> {
        info!("powering off");
        // SAFETY: reboot(2) with a plain command takes no pointers.
        let ret = unsafe { libc::reboot(libc::RB_POWER_OFF) };
        if ret < 0 {
            error!("power off failed: {}", io::Error::last_os_error());
            return Err(SystemError::Refused);
        }
        Ok(())
    }

    fn restart(&self, reason: RebootReason) -> Result<(), SystemError> {
        let arg = restart_arg(reason);
        info!("rebooting ({})", reason.as_str());
        // SAFETY: `arg` is a NUL-terminated static string, as
        // LINUX_REBOOT_CMD_RESTART2 requires.
        let ret = unsafe {
            libc::syscall(
                libc::SYS_reboot,
                libc::LINUX_REBOOT_MAGIC1,
                libc::LINUX_REBOOT_MAGIC2,
                libc::LINUX_REBOOT_CMD_RESTART2,
                arg.as_ptr(),
            )
        };
        if ret < 0 {
            error!(
                "{} reboot failed: {}",
                reason.as_str(),
                io::Error::last_os_error()
            );
            return Err(SystemError::Refused);
        }
        Ok(())
    }
}

impl SystemControl for LinuxSystem {
    fn perform(&self, action: SystemAction) -> Result<(), SystemError> {
        match action {
            SystemAction::None => Ok(()),
            SystemAction::PowerOff => self.power_off(),
            SystemAction::Reboot(reason) => self.restart(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_args_match_reasons() {
        for reason in [RebootReason::Charger, RebootReason::Alarm] {
            assert_eq!(restart_arg(reason).to_str().unwrap(), reason.as_str());
        }
    }

    #[test]
    fn test_none_is_a_no_op() {
        assert_eq!(LinuxSystem.perform(SystemAction::None), Ok(()));
    }
}
