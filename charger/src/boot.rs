//! Boot mode gate and startup retries

use core::fmt::Debug;
use std::env;
use std::fs;

use charger_core::timing::{INIT_RETRY_ATTEMPTS, INIT_RETRY_DELAY_MS};
use charger_core::traits::Clock;
use log::{debug, info, warn};

pub const CMDLINE_PATH: &str = "/proc/cmdline";

/// Kernel command line key holding the boot mode
pub const BOOT_MODE_KEY: &str = "androidboot.mode";

/// Environment override for the boot mode
pub const BOOT_MODE_ENV: &str = "CHARGER_BOOT_MODE";

/// Boot mode value
pub type BootMode = heapless::String<32>;

/// Extract the boot mode from a kernel command line
///
/// Values longer than a `BootMode` holds are truncated.
pub fn parse_cmdline(cmdline: &str) -> Option<BootMode> {
    let value = cmdline
        .split_whitespace()
        .filter_map(|arg| arg.split_once('='))
        .find(|(key, _)| *key == BOOT_MODE_KEY)
        .map(|(_, value)| value)?;

    let mut mode = BootMode::new();
    for c in value.chars() {
        if mode.push(c).is_err() {
            break;
        }
    }
    Some(mode)
}

/// Current boot mode
pub fn boot_mode() -> Option<BootMode> {
    if let Ok(value) = env::var(BOOT_MODE_ENV) {
        debug!("boot mode from {}", BOOT_MODE_ENV);
        return parse_cmdline(&format!("{}={}", BOOT_MODE_KEY, value));
    }

    match fs::read_to_string(CMDLINE_PATH) {
        Ok(cmdline) => parse_cmdline(&cmdline),
        Err(e) => {
            warn!("read {} failed: {}", CMDLINE_PATH, e);
            None
        }
    }
}

/// Check if the device booted into the charger
pub fn is_charge_mode(mode: Option<&str>) -> bool {
    mode.is_some_and(|mode| mode.starts_with("charge"))
}

/// Run `f` until it succeeds, at most `attempts` times
///
/// Sleeps `delay_ms` between attempts and returns the last error once
/// every attempt failed.
pub fn retry_with<T, E: Debug>(
    what: &str,
    clock: &dyn Clock,
    attempts: u32,
    delay_ms: u32,
    mut f: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    let mut attempt = 1;
    loop {
        match f() {
            Ok(value) => {
                if attempt > 1 {
                    info!("{} ready after {} attempts", what, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt >= attempts => {
                warn!("{} failed after {} attempts: {:?}", what, attempt, e);
                return Err(e);
            }
            Err(e) => {
                debug!("{} attempt {} failed: {:?}", what, attempt, e);
                attempt += 1;
                clock.sleep_ms(delay_ms);
            }
        }
    }
}

/// Startup retry: 50 attempts, 500 ms apart
pub fn retry<T, E: Debug>(
    what: &str,
    clock: &dyn Clock,
    f: impl FnMut() -> Result<T, E>,
) -> Result<T, E> {
    retry_with(what, clock, INIT_RETRY_ATTEMPTS, INIT_RETRY_DELAY_MS, f)
}
