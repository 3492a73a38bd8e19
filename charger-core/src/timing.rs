//! Timing constants shared by the monitor threads

/// Progress animation rate
pub const PROGRESS_FPS: u32 = 8;

/// One animation frame (ms)
pub const FRAME_PERIOD_MS: u32 = 1000 / PROGRESS_FPS;

/// Charge monitor settle delay after each redraw (ms)
pub const CHARGE_SETTLE_MS: u32 = 500;

/// Power monitor polling interval (ms)
pub const POWER_POLL_MS: u32 = 500;

/// Nominal input poll timeout (ms)
pub const INPUT_POLL_MS: u32 = 100;

/// How long the power key must stay down before the device reboots (ms)
pub const POWER_KEY_TIMEOUT_MS: i64 = 1500;

/// Screen-on hold after a power key release (ms)
pub const BACKLIGHT_ON_MS: i64 = 6000;

/// Re-wake window after the screen blanked (ms)
pub const WAKEUP_ON_MS: i64 = 2000;

/// Delay between power key release and backlight on (ms)
pub const KEY_RELEASE_SETTLE_MS: u32 = 500;

/// Startup retries for RTC, display and battery
pub const INIT_RETRY_ATTEMPTS: u32 = 50;

/// Delay between startup retries (ms)
pub const INIT_RETRY_DELAY_MS: u32 = 500;

/// Iteration ceiling for the charge test mode
pub const CHARGE_TEST_ITERATIONS: u32 = 5;

/// Iteration ceiling for the power test mode
pub const POWER_TEST_ITERATIONS: u32 = 5;

/// Iteration ceiling for the input test mode
pub const INPUT_TEST_ITERATIONS: u32 = 10;

/// Convert a measured microsecond delta to the milliseconds charged
/// against a countdown
///
/// Always charges at least one millisecond so a countdown cannot stall.
pub const fn elapsed_ms(delta_us: u64) -> i64 {
    ((delta_us + 1000) / 1000) as i64
}
