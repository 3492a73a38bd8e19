//! Monotonic clock and local time of day

use std::thread;
use std::time::{Duration, Instant};

use charger_core::traits::Clock;
use charger_display::TimeOfDay;
use chrono::{Local, Timelike};

/// Clock backed by `Instant` and `thread::sleep`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }

    fn sleep_ms(&self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Local wall clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTimeOfDay;

impl TimeOfDay for LocalTimeOfDay {
    fn hour_minute(&self) -> Option<(u32, u32)> {
        let now = Local::now();
        Some((now.hour(), now.minute()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances() {
        let clock = SystemClock::new();
        let start = clock.now_us();
        clock.sleep_ms(2);
        assert!(clock.elapsed_us(start) >= 2_000);
    }

    #[test]
    fn test_local_time_in_range() {
        let (hour, minute) = LocalTimeOfDay.hour_minute().unwrap();
        assert!(hour < 24);
        assert!(minute < 60);
    }
}
