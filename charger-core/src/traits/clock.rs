//! Monotonic clock trait

/// Time source for the monitor threads
///
/// Tests substitute a simulated clock so countdowns run without sleeping.
pub trait Clock: Send + Sync {
    /// Monotonic time in microseconds
    fn now_us(&self) -> u64;

    /// Block the calling thread
    fn sleep_ms(&self, ms: u32);

    /// Microseconds elapsed since `start_us`
    fn elapsed_us(&self, start_us: u64) -> u64 {
        self.now_us().saturating_sub(start_us)
    }
}
