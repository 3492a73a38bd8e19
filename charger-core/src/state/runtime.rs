//! Runtime state shared by the monitor threads

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use super::status::{Mode, ThreadStatus};

/// Stored in place of a status before any thread reported one
const NO_STATUS: u8 = u8::MAX;

/// State shared between the charge, power and input monitors
///
/// All fields are atomics accessed with relaxed ordering. The exit flag is
/// monotone: once set it is never cleared for the life of the process.
#[derive(Debug)]
pub struct RuntimeState {
    exit: AtomicBool,
    mode: AtomicU8,
    status: AtomicU8,
    iterations: AtomicU32,
    /// Battery health index (0 = healthy, 1..=3 = error icon)
    status_index: AtomicU8,
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new(Mode::Default)
    }
}

impl RuntimeState {
    /// Create runtime state for the given operating mode
    pub fn new(mode: Mode) -> Self {
        Self {
            exit: AtomicBool::new(false),
            mode: AtomicU8::new(mode as u8),
            status: AtomicU8::new(NO_STATUS),
            iterations: AtomicU32::new(0),
            status_index: AtomicU8::new(0),
        }
    }

    /// Ask every monitor to leave its loop
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Relaxed);
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit.load(Ordering::Relaxed)
    }

    /// Record the last thread status (last writer wins)
    pub fn set_status(&self, status: ThreadStatus) {
        self.status.store(status as u8, Ordering::Relaxed);
    }

    /// Last reported status, if any thread reported one yet
    pub fn status(&self) -> Option<ThreadStatus> {
        ThreadStatus::from_u8(self.status.load(Ordering::Relaxed))
    }

    pub fn operating_mode(&self) -> Mode {
        Mode::from_u8(self.mode.load(Ordering::Relaxed))
    }

    pub fn status_index(&self) -> u8 {
        self.status_index.load(Ordering::Relaxed)
    }

    pub fn set_status_index(&self, index: u8) {
        self.status_index.store(index, Ordering::Relaxed);
    }

    /// Check if a health error is being shown
    pub fn health_error_active(&self) -> bool {
        self.status_index() > 0
    }

    /// Count one iteration of the monitor that owns `owner`
    ///
    /// Only counts while the current mode is `owner`. Once the count goes
    /// past the mode ceiling, requests exit and resets the counter.
    /// Returns true when the ceiling was crossed on this call.
    pub fn count_iteration(&self, owner: Mode) -> bool {
        let mode = self.operating_mode();
        if mode != owner {
            return false;
        }

        let Some(ceiling) = mode.iteration_ceiling() else {
            return false;
        };

        let count = self.iterations.fetch_add(1, Ordering::Relaxed) + 1;
        if count > ceiling {
            self.request_exit();
            self.iterations.store(0, Ordering::Relaxed);
            return true;
        }

        false
    }

    /// Current iteration count
    pub fn iterations(&self) -> u32 {
        self.iterations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_flag_is_monotone() {
        let state = RuntimeState::default();
        assert!(!state.is_exit_requested());
        state.request_exit();
        state.request_exit();
        assert!(state.is_exit_requested());
    }

    #[test]
    fn test_status_last_writer_wins() {
        let state = RuntimeState::default();
        assert_eq!(state.status(), None);
        state.set_status(ThreadStatus::PowerOk);
        state.set_status(ThreadStatus::InputTimeout);
        assert_eq!(state.status(), Some(ThreadStatus::InputTimeout));
    }

    #[test]
    fn test_count_iteration_ignored_in_default_mode() {
        let state = RuntimeState::default();
        for _ in 0..100 {
            assert!(!state.count_iteration(Mode::Default));
        }
        assert!(!state.is_exit_requested());
    }

    #[test]
    fn test_count_iteration_other_owner() {
        let state = RuntimeState::new(Mode::PowerTest);
        for _ in 0..20 {
            state.count_iteration(Mode::ChargeTest);
        }
        assert!(!state.is_exit_requested());
        assert_eq!(state.iterations(), 0);
    }

    #[test]
    fn test_count_iteration_ceiling() {
        let state = RuntimeState::new(Mode::ChargeTest);
        for _ in 0..5 {
            assert!(!state.count_iteration(Mode::ChargeTest));
        }
        assert!(!state.is_exit_requested());

        assert!(state.count_iteration(Mode::ChargeTest));
        assert!(state.is_exit_requested());
        assert_eq!(state.iterations(), 0);
    }

    #[test]
    fn test_input_ceiling_is_ten() {
        let state = RuntimeState::new(Mode::InputTest);
        let crossed = (0..11)
            .position(|_| state.count_iteration(Mode::InputTest))
            .unwrap();
        assert_eq!(crossed, 10);
    }
}
