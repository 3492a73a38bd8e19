//! Input state machine
//!
//! Tracks the power key long-press window and the screen-on countdown.
//! The machine never sleeps or polls itself: the input monitor performs
//! each wait and feeds back the result together with the measured
//! elapsed time.

use super::event::{InputEvent, KeyMap};
use crate::state::ThreadStatus;
use crate::timing::{elapsed_ms, BACKLIGHT_ON_MS, POWER_KEY_TIMEOUT_MS, WAKEUP_ON_MS};

/// Input monitor states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// Screen on, polling for keys
    Polling,
    /// Power key pressed, waiting for release inside the long-press window
    AwaitingPowerKeyRelease,
    /// Screen blanked after the countdown expired or an alarm was dismissed
    Blanked,
}

/// Result of feeding one event or wait result to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Event has no rule in the current state
    Ignored,
    /// Power key pressed: screen on, long-press window started
    PowerKeyDown,
    /// Power key released inside the window: backlight on
    PowerKeyUp,
    /// Power key held through the window: exit and reboot
    PowerKeyTimeout,
    /// Alarm key: the caller checks the alarm window
    AlarmKey,
    /// Nominal poll expired: the countdown wait starts
    Idle,
    /// Countdown expired: backlight and screen off
    IdleTimeout,
    /// Current wait continues
    Waiting,
}

impl InputOutcome {
    /// Status reported to the runtime state, if any
    pub fn status(&self) -> Option<ThreadStatus> {
        match self {
            InputOutcome::PowerKeyDown => Some(ThreadStatus::PowerKeyDown),
            InputOutcome::PowerKeyUp => Some(ThreadStatus::PowerKeyUp),
            InputOutcome::PowerKeyTimeout => Some(ThreadStatus::PowerKeyTimeout),
            InputOutcome::AlarmKey => Some(ThreadStatus::Alarm),
            InputOutcome::Idle => Some(ThreadStatus::InputOk),
            InputOutcome::IdleTimeout => Some(ThreadStatus::InputTimeout),
            InputOutcome::Ignored | InputOutcome::Waiting => None,
        }
    }
}

/// Power key and screen-on countdown state machine
#[derive(Debug, Clone)]
pub struct InputMachine {
    state: InputState,
    keys: KeyMap,
    /// Remaining time of the active window (ms), carried across states
    time_left_ms: i64,
}

impl Default for InputMachine {
    fn default() -> Self {
        Self::new(KeyMap::default())
    }
}

impl InputMachine {
    /// Create a machine with the screen on and a full screen-on window
    pub fn new(keys: KeyMap) -> Self {
        Self {
            state: InputState::Polling,
            keys,
            time_left_ms: BACKLIGHT_ON_MS,
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn time_left_ms(&self) -> i64 {
        self.time_left_ms
    }

    /// Timeout to pass to the next countdown or release wait
    pub fn wait_timeout_ms(&self) -> u32 {
        self.time_left_ms.clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Evaluate an event that arrived while polling or counting down
    pub fn evaluate(&mut self, event: &InputEvent) -> InputOutcome {
        if self.state == InputState::AwaitingPowerKeyRelease {
            return InputOutcome::Ignored;
        }

        if event.code == self.keys.power {
            self.state = InputState::AwaitingPowerKeyRelease;
            self.time_left_ms = POWER_KEY_TIMEOUT_MS;
            return InputOutcome::PowerKeyDown;
        }

        if event.code == self.keys.alarm {
            return InputOutcome::AlarmKey;
        }

        InputOutcome::Ignored
    }

    /// Nominal poll expired without an event
    pub fn poll_expired(&mut self) -> InputOutcome {
        if self.state == InputState::AwaitingPowerKeyRelease {
            return InputOutcome::Ignored;
        }
        InputOutcome::Idle
    }

    /// Feed the result of one countdown wait
    ///
    /// An event that arrives mid-wait is re-evaluated as if it arrived
    /// during the nominal poll; the remaining time is kept.
    pub fn countdown(&mut self, event: Option<&InputEvent>, elapsed_us: u64) -> InputOutcome {
        self.time_left_ms -= elapsed_ms(elapsed_us);

        if let Some(event) = event {
            return self.evaluate(event);
        }

        if self.time_left_ms <= 0 {
            self.state = InputState::Blanked;
            self.time_left_ms = WAKEUP_ON_MS;
            return InputOutcome::IdleTimeout;
        }

        InputOutcome::Waiting
    }

    /// Feed the result of one wait for the power key release
    pub fn release_wait(&mut self, event: Option<&InputEvent>, elapsed_us: u64) -> InputOutcome {
        if self.state != InputState::AwaitingPowerKeyRelease {
            return InputOutcome::Ignored;
        }

        self.time_left_ms -= elapsed_ms(elapsed_us);

        if event.is_some_and(|e| e.is_release_of(self.keys.power)) {
            self.state = InputState::Polling;
            self.time_left_ms = BACKLIGHT_ON_MS;
            return InputOutcome::PowerKeyUp;
        }

        if self.time_left_ms <= 0 {
            self.state = InputState::Polling;
            return InputOutcome::PowerKeyTimeout;
        }

        InputOutcome::Waiting
    }

    /// The alarm key arrived but no alarm is imminent
    pub fn alarm_dismissed(&mut self) {
        self.state = InputState::Blanked;
    }
}
