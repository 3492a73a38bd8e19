//! Thread status and operating mode

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::timing::{CHARGE_TEST_ITERATIONS, INPUT_TEST_ITERATIONS, POWER_TEST_ITERATIONS};

/// Last status reported by one of the monitor threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadStatus {
    /// Battery capacity could not be read
    ChargeError = 0,
    ChargeOk = 1,
    /// Neither AC nor USB is online
    PowerUnplugged = 2,
    PowerOk = 3,
    PowerKeyDown = 4,
    PowerKeyUp = 5,
    /// Power key held past the long-press window
    PowerKeyTimeout = 6,
    /// Alarm key event received
    Alarm = 7,
    /// Screen-on window expired without input
    InputTimeout = 8,
    InputOk = 9,
}

impl ThreadStatus {
    /// Decode a status previously stored with `as u8`
    pub fn from_u8(value: u8) -> Option<Self> {
        use ThreadStatus::*;

        Some(match value {
            0 => ChargeError,
            1 => ChargeOk,
            2 => PowerUnplugged,
            3 => PowerOk,
            4 => PowerKeyDown,
            5 => PowerKeyUp,
            6 => PowerKeyTimeout,
            7 => Alarm,
            8 => InputTimeout,
            9 => InputOk,
            _ => return None,
        })
    }
}

/// Operating mode
///
/// The test modes run one monitor for a bounded number of iterations and
/// suppress every reboot and power-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum Mode {
    #[default]
    Default = 0,
    ChargeTest = 1,
    PowerTest = 2,
    InputTest = 3,
}

impl Mode {
    /// Decode a mode previously stored with `as u8`
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Mode::ChargeTest,
            2 => Mode::PowerTest,
            3 => Mode::InputTest,
            _ => Mode::Default,
        }
    }

    /// Check if this mode suppresses system actions
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Mode::Default)
    }

    /// Iteration ceiling for a test mode
    pub fn iteration_ceiling(&self) -> Option<u32> {
        match self {
            Mode::Default => None,
            Mode::ChargeTest => Some(CHARGE_TEST_ITERATIONS),
            Mode::PowerTest => Some(POWER_TEST_ITERATIONS),
            Mode::InputTest => Some(INPUT_TEST_ITERATIONS),
        }
    }
}
