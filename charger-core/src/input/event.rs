//! Input event types

/// Key event type
pub const EV_KEY: u16 = 0x01;

/// Power key code
pub const KEY_POWER: u16 = 116;

/// Key code the RTC driver reports when an alarm fires
pub const KEY_BRL_DOT8: u16 = 0x1f8;

/// A raw input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputEvent {
    /// Event type
    pub kind: u16,
    pub code: u16,
    /// 1 = press, 0 = release, 2 = autorepeat for key events
    pub value: i32,
}

impl InputEvent {
    pub const fn new(kind: u16, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Key event helper
    pub const fn key(code: u16, value: i32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    /// Check if this is a release of `code`
    pub fn is_release_of(&self, code: u16) -> bool {
        self.code == code && self.value == 0
    }
}

/// Key codes the input monitor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    pub power: u16,
    pub alarm: u16,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            power: KEY_POWER,
            alarm: KEY_BRL_DOT8,
        }
    }
}
