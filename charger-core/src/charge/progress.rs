//! Progress bar animation state and digit decomposition

/// Number of indeterminate animation frames
pub const PROGRESS_STATES: u8 = 7;

/// Clamp a battery level into 0..=100
pub fn clamp_level(level: i32) -> i32 {
    level.clamp(0, 100)
}

/// First animation frame for a battery level
pub fn base_frame(level: i32) -> u8 {
    (clamp_level(level) * (PROGRESS_STATES as i32 - 1) / 100) as u8
}

/// Progress bar display kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBarKind {
    None,
    Indeterminate,
    Normal,
}

/// Indeterminate bar animation
///
/// The animation sweeps from the frame matching the battery level up to
/// the last frame, then restarts at the level frame.
#[derive(Debug, Clone)]
pub struct ProgressBarState {
    kind: ProgressBarKind,
    frame: u8,
}

impl Default for ProgressBarState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBarState {
    pub fn new() -> Self {
        Self {
            kind: ProgressBarKind::Normal,
            frame: 0,
        }
    }

    pub fn kind(&self) -> ProgressBarKind {
        self.kind
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Pick the frame to draw for `level` and advance the animation
    ///
    /// The returned frame is always below `PROGRESS_STATES`.
    pub fn advance(&mut self, level: i32) -> u8 {
        let base = base_frame(level);

        if self.kind != ProgressBarKind::Indeterminate {
            self.frame = base;
            self.kind = ProgressBarKind::Indeterminate;
        }

        let drawn = self.frame;
        self.frame += 1;
        if self.frame >= PROGRESS_STATES {
            self.frame = base;
        }

        drawn
    }
}

/// What a redraw put on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressFrame {
    /// Indeterminate bar frame
    Bar { frame: u8 },
    /// Health error icon (zero-based slot)
    Error { icon: usize },
    /// Ring gauge at the given level
    Ring { level: i32 },
}

/// Decimal digits of a battery level
///
/// The hundreds digit is only present at exactly 100 and the tens digit
/// only from 10 upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digits {
    pub hundreds: Option<u8>,
    pub tens: Option<u8>,
    pub units: u8,
}

impl Digits {
    pub fn from_level(level: i32) -> Self {
        let level = clamp_level(level);
        let hundreds = level / 100;
        let tens = (level % 100) / 10;
        let units = level % 10;

        Self {
            hundreds: (hundreds == 1).then_some(1),
            tens: (level >= 10).then_some(tens as u8),
            units: units as u8,
        }
    }
}
