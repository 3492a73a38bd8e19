//! Progress renderer trait

use crate::charge::{HealthIndex, ProgressFrame};

/// Errors that can occur while presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// Display backend rejected the frame
    Backend,
    /// Pixel format not supported by the active transform
    UnsupportedFormat,
}

/// Trait for the charge screen renderer
///
/// Implementations compose and flip a full frame per call.
pub trait ProgressRenderer: Send {
    /// Draw the battery level, or the error icon for a health error
    fn draw_progress(&mut self, level: i32, health: HealthIndex)
        -> Result<ProgressFrame, RenderError>;

    /// Blank or unblank the display
    fn set_display_power(&mut self, on: bool) -> Result<(), RenderError>;
}
