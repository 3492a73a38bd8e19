//! Display backend trait
//!
//! Defines the interface to the device that presents finished frames.

use crate::surface::Surface;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Device could not be opened or queried
    NotAvailable,
    /// Device pixel format is not 4 bytes per pixel
    UnsupportedFormat,
    /// Writing a frame to the device failed
    Io,
    /// Blank or unblank request failed
    Blank,
}

/// Display backend trait
///
/// The backend owns the device; the drawing layer owns the surface in
/// between flips.
pub trait DisplayBackend: Send {
    /// Open the device and return the first draw surface in native
    /// orientation
    fn init(&mut self) -> Result<Surface, DisplayError>;

    /// Present a finished frame and return the next draw surface
    fn flip(&mut self, frame: Surface) -> Result<Surface, DisplayError>;

    /// Blank (`true`) or unblank the panel
    fn blank(&mut self, blank: bool) -> Result<(), DisplayError>;

    /// Prepare the draw surface before a new frame
    fn sync(&mut self, _draw: &mut Surface) {}
}
