//! Driver error type

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}: empty attribute")]
    Empty(PathBuf),
    #[error("framebuffer depth {0} bpp, need 32")]
    UnsupportedDepth(u32),
    #[error("no input devices under {0}")]
    NoInputDevices(PathBuf),
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
}

impl DriverError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DriverError::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if the error is a missing file
    pub fn is_not_found(&self) -> bool {
        match self {
            DriverError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            DriverError::Image(image::ImageError::IoError(e)) => {
                e.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
