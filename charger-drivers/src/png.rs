//! PNG asset loader
//!
//! Assets live in one directory as `<name>.png`.

use std::path::PathBuf;

use charger_display::{AssetError, AssetLoader, PixelFormat, Surface};
use log::debug;

use crate::error::DriverError;

pub const ASSET_DIR: &str = "/res/images/charge";

/// Loads assets from a directory of PNG files
#[derive(Debug, Clone)]
pub struct PngAssetLoader {
    dir: PathBuf,
}

impl PngAssetLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", name))
    }

    fn open(&self, name: &str) -> Result<image::DynamicImage, DriverError> {
        let path = self.path_of(name);
        debug!("decoding {}", path.display());
        Ok(image::open(&path)?)
    }
}

fn asset_error(e: DriverError) -> AssetError {
    if e.is_not_found() {
        AssetError::NotFound
    } else {
        AssetError::Decode
    }
}

fn surface(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Surface, AssetError> {
    Surface::from_raw(width, height, format, data).map_err(|_| AssetError::Decode)
}

impl AssetLoader for PngAssetLoader {
    fn load(&self, name: &str) -> Result<Surface, AssetError> {
        let rgba = self.open(name).map_err(asset_error)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        surface(width, height, PixelFormat::Rgbx8888, rgba.into_raw())
    }

    fn load_alpha(&self, name: &str) -> Result<Surface, AssetError> {
        let luma = self.open(name).map_err(asset_error)?.to_luma8();
        let (width, height) = luma.dimensions();
        surface(width, height, PixelFormat::Alpha8, luma.into_raw())
    }
}
