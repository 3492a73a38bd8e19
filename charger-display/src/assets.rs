//! Charge screen assets
//!
//! Images come in one set per resolution class. Names are built from a
//! base, an index, the class suffix and `_rotate` when the layout is
//! rotated a quarter turn, e.g. `number_5_720X1280_rotate`.

use core::fmt::Write;

use heapless::String;
use log::{debug, error, warn};

use crate::surface::Surface;

/// Asset names are short; the longest is `indeterminate6_1440X2560_rotate`
pub type AssetName = String<32>;

/// Progress frames, one per state
pub const FRAME_ASSETS: usize = 7;

/// Digit images 0 to 9
pub const DIGIT_ASSETS: usize = 10;

/// Health error icons
pub const ERROR_ASSETS: usize = 3;

/// Errors reported by an asset loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetError {
    /// No file for this name
    NotFound,
    /// File exists but could not be decoded
    Decode,
}

/// Resolution class of the logical framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionClass {
    R360x640,
    R480x800,
    R720x1280,
    R1080x1920,
    R1440x2560,
}

impl ResolutionClass {
    /// Smallest class the framebuffer fits in
    ///
    /// 480x854 panels use the 480x800 set. Anything larger than 1440x2560
    /// falls back to the smallest set.
    pub fn classify(width: u32, height: u32) -> Self {
        use ResolutionClass::*;

        let fits = |w: u32, h: u32| width <= w && height <= h;
        if fits(360, 640) {
            R360x640
        } else if fits(480, 800) {
            R480x800
        } else if fits(480, 854) {
            debug!("480x854 uses the 480x800 asset set");
            R480x800
        } else if fits(720, 1280) {
            R720x1280
        } else if fits(1080, 1920) {
            R1080x1920
        } else if fits(1440, 2560) {
            R1440x2560
        } else {
            error!("no asset set for {}x{}, using 360x640", width, height);
            R360x640
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            ResolutionClass::R360x640 => "_360X640",
            ResolutionClass::R480x800 => "_480X800",
            ResolutionClass::R720x1280 => "_720X1280",
            ResolutionClass::R1080x1920 => "_1080X1920",
            ResolutionClass::R1440x2560 => "_1440X2560",
        }
    }
}

/// Builds asset names for one resolution class and layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetNames {
    class: ResolutionClass,
    rotated: bool,
}

impl AssetNames {
    pub fn new(class: ResolutionClass, rotated: bool) -> Self {
        Self { class, rotated }
    }

    fn build(&self, args: core::fmt::Arguments<'_>, rotatable: bool) -> AssetName {
        let mut name = AssetName::new();
        // Every generated name fits in 32 bytes
        let _ = name.write_fmt(args);
        let _ = name.push_str(self.class.suffix());
        if rotatable && self.rotated {
            let _ = name.push_str("_rotate");
        }
        name
    }

    /// Progress frame `index` (0 to 6)
    pub fn frame(&self, index: usize) -> AssetName {
        self.build(format_args!("indeterminate{}", index), true)
    }

    /// Digit image for `digit` (0 to 9)
    pub fn digit(&self, digit: usize) -> AssetName {
        self.build(format_args!("number_{}", digit), true)
    }

    /// Error icon for health index `index` (1 to 3)
    pub fn error(&self, index: usize) -> AssetName {
        self.build(format_args!("error_{}", index), true)
    }

    pub fn percent(&self) -> AssetName {
        self.build(format_args!("number_percent"), true)
    }

    /// The colon has no rotated variant
    pub fn colon(&self) -> AssetName {
        self.build(format_args!("colon"), false)
    }
}

/// Source of decoded images
pub trait AssetLoader {
    /// Load a color image
    fn load(&self, name: &str) -> Result<Surface, AssetError>;

    /// Load a coverage mask, used for the font atlas
    fn load_alpha(&self, name: &str) -> Result<Surface, AssetError>;
}

/// Name of the font atlas asset
pub const FONT_ASSET: &str = "font";

/// Name of the charging icon drawn by the ring view
pub const LIGHTNING_ASSET: &str = "lightning_single";

/// Every image the charge screen draws
///
/// A missing asset is logged and left empty; drawing skips it.
#[derive(Debug, Clone, Default)]
pub struct ChargeAssets {
    pub frames: [Option<Surface>; FRAME_ASSETS],
    pub digits: [Option<Surface>; DIGIT_ASSETS],
    pub percent: Option<Surface>,
    pub colon: Option<Surface>,
    pub errors: [Option<Surface>; ERROR_ASSETS],
    pub lightning: Option<Surface>,
    pub font: Option<Surface>,
}

fn load_logged<L: AssetLoader + ?Sized>(loader: &L, name: &str) -> Option<Surface> {
    match loader.load(name) {
        Ok(surface) => {
            debug!("loaded {} ({}x{})", name, surface.width(), surface.height());
            Some(surface)
        }
        Err(e) => {
            warn!("missing bitmap {}: {:?}", name, e);
            None
        }
    }
}

impl ChargeAssets {
    /// Load the full set for `names`
    pub fn load<L: AssetLoader + ?Sized>(loader: &L, names: &AssetNames) -> Self {
        let mut assets = Self::default();

        for (i, slot) in assets.frames.iter_mut().enumerate() {
            *slot = load_logged(loader, &names.frame(i));
        }
        for (i, slot) in assets.digits.iter_mut().enumerate() {
            *slot = load_logged(loader, &names.digit(i));
        }
        for (i, slot) in assets.errors.iter_mut().enumerate() {
            *slot = load_logged(loader, &names.error(i + 1));
        }
        assets.percent = load_logged(loader, &names.percent());
        assets.colon = load_logged(loader, &names.colon());
        assets.lightning = load_logged(loader, LIGHTNING_ASSET);

        assets.font = match loader.load_alpha(FONT_ASSET) {
            Ok(atlas) => Some(atlas),
            Err(e) => {
                warn!("missing font atlas: {:?}", e);
                None
            }
        };

        assets
    }

    pub fn frame(&self, index: u8) -> Option<&Surface> {
        self.frames.get(usize::from(index))?.as_ref()
    }

    pub fn digit(&self, digit: u8) -> Option<&Surface> {
        self.digits.get(usize::from(digit))?.as_ref()
    }

    /// Error icon in zero-based slot `icon`
    pub fn error(&self, icon: usize) -> Option<&Surface> {
        self.errors.get(icon)?.as_ref()
    }

    /// Width and height of an optional surface, zero when missing
    pub fn size_of(surface: Option<&Surface>) -> (i32, i32) {
        surface.map_or((0, 0), |s| (s.width() as i32, s.height() as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelFormat;
    use std::cell::RefCell;
    use std::vec::Vec;

    struct RecordingLoader {
        available: Vec<&'static str>,
        requested: RefCell<Vec<std::string::String>>,
    }

    impl AssetLoader for RecordingLoader {
        fn load(&self, name: &str) -> Result<Surface, AssetError> {
            self.requested.borrow_mut().push(name.into());
            if self.available.iter().any(|available| *available == name) {
                Ok(Surface::new(2, 2, PixelFormat::Rgbx8888))
            } else {
                Err(AssetError::NotFound)
            }
        }

        fn load_alpha(&self, _name: &str) -> Result<Surface, AssetError> {
            Err(AssetError::NotFound)
        }
    }

    #[test]
    fn test_classify() {
        use ResolutionClass::*;
        assert_eq!(ResolutionClass::classify(320, 480), R360x640);
        assert_eq!(ResolutionClass::classify(480, 800), R480x800);
        assert_eq!(ResolutionClass::classify(480, 854), R480x800);
        assert_eq!(ResolutionClass::classify(720, 1280), R720x1280);
        assert_eq!(ResolutionClass::classify(1080, 2340), R1440x2560);
        assert_eq!(ResolutionClass::classify(2000, 3000), R360x640);
    }

    #[test]
    fn test_names() {
        let names = AssetNames::new(ResolutionClass::R720x1280, false);
        assert_eq!(names.frame(3).as_str(), "indeterminate3_720X1280");
        assert_eq!(names.digit(0).as_str(), "number_0_720X1280");
        assert_eq!(names.error(1).as_str(), "error_1_720X1280");
        assert_eq!(names.percent().as_str(), "number_percent_720X1280");
        assert_eq!(names.colon().as_str(), "colon_720X1280");
    }

    #[test]
    fn test_rotated_names() {
        let names = AssetNames::new(ResolutionClass::R1440x2560, true);
        assert_eq!(names.frame(6).as_str(), "indeterminate6_1440X2560_rotate");
        assert_eq!(names.digit(9).as_str(), "number_9_1440X2560_rotate");
        assert_eq!(names.percent().as_str(), "number_percent_1440X2560_rotate");
        assert_eq!(names.colon().as_str(), "colon_1440X2560");
    }

    #[test]
    fn test_missing_assets_stay_empty() {
        let loader = RecordingLoader {
            available: vec!["indeterminate0_360X640", "number_5_360X640"],
            requested: RefCell::new(Vec::new()),
        };
        let names = AssetNames::new(ResolutionClass::R360x640, false);
        let assets = ChargeAssets::load(&loader, &names);

        assert!(assets.frame(0).is_some());
        assert!(assets.frame(1).is_none());
        assert!(assets.digit(5).is_some());
        assert!(assets.error(0).is_none());
        assert!(assets.font.is_none());
        assert_eq!(loader.requested.borrow().len(), 7 + 10 + 3 + 3);
    }
}
