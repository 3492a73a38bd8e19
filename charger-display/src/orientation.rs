//! Orientation transforms
//!
//! The frame is drawn in logical orientation and rotated into the
//! panel's native orientation just before each flip. Every transform is
//! pure: it returns a new surface and leaves the input untouched.
//!
//! Only 4-byte pixels are supported.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::surface::{PixelFormat, Surface};

/// Errors that can occur while rotating a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateError {
    /// Surface pixel depth is not 4 bytes
    UnsupportedPixelDepth(usize),
}

/// Panel rotation relative to the logical frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    #[default]
    None,
    /// 90 degrees clockwise
    Cw90,
    /// Upside down
    Ud180,
    /// 270 degrees clockwise
    Ccw270,
}

impl Orientation {
    /// Parse a rotation in degrees ("0", "90", "180", "270")
    ///
    /// Anything else means no rotation.
    pub fn from_degrees(degrees: u32) -> Self {
        match degrees {
            90 => Orientation::Cw90,
            180 => Orientation::Ud180,
            270 => Orientation::Ccw270,
            _ => Orientation::None,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            Orientation::None => 0,
            Orientation::Cw90 => 90,
            Orientation::Ud180 => 180,
            Orientation::Ccw270 => 270,
        }
    }

    /// Check if logical and native dimensions are swapped
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, Orientation::Cw90 | Orientation::Ccw270)
    }
}

fn check_depth(surface: &Surface) -> Result<(), RotateError> {
    match surface.format() {
        PixelFormat::Rgbx8888 => Ok(()),
        other => Err(RotateError::UnsupportedPixelDepth(other.bytes_per_pixel())),
    }
}

/// Remap pixels into a surface with swapped dimensions
///
/// `source_of(row, col)` gives the source pixel for each destination pixel.
fn remap<F>(surface: &Surface, source_of: F) -> Surface
where
    F: Fn(u32, u32) -> (u32, u32),
{
    let dst_width = surface.height();
    let dst_height = surface.width();
    let src_stride = surface.stride();
    let src = surface.data();

    let mut out = Surface::new(dst_width, dst_height, PixelFormat::Rgbx8888);
    let dst = out.data_mut();

    for row in 0..dst_height {
        for col in 0..dst_width {
            let (src_row, src_col) = source_of(row, col);
            let from = src_row as usize * src_stride + src_col as usize * 4;
            let to = (row as usize * dst_width as usize + col as usize) * 4;
            dst[to..to + 4].copy_from_slice(&src[from..from + 4]);
        }
    }

    out
}

/// Rotate 90 degrees clockwise
pub fn rotate_cw(surface: &Surface) -> Result<Surface, RotateError> {
    check_depth(surface)?;
    let src_height = surface.height();
    Ok(remap(surface, |row, col| (src_height - 1 - col, row)))
}

/// Rotate 90 degrees counter-clockwise
pub fn rotate_ccw(surface: &Surface) -> Result<Surface, RotateError> {
    check_depth(surface)?;
    let src_width = surface.width();
    Ok(remap(surface, |row, col| (col, src_width - 1 - row)))
}

/// Rotate 180 degrees
///
/// Reverses the pixel order of the whole buffer, which reverses both the
/// row order and the pixel order within each row.
pub fn rotate_180(surface: &Surface) -> Result<Surface, RotateError> {
    check_depth(surface)?;

    let mut out = Surface::new(surface.width(), surface.height(), PixelFormat::Rgbx8888);
    for (dst, src) in out
        .data_mut()
        .chunks_exact_mut(4)
        .zip(surface.data().chunks_exact(4).rev())
    {
        dst.copy_from_slice(src);
    }

    Ok(out)
}

/// Apply `orientation` to a logical frame
pub fn rotate(surface: &Surface, orientation: Orientation) -> Result<Surface, RotateError> {
    match orientation {
        Orientation::None => Ok(surface.clone()),
        Orientation::Cw90 => rotate_cw(surface),
        Orientation::Ud180 => rotate_180(surface),
        Orientation::Ccw270 => rotate_ccw(surface),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Surface whose pixels encode their own index
    fn numbered(width: u32, height: u32) -> Surface {
        let data = (0..width * height)
            .flat_map(|i| {
                let b = i.to_le_bytes();
                [b[0], b[1], b[2], 0xA0]
            })
            .collect();
        Surface::from_raw(width, height, PixelFormat::Rgbx8888, data).unwrap()
    }

    fn index_at(surface: &Surface, x: i32, y: i32) -> u32 {
        let px = surface.pixel(x, y).unwrap();
        u32::from_le_bytes([px[0], px[1], px[2], 0])
    }

    #[test]
    fn test_cw_moves_top_left_to_top_right() {
        // 3 wide, 2 high:
        // 0 1 2
        // 3 4 5
        let rotated = rotate_cw(&numbered(3, 2)).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(rotated.stride(), 8);

        // 3 0
        // 4 1
        // 5 2
        assert_eq!(index_at(&rotated, 0, 0), 3);
        assert_eq!(index_at(&rotated, 1, 0), 0);
        assert_eq!(index_at(&rotated, 1, 2), 2);
    }

    #[test]
    fn test_ccw_is_inverse_of_cw() {
        let surface = numbered(4, 3);
        let back = rotate_ccw(&rotate_cw(&surface).unwrap()).unwrap();
        assert_eq!(back, surface);
    }

    #[test]
    fn test_180_keeps_channel_order() {
        let rotated = rotate_180(&numbered(3, 2)).unwrap();
        assert_eq!(index_at(&rotated, 0, 0), 5);
        assert_eq!(index_at(&rotated, 2, 1), 0);
        assert_eq!(rotated.pixel(0, 0).unwrap()[3], 0xA0);
    }

    #[test]
    fn test_rejects_alpha_surfaces() {
        let mask = Surface::new(2, 2, PixelFormat::Alpha8);
        assert_eq!(rotate_cw(&mask), Err(RotateError::UnsupportedPixelDepth(1)));
        assert_eq!(rotate_180(&mask), Err(RotateError::UnsupportedPixelDepth(1)));
        assert_eq!(rotate_ccw(&mask), Err(RotateError::UnsupportedPixelDepth(1)));
    }

    #[test]
    fn test_from_degrees() {
        assert_eq!(Orientation::from_degrees(90), Orientation::Cw90);
        assert_eq!(Orientation::from_degrees(180), Orientation::Ud180);
        assert_eq!(Orientation::from_degrees(270), Orientation::Ccw270);
        assert_eq!(Orientation::from_degrees(45), Orientation::None);
        assert!(Orientation::Ccw270.is_quarter_turn());
        assert!(!Orientation::Ud180.is_quarter_turn());
    }

    proptest! {
        #[test]
        fn prop_four_quarter_turns_are_identity(width in 1u32..12, height in 1u32..12) {
            let surface = numbered(width, height);
            let mut turned = surface.clone();
            for _ in 0..4 {
                turned = rotate_cw(&turned).unwrap();
                prop_assert_eq!(turned.stride(), turned.width() as usize * 4);
            }
            prop_assert_eq!(turned, surface);
        }

        #[test]
        fn prop_half_turn_twice_is_identity(width in 1u32..12, height in 1u32..12) {
            let surface = numbered(width, height);
            let twice = rotate_180(&rotate_180(&surface).unwrap()).unwrap();
            prop_assert_eq!(twice, surface);
        }

        #[test]
        fn prop_two_quarter_turns_make_half_turn(width in 1u32..12, height in 1u32..12) {
            let surface = numbered(width, height);
            let quarter_twice = rotate_cw(&rotate_cw(&surface).unwrap()).unwrap();
            prop_assert_eq!(quarter_twice, rotate_180(&surface).unwrap());
        }
    }
}
