//! Glyph atlas font
//!
//! The atlas is an alpha surface holding 96 columns of printable ASCII
//! (0x20 to 0x7f). The top row is regular text; an optional second row
//! of the same height is bold.

use crate::surface::{PixelFormat, Surface};

/// Number of glyph columns in the atlas
pub const GLYPH_COLUMNS: u32 = 96;

/// First character in the atlas
const FIRST_GLYPH: u8 = 0x20;

/// Fixed-width bitmap font
#[derive(Debug, Clone)]
pub struct Font {
    atlas: Surface,
    cell_width: u32,
    cell_height: u32,
    bold: bool,
}

impl Font {
    /// Build a font from an atlas
    ///
    /// Returns `None` unless the atlas is an alpha surface at least
    /// `GLYPH_COLUMNS` pixels wide.
    pub fn from_atlas(atlas: Surface, has_bold_row: bool) -> Option<Self> {
        if atlas.format() != PixelFormat::Alpha8 || atlas.width() < GLYPH_COLUMNS {
            return None;
        }

        let rows = if has_bold_row { 2 } else { 1 };
        let cell_height = atlas.height() / rows;
        if cell_height == 0 {
            return None;
        }

        Some(Self {
            cell_width: atlas.width() / GLYPH_COLUMNS,
            cell_height,
            bold: has_bold_row,
            atlas,
        })
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn atlas(&self) -> &Surface {
        &self.atlas
    }

    /// Text width in pixels
    pub fn measure(&self, text: &str) -> u32 {
        self.cell_width * text.len() as u32
    }

    /// Atlas origin of the glyph for `byte`, or `None` if unprintable
    pub fn glyph_origin(&self, byte: u8, bold: bool) -> Option<(i32, i32)> {
        let column = byte.checked_sub(FIRST_GLYPH)?;
        if u32::from(column) >= GLYPH_COLUMNS {
            return None;
        }

        let x = (u32::from(column) * self.cell_width) as i32;
        let y = if bold && self.bold {
            self.cell_height as i32
        } else {
            0
        };
        Some((x, y))
    }
}
