//! Drawing layer over a display backend
//!
//! Holds the current draw surface in logical orientation, the current
//! color and the font. Coordinates passed in are shifted by the overscan
//! offset. `flip` rotates the finished frame into native orientation and
//! hands it to the backend.

use log::{trace, warn};

use crate::backend::{DisplayBackend, DisplayError};
use crate::font::Font;
use crate::orientation::{rotate, Orientation};
use crate::surface::{PixelFormat, Rgba, Surface};

/// Framebuffer drawing context
pub struct Graphics<B: DisplayBackend> {
    backend: B,
    draw: Surface,
    orientation: Orientation,
    overscan_x: i32,
    overscan_y: i32,
    color: Rgba,
    font: Option<Font>,
}

impl<B: DisplayBackend> Graphics<B> {
    /// Initialize the backend and present two blank frames
    ///
    /// For quarter-turn orientations the logical dimensions are swapped
    /// once here; `flip` keeps them swapped afterwards.
    pub fn init(
        mut backend: B,
        orientation: Orientation,
        overscan_percent: u32,
    ) -> Result<Self, DisplayError> {
        let mut draw = backend.init()?;
        if draw.format() != PixelFormat::Rgbx8888 {
            return Err(DisplayError::UnsupportedFormat);
        }

        if orientation.is_quarter_turn() {
            draw.swap_dimensions();
        }

        let percent = overscan_percent.min(49) as i32;
        let overscan_x = draw.width() as i32 * percent / 100;
        let overscan_y = draw.height() as i32 * percent / 100;

        let mut graphics = Self {
            backend,
            draw,
            orientation,
            overscan_x,
            overscan_y,
            color: Rgba::WHITE,
            font: None,
        };

        graphics.flip()?;
        graphics.flip()?;
        Ok(graphics)
    }

    pub fn set_font(&mut self, font: Option<Font>) {
        self.font = font;
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// Usable width inside the overscan border
    pub fn width(&self) -> i32 {
        self.draw.width() as i32 - 2 * self.overscan_x
    }

    /// Usable height inside the overscan border
    pub fn height(&self) -> i32 {
        self.draw.height() as i32 - 2 * self.overscan_y
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Current draw surface
    pub fn surface(&self) -> &Surface {
        &self.draw
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fill the whole surface with the current color
    pub fn clear(&mut self) {
        self.draw.clear(self.color);
    }

    /// Fill `[x1, x2) x [y1, y2)` with the current color
    pub fn fill(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (ox, oy) = (self.overscan_x, self.overscan_y);
        self.draw.fill_rect(x1 + ox, y1 + oy, x2 + ox, y2 + oy, self.color);
    }

    /// Copy a region of `source` to (`dx`, `dy`)
    #[allow(clippy::too_many_arguments)]
    pub fn blit(&mut self, source: &Surface, sx: i32, sy: i32, w: i32, h: i32, dx: i32, dy: i32) {
        let (ox, oy) = (self.overscan_x, self.overscan_y);
        if !self.draw.blit(source, sx, sy, w, h, dx + ox, dy + oy) {
            trace!("blit {}x{} at ({}, {}) skipped", w, h, dx, dy);
        }
    }

    /// Copy a whole surface to (`dx`, `dy`); a missing surface draws nothing
    pub fn blit_surface(&mut self, source: Option<&Surface>, dx: i32, dy: i32) {
        if let Some(source) = source {
            self.blit(
                source,
                0,
                0,
                source.width() as i32,
                source.height() as i32,
                dx,
                dy,
            );
        }
    }

    /// Text width in pixels, zero without a font
    pub fn measure(&self, text: &str) -> i32 {
        self.font.as_ref().map_or(0, |font| font.measure(text) as i32)
    }

    /// Draw ASCII text in the current color
    ///
    /// Stops at the first glyph that would not fit entirely.
    pub fn text(&mut self, x: i32, y: i32, text: &str, bold: bool) {
        let Some(font) = self.font.as_ref() else {
            return;
        };
        if self.color.a == 0 {
            return;
        }

        let (cw, ch) = (font.cell_width() as i32, font.cell_height() as i32);
        let mut x = x + self.overscan_x;
        let y = y + self.overscan_y;

        for byte in text.bytes() {
            if !self.draw.contains(x, y) || !self.draw.contains(x + cw - 1, y + ch - 1) {
                break;
            }
            if let Some((gx, gy)) = font.glyph_origin(byte, bold) {
                self.draw
                    .blend_mask(font.atlas(), gx, gy, cw, ch, x, y, self.color);
            }
            x += cw;
        }
    }

    /// Draw a line as a run of `thickness`-sized squares
    pub fn thick_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32) {
        let thickness = thickness.max(1);
        let half = thickness / 2;
        let steps = (x2 - x1).abs().max((y2 - y1).abs()).max(1);

        for step in 0..=steps {
            let x = x1 + (x2 - x1) * step / steps;
            let y = y1 + (y2 - y1) * step / steps;
            self.fill(x - half, y - half, x - half + thickness, y - half + thickness);
        }
    }

    /// Let the backend prepare the draw surface
    pub fn sync(&mut self) {
        self.backend.sync(&mut self.draw);
    }

    /// Present the current frame
    pub fn flip(&mut self) -> Result<(), DisplayError> {
        let (width, height) = (self.draw.width(), self.draw.height());
        let frame = core::mem::replace(&mut self.draw, Surface::new(0, 0, PixelFormat::Rgbx8888));

        let native = match self.orientation {
            Orientation::None => frame,
            orientation => match rotate(&frame, orientation) {
                Ok(native) => native,
                Err(e) => {
                    warn!("rotation failed: {:?}", e);
                    self.draw = frame;
                    return Err(DisplayError::UnsupportedFormat);
                }
            },
        };

        match self.backend.flip(native) {
            Ok(mut next) => {
                if self.orientation.is_quarter_turn() {
                    next.swap_dimensions();
                }
                self.draw = next;
                Ok(())
            }
            Err(e) => {
                self.draw = Surface::new(width, height, PixelFormat::Rgbx8888);
                Err(e)
            }
        }
    }

    /// Blank or unblank the panel
    pub fn blank(&mut self, blank: bool) -> Result<(), DisplayError> {
        self.backend.blank(blank)
    }
}
