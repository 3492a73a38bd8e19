//! Owned pixel buffers
//!
//! A `Surface` always satisfies `stride == width * bytes_per_pixel`; rows
//! carry no padding. Drawing primitives reject any operation whose first
//! or last pixel falls outside the surface instead of clipping it.

/// Pixel layout of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One coverage byte per pixel (font atlas, glyph masks)
    Alpha8,
    /// Red, green, blue and one unused byte
    Rgbx8888,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Alpha8 => 1,
            PixelFormat::Rgbx8888 => 4,
        }
    }
}

/// Errors that can occur while building a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// Buffer length does not match the dimensions
    SizeMismatch,
}

/// Drawing color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from `0xRRGGBB`
    pub const fn from_rgb(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }
}

/// Blend one channel toward `value` with coverage `a`
fn blend(dst: u8, value: u8, a: u8) -> u8 {
    ((u32::from(dst) * (255 - u32::from(a)) + u32::from(value) * u32::from(a)) / 255) as u8
}

/// Write `color` at coverage `a` into one 4-byte pixel
fn put(px: &mut [u8], color: Rgba, a: u8) {
    match a {
        0 => {}
        255 => {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
        _ => {
            px[0] = blend(px[0], color.r, a);
            px[1] = blend(px[1], color.g, a);
            px[2] = blend(px[2], color.b, a);
        }
    }
}

/// An owned pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl core::fmt::Debug for Surface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .finish()
    }
}

impl Surface {
    /// Create a zeroed surface
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = width as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            stride,
            format,
            data: vec![0; stride * height as usize],
        }
    }

    /// Wrap an existing buffer
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, SurfaceError> {
        let stride = width as usize * format.bytes_per_pixel();
        if data.len() != stride * height as usize {
            return Err(SurfaceError::SizeMismatch);
        }

        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Swap the logical width and height, keeping the buffer
    pub fn swap_dimensions(&mut self) {
        core::mem::swap(&mut self.width, &mut self.height);
        self.stride = self.width as usize * self.bytes_per_pixel();
    }

    /// Check if a pixel coordinate lies inside the surface
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Byte offset of a pixel known to be inside
    fn offset(&self, x: i32, y: i32) -> usize {
        y as usize * self.stride + x as usize * self.bytes_per_pixel()
    }

    /// Bytes of one pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<&[u8]> {
        if !self.contains(x, y) {
            return None;
        }
        let start = self.offset(x, y);
        Some(&self.data[start..start + self.bytes_per_pixel()])
    }

    /// Fill every pixel with `color`, ignoring alpha
    pub fn clear(&mut self, color: Rgba) {
        if self.format != PixelFormat::Rgbx8888 {
            return;
        }
        if color.r == color.g && color.r == color.b {
            self.data.fill(color.r);
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            put(px, color, 255);
        }
    }

    /// Fill the rectangle `[x1, x2) x [y1, y2)` with `color`
    ///
    /// Returns false, drawing nothing, if the rectangle is empty or a
    /// corner is outside.
    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) -> bool {
        if self.format != PixelFormat::Rgbx8888
            || x2 <= x1
            || y2 <= y1
            || !self.contains(x1, y1)
            || !self.contains(x2 - 1, y2 - 1)
        {
            return false;
        }

        for y in y1..y2 {
            let row = self.offset(x1, y);
            let len = (x2 - x1) as usize * 4;
            for px in self.data[row..row + len].chunks_exact_mut(4) {
                put(px, color, color.a);
            }
        }
        true
    }

    /// Copy a `w` x `h` region of `source` at (`sx`, `sy`) to (`dx`, `dy`)
    ///
    /// Returns false, drawing nothing, on a format mismatch or if the
    /// source or destination region is not fully inside its surface.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        source: &Surface,
        sx: i32,
        sy: i32,
        w: i32,
        h: i32,
        dx: i32,
        dy: i32,
    ) -> bool {
        if source.format != self.format || w <= 0 || h <= 0 {
            return false;
        }
        if !self.contains(dx, dy) || !self.contains(dx + w - 1, dy + h - 1) {
            return false;
        }
        if !source.contains(sx, sy) || !source.contains(sx + w - 1, sy + h - 1) {
            return false;
        }

        let len = w as usize * self.bytes_per_pixel();
        for row in 0..h {
            let src = source.offset(sx, sy + row);
            let dst = self.offset(dx, dy + row);
            self.data[dst..dst + len].copy_from_slice(&source.data[src..src + len]);
        }
        true
    }

    /// Stamp a region of an alpha mask in `color`
    ///
    /// Mask coverage is scaled by the color alpha.
    #[allow(clippy::too_many_arguments)]
    pub fn blend_mask(
        &mut self,
        mask: &Surface,
        sx: i32,
        sy: i32,
        w: i32,
        h: i32,
        dx: i32,
        dy: i32,
        color: Rgba,
    ) -> bool {
        if mask.format != PixelFormat::Alpha8
            || self.format != PixelFormat::Rgbx8888
            || w <= 0
            || h <= 0
        {
            return false;
        }
        if !self.contains(dx, dy) || !self.contains(dx + w - 1, dy + h - 1) {
            return false;
        }
        if !mask.contains(sx, sy) || !mask.contains(sx + w - 1, sy + h - 1) {
            return false;
        }

        for row in 0..h {
            let src = mask.offset(sx, sy + row);
            let dst = self.offset(dx, dy + row);
            let coverage = &mask.data[src..src + w as usize];
            let pixels = &mut self.data[dst..dst + w as usize * 4];
            for (px, &a) in pixels.chunks_exact_mut(4).zip(coverage) {
                let a = if color.a < 255 {
                    (u32::from(a) * u32::from(color.a) / 255) as u8
                } else {
                    a
                };
                put(px, color, a);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> Surface {
        let mut surface = Surface::new(width, height, PixelFormat::Rgbx8888);
        surface.data_mut().fill(value);
        surface
    }

    #[test]
    fn test_stride_invariant() {
        let mut surface = Surface::new(3, 5, PixelFormat::Rgbx8888);
        assert_eq!(surface.stride(), 12);
        surface.swap_dimensions();
        assert_eq!((surface.width(), surface.height()), (5, 3));
        assert_eq!(surface.stride(), 20);
        assert_eq!(surface.data().len(), 60);
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Surface::from_raw(2, 2, PixelFormat::Alpha8, vec![0; 4]).is_ok());
        assert_eq!(
            Surface::from_raw(2, 2, PixelFormat::Rgbx8888, vec![0; 4]),
            Err(SurfaceError::SizeMismatch)
        );
    }

    #[test]
    fn test_fill_rect() {
        let mut surface = Surface::new(4, 4, PixelFormat::Rgbx8888);
        assert!(surface.fill_rect(1, 1, 3, 3, Rgba::new(10, 20, 30, 255)));
        assert_eq!(surface.pixel(1, 1), Some(&[10, 20, 30, 0][..]));
        assert_eq!(surface.pixel(2, 2), Some(&[10, 20, 30, 0][..]));
        assert_eq!(surface.pixel(3, 3), Some(&[0, 0, 0, 0][..]));
    }

    #[test]
    fn test_fill_rect_outside_draws_nothing() {
        let mut surface = Surface::new(4, 4, PixelFormat::Rgbx8888);
        assert!(!surface.fill_rect(2, 2, 5, 5, Rgba::WHITE));
        assert!(surface.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_rect_inverted_draws_nothing() {
        let mut surface = Surface::new(20, 20, PixelFormat::Rgbx8888);
        assert!(!surface.fill_rect(10, 0, 5, 5, Rgba::WHITE));
        assert!(!surface.fill_rect(0, 10, 5, 5, Rgba::WHITE));
        assert!(!surface.fill_rect(3, 3, 3, 8, Rgba::WHITE));
        assert!(surface.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_rect_blends() {
        let mut surface = solid(1, 1, 0);
        surface.fill_rect(0, 0, 1, 1, Rgba::new(255, 255, 255, 51));
        assert_eq!(surface.pixel(0, 0), Some(&[51, 51, 51, 0][..]));
    }

    #[test]
    fn test_blit() {
        let source = solid(2, 2, 7);
        let mut target = Surface::new(4, 4, PixelFormat::Rgbx8888);

        assert!(target.blit(&source, 0, 0, 2, 2, 2, 2));
        assert_eq!(target.pixel(3, 3), Some(&[7, 7, 7, 7][..]));
        assert_eq!(target.pixel(1, 1), Some(&[0, 0, 0, 0][..]));

        assert!(!target.blit(&source, 0, 0, 2, 2, 3, 3));
        assert!(!target.blit(&source, 0, 0, 2, 2, -1, 0));
        assert!(!target.blit(&source, 1, 1, 2, 2, 0, 0));
    }

    #[test]
    fn test_blit_rejects_format_mismatch() {
        let mask = Surface::new(1, 1, PixelFormat::Alpha8);
        let mut target = Surface::new(4, 4, PixelFormat::Rgbx8888);
        assert!(!target.blit(&mask, 0, 0, 1, 1, 0, 0));
    }

    #[test]
    fn test_blend_mask() {
        let mask = Surface::from_raw(2, 1, PixelFormat::Alpha8, vec![255, 0]).unwrap();
        let mut target = Surface::new(2, 1, PixelFormat::Rgbx8888);

        assert!(target.blend_mask(&mask, 0, 0, 2, 1, 0, 0, Rgba::new(200, 100, 50, 255)));
        assert_eq!(target.pixel(0, 0), Some(&[200, 100, 50, 0][..]));
        assert_eq!(target.pixel(1, 0), Some(&[0, 0, 0, 0][..]));
    }

    #[test]
    fn test_clear_grey_and_color() {
        let mut surface = Surface::new(2, 1, PixelFormat::Rgbx8888);
        surface.clear(Rgba::new(9, 9, 9, 255));
        assert!(surface.data().iter().all(|&b| b == 9));

        surface.clear(Rgba::new(1, 2, 3, 255));
        assert_eq!(surface.pixel(1, 0), Some(&[1, 2, 3, 9][..]));
    }
}
