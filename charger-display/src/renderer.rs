//! Charge screen renderer
//!
//! Composes one full frame per call under the framebuffer lock and always
//! finishes with a flip. The layout is horizontal by default; a quarter
//! turn orientation stacks the digits vertically beside the bar.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use charger_core::charge::{
    clamp_level, Digits, HealthIndex, ProgressBarState, ProgressFrame,
};
use charger_core::traits::{ProgressRenderer, RenderError};
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assets::ChargeAssets;
use crate::backend::{DisplayBackend, DisplayError};
use crate::font::Font;
use crate::graphics::Graphics;
use crate::ring::draw_ring;
use crate::surface::{Rgba, Surface};

/// Color of the percent text and error screen
const TEXT_COLOR: Rgba = Rgba::new(64, 96, 255, 255);

/// Local wall clock for the time line
pub trait TimeOfDay: Send {
    /// Current hour and minute, or `None` when local time is unknown
    fn hour_minute(&self) -> Option<(u32, u32)>;
}

/// Charge screen layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProgressStyle {
    /// Animated bar with digit tiles
    #[default]
    Bar,
    /// Ring gauge with a status line
    Ring,
}

/// Renderer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub style: ProgressStyle,
    /// Draw `HH:MM` below the bar
    pub show_time: bool,
    /// Stack digits vertically beside the bar
    pub vertical: bool,
}

/// Shared framebuffer lock
pub type SharedGraphics<B> = Arc<Mutex<Graphics<B>>>;

fn lock<B: DisplayBackend>(graphics: &Mutex<Graphics<B>>) -> MutexGuard<'_, Graphics<B>> {
    graphics.lock().unwrap_or_else(PoisonError::into_inner)
}

impl From<DisplayError> for RenderError {
    fn from(e: DisplayError) -> Self {
        match e {
            DisplayError::UnsupportedFormat => RenderError::UnsupportedFormat,
            _ => RenderError::Backend,
        }
    }
}

/// Charge screen renderer
pub struct RenderEngine<B: DisplayBackend> {
    graphics: SharedGraphics<B>,
    assets: ChargeAssets,
    bar: ProgressBarState,
    options: RenderOptions,
    time: Option<Box<dyn TimeOfDay>>,
}

impl<B: DisplayBackend> RenderEngine<B> {
    /// Create a renderer drawing through `graphics`
    ///
    /// A font atlas in `assets` is handed to the drawing layer.
    pub fn new(graphics: SharedGraphics<B>, mut assets: ChargeAssets, options: RenderOptions) -> Self {
        if let Some(atlas) = assets.font.take() {
            let font = Font::from_atlas(atlas, true);
            if font.is_none() {
                debug!("font atlas rejected");
            }
            lock(&graphics).set_font(font);
        }

        Self {
            graphics,
            assets,
            bar: ProgressBarState::new(),
            options,
            time: None,
        }
    }

    /// Attach the clock used by the time line
    pub fn with_time(mut self, time: Box<dyn TimeOfDay>) -> Self {
        self.time = Some(time);
        self
    }

    /// Handle to the framebuffer lock
    pub fn graphics(&self) -> SharedGraphics<B> {
        self.graphics.clone()
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Black screen with `icon` centered
    pub fn draw_background(&self, icon: Option<&Surface>) -> Result<(), DisplayError> {
        let mut graphics = lock(&self.graphics);
        graphics.sync();
        fill_black(&mut graphics);

        if let Some(icon) = icon {
            let x = (graphics.width() - icon.width() as i32) / 2;
            let y = (graphics.height() - icon.height() as i32) / 2;
            graphics.blit_surface(Some(icon), x, y);
        }

        graphics.flip()
    }
}

fn fill_black<B: DisplayBackend>(graphics: &mut Graphics<B>) {
    graphics.set_color(Rgba::BLACK);
    let (w, h) = (graphics.width(), graphics.height());
    graphics.fill(0, 0, w, h);
}

/// Top-left corner of the bar art
fn bar_origin<B: DisplayBackend>(graphics: &Graphics<B>, assets: &ChargeAssets) -> (i32, i32) {
    let (w, h) = ChargeAssets::size_of(assets.frame(0));
    ((graphics.width() - w) / 2, (graphics.height() - h) / 2)
}

/// Digit tiles followed by the percent sign
fn draw_digits<B: DisplayBackend>(
    graphics: &mut Graphics<B>,
    assets: &ChargeAssets,
    level: i32,
    vertical: bool,
) {
    let digits = Digits::from_level(level);
    let (w, h) = ChargeAssets::size_of(assets.digit(0));
    let (pw, ph) = ChargeAssets::size_of(assets.percent.as_ref());
    let (bar_w, bar_h) = ChargeAssets::size_of(assets.frame(0));
    let (fb_w, fb_h) = (graphics.width(), graphics.height());

    // Origin and per-tile step
    let (dx, dy, step) = if vertical {
        (fb_w / 2 + bar_w / 2 + h / 2, (fb_h - h * 4 - ph) / 2, (0, h))
    } else {
        ((fb_w - w * 4 - pw) / 2, fb_h / 2 - bar_h / 2 - h * 2, (w, 0))
    };
    let at = |slot: i32| (dx + step.0 * slot, dy + step.1 * slot);

    if let Some(hundreds) = digits.hundreds {
        let (x, y) = at(0);
        graphics.blit_surface(assets.digit(hundreds), x, y);
    }
    if let Some(tens) = digits.tens {
        let (x, y) = at(1);
        graphics.blit_surface(assets.digit(tens), x, y);
    }
    let (x, y) = at(2);
    graphics.blit_surface(assets.digit(digits.units), x, y);
    let (x, y) = at(3);
    graphics.blit_surface(assets.percent.as_ref(), x, y);
}

/// `HH:MM` tiles below the bar
fn draw_time_line<B: DisplayBackend>(
    graphics: &mut Graphics<B>,
    assets: &ChargeAssets,
    hour: u32,
    minute: u32,
) {
    let (w, h) = ChargeAssets::size_of(assets.digit(0));
    let (colon_w, _) = ChargeAssets::size_of(assets.colon.as_ref());
    let (_, bar_h) = ChargeAssets::size_of(assets.frame(0));

    let dx = (graphics.width() - w * 4 - colon_w) / 2;
    let dy = graphics.height() / 2 + bar_h / 2 + h;
    let digit = |value: u32| assets.digit((value % 10) as u8);

    graphics.blit_surface(digit(hour / 10), dx, dy);
    graphics.blit_surface(digit(hour % 10), dx + w, dy);
    graphics.blit_surface(assets.colon.as_ref(), dx + w * 2, dy);
    graphics.blit_surface(digit(minute / 10), dx + w * 2 + colon_w, dy);
    graphics.blit_surface(digit(minute % 10), dx + w * 3 + colon_w, dy);
}

impl<B: DisplayBackend> ProgressRenderer for RenderEngine<B> {
    fn draw_progress(
        &mut self,
        level: i32,
        health: HealthIndex,
    ) -> Result<ProgressFrame, RenderError> {
        let level = clamp_level(level);
        let time = if self.options.show_time {
            self.time.as_ref().and_then(|t| t.hour_minute())
        } else {
            None
        };

        let mut graphics = lock(&self.graphics);
        graphics.sync();
        fill_black(&mut graphics);

        let drawn = if let Some(icon) = health.icon() {
            graphics.set_color(TEXT_COLOR);
            draw_digits(&mut graphics, &self.assets, level, self.options.vertical);
            let (x, y) = bar_origin(&graphics, &self.assets);
            graphics.blit_surface(self.assets.error(icon), x, y);
            if let Some((hour, minute)) = time {
                draw_time_line(&mut graphics, &self.assets, hour, minute);
            }
            ProgressFrame::Error { icon }
        } else if self.options.style == ProgressStyle::Ring {
            draw_ring(&mut graphics, self.assets.lightning.as_ref(), level);
            ProgressFrame::Ring { level }
        } else {
            graphics.set_color(TEXT_COLOR);
            if let Some((hour, minute)) = time {
                draw_time_line(&mut graphics, &self.assets, hour, minute);
            }
            draw_digits(&mut graphics, &self.assets, level, self.options.vertical);
            let frame = self.bar.advance(level);
            let (x, y) = bar_origin(&graphics, &self.assets);
            graphics.blit_surface(self.assets.frame(frame), x, y);
            ProgressFrame::Bar { frame }
        };

        trace!("drew {:?} at level {}", drawn, level);
        graphics.flip()?;
        Ok(drawn)
    }

    fn set_display_power(&mut self, on: bool) -> Result<(), RenderError> {
        lock(&self.graphics).blank(!on)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::tests::{MockBackend, Presented};
    use crate::orientation::Orientation;
    use crate::surface::PixelFormat;
    use charger_core::charge::BatteryHealth;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Surface {
        let data = (0..width * height)
            .flat_map(|_| [rgb[0], rgb[1], rgb[2], 0])
            .collect();
        Surface::from_raw(width, height, PixelFormat::Rgbx8888, data).unwrap()
    }

    /// Frame `i` is filled with `[i, 0, 0]`, error icons with `[0, 0, k]`
    fn synthetic_assets() -> ChargeAssets {
        let mut assets = ChargeAssets::default();
        for (i, slot) in assets.frames.iter_mut().enumerate() {
            *slot = Some(solid(10, 4, [i as u8 + 1, 0, 0]));
        }
        for (i, slot) in assets.digits.iter_mut().enumerate() {
            *slot = Some(solid(2, 2, [0, i as u8 + 1, 0]));
        }
        for (i, slot) in assets.errors.iter_mut().enumerate() {
            *slot = Some(solid(10, 4, [0, 0, i as u8 + 1]));
        }
        assets.percent = Some(solid(2, 2, [9, 9, 9]));
        assets.colon = Some(solid(1, 2, [7, 7, 7]));
        assets
    }

    struct FixedTime;

    impl TimeOfDay for FixedTime {
        fn hour_minute(&self) -> Option<(u32, u32)> {
            Some((12, 34))
        }
    }

    fn engine(
        width: u32,
        height: u32,
        options: RenderOptions,
    ) -> (RenderEngine<MockBackend>, Arc<Mutex<Presented>>) {
        let (backend, presented) = MockBackend::new(width, height);
        let graphics = Graphics::init(backend, Orientation::None, 0).unwrap();
        let engine = RenderEngine::new(Arc::new(Mutex::new(graphics)), synthetic_assets(), options);
        (engine, presented)
    }

    fn last_pixel(presented: &Arc<Mutex<Presented>>, x: i32, y: i32) -> [u8; 4] {
        let presented = presented.lock().unwrap();
        let frame = presented.frames.last().unwrap();
        let px = frame.pixel(x, y).unwrap();
        [px[0], px[1], px[2], px[3]]
    }

    #[test]
    fn test_bar_animation_frames() {
        let (mut engine, presented) = engine(40, 40, RenderOptions::default());

        let frames: Vec<_> = (0..5)
            .map(|_| engine.draw_progress(50, HealthIndex::NONE).unwrap())
            .collect();
        assert_eq!(
            frames,
            [3, 4, 5, 6, 3].map(|frame| ProgressFrame::Bar { frame })
        );

        // Bar is centered: (40 - 10) / 2, (40 - 4) / 2; last frame drawn was 3
        assert_eq!(last_pixel(&presented, 15, 18), [4, 0, 0, 0]);
        assert_eq!(last_pixel(&presented, 14, 18), [0, 0, 0, 0]);
    }

    #[test]
    fn test_every_redraw_flips() {
        let (mut engine, presented) = engine(40, 40, RenderOptions::default());
        let before = presented.lock().unwrap().frames.len();
        engine.draw_progress(10, HealthIndex::NONE).unwrap();
        engine.draw_progress(10, HealthIndex::from(BatteryHealth::Cold)).unwrap();
        engine.draw_background(None).unwrap();
        assert_eq!(presented.lock().unwrap().frames.len(), before + 3);
    }

    #[test]
    fn test_overheat_shows_error_icon_at_any_level() {
        let (mut engine, presented) = engine(40, 40, RenderOptions::default());
        let overheat = HealthIndex::from(BatteryHealth::Overheat);

        for level in [0, 50, 100] {
            let drawn = engine.draw_progress(level, overheat).unwrap();
            assert_eq!(drawn, ProgressFrame::Error { icon: 0 });
            assert_eq!(last_pixel(&presented, 20, 20), [0, 0, 1, 0]);
        }
    }

    #[test]
    fn test_error_icon_even_in_ring_style() {
        let options = RenderOptions {
            style: ProgressStyle::Ring,
            ..RenderOptions::default()
        };
        let (mut engine, _) = engine(40, 40, options);
        let drawn = engine
            .draw_progress(80, HealthIndex::from(BatteryHealth::OverVoltage))
            .unwrap();
        assert_eq!(drawn, ProgressFrame::Error { icon: 2 });
    }

    #[test]
    fn test_horizontal_digits() {
        let (mut engine, presented) = engine(40, 40, RenderOptions::default());
        engine.draw_progress(57, HealthIndex::NONE).unwrap();

        // dx = (40 - 8 - 2) / 2 = 15, dy = 20 - 2 - 4 = 14
        assert_eq!(last_pixel(&presented, 15, 14), [0, 0, 0, 0]);
        assert_eq!(last_pixel(&presented, 17, 14), [0, 6, 0, 0]);
        assert_eq!(last_pixel(&presented, 19, 14), [0, 8, 0, 0]);
        assert_eq!(last_pixel(&presented, 21, 14), [9, 9, 9, 0]);
    }

    #[test]
    fn test_vertical_digits() {
        let options = RenderOptions {
            vertical: true,
            ..RenderOptions::default()
        };
        let (mut engine, presented) = engine(40, 40, options);
        engine.draw_progress(100, HealthIndex::NONE).unwrap();

        // dx = 20 + 5 + 1 = 26, dy = (40 - 8 - 2) / 2 = 15
        assert_eq!(last_pixel(&presented, 26, 15), [0, 2, 0, 0]);
        assert_eq!(last_pixel(&presented, 26, 17), [0, 1, 0, 0]);
        assert_eq!(last_pixel(&presented, 26, 19), [0, 1, 0, 0]);
        assert_eq!(last_pixel(&presented, 26, 21), [9, 9, 9, 0]);
    }

    #[test]
    fn test_time_line() {
        let options = RenderOptions {
            show_time: true,
            ..RenderOptions::default()
        };
        let (engine, presented) = engine(40, 40, options);
        let mut engine = engine.with_time(Box::new(FixedTime));
        engine.draw_progress(50, HealthIndex::NONE).unwrap();

        // dx = (40 - 8 - 1) / 2 = 15, dy = 20 + 2 + 2 = 24
        assert_eq!(last_pixel(&presented, 15, 24), [0, 2, 0, 0]);
        assert_eq!(last_pixel(&presented, 17, 24), [0, 3, 0, 0]);
        assert_eq!(last_pixel(&presented, 19, 24), [7, 7, 7, 0]);
        assert_eq!(last_pixel(&presented, 20, 24), [0, 4, 0, 0]);
        assert_eq!(last_pixel(&presented, 22, 24), [0, 5, 0, 0]);
    }

    #[test]
    fn test_ring_style() {
        let options = RenderOptions {
            style: ProgressStyle::Ring,
            ..RenderOptions::default()
        };
        let (mut engine, presented) = engine(400, 400, options);
        let drawn = engine.draw_progress(50, HealthIndex::NONE).unwrap();
        assert_eq!(drawn, ProgressFrame::Ring { level: 50 });

        // Center (200, 160): twelve o'clock is filled, nine o'clock is base
        assert_eq!(last_pixel(&presented, 200, 40), [0, 255, 0, 0]);
        assert_eq!(last_pixel(&presented, 80, 160), [0x44, 0x44, 0x44, 0]);
    }

    #[test]
    fn test_display_power() {
        let (mut engine, presented) = engine(40, 40, RenderOptions::default());
        engine.set_display_power(false).unwrap();
        engine.set_display_power(true).unwrap();
        assert_eq!(presented.lock().unwrap().blanked, [true, false]);
    }

    #[test]
    fn test_background_centers_icon() {
        let (engine, presented) = engine(40, 40, RenderOptions::default());
        let icon = solid(4, 4, [5, 6, 7]);
        engine.draw_background(Some(&icon)).unwrap();
        assert_eq!(last_pixel(&presented, 18, 18), [5, 6, 7, 0]);
        assert_eq!(last_pixel(&presented, 17, 18), [0, 0, 0, 0]);
    }
}
