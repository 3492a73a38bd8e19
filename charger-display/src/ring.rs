//! Ring gauge charge view
//!
//! A grey base ring with a green arc proportional to the level, the
//! charging icon in the middle and a status line underneath.

use crate::backend::DisplayBackend;
use crate::graphics::Graphics;
use crate::surface::{Rgba, Surface};

pub const RING_RADIUS: i32 = 120;
pub const RING_THICKNESS: i32 = 12;

/// Ring center sits this far above the screen center
pub const RING_LIFT: i32 = 40;

/// Gap between the ring and the status line
pub const RING_TEXT_GAP: i32 = 32;

/// Arc segment size in degrees
const STEP_DEGREES: f32 = 2.0;

const BASE_COLOR: u32 = 0x44_44_44;
const FILL_COLOR: u32 = 0x00_FF_00;

/// Draw an arc clockwise from twelve o'clock covering `fraction` of a turn
pub fn draw_arc<B: DisplayBackend>(
    graphics: &mut Graphics<B>,
    center: (i32, i32),
    radius: i32,
    fraction: f32,
    color: Rgba,
    thickness: i32,
) {
    let (cx, cy) = center;
    let start = -90.0_f32;
    let end = start + 360.0 * fraction.clamp(0.0, 1.0);
    let point = |degrees: f32| {
        let rad = degrees.to_radians();
        (
            cx + (radius as f32 * rad.cos()) as i32,
            cy + (radius as f32 * rad.sin()) as i32,
        )
    };

    graphics.set_color(color);
    let mut angle = start;
    while angle < end {
        let (x1, y1) = point(angle);
        let (x2, y2) = point(angle + STEP_DEGREES);
        graphics.thick_line(x1, y1, x2, y2, thickness);
        angle += STEP_DEGREES;
    }
}

/// Compose the ring view for `level` (already clamped)
pub fn draw_ring<B: DisplayBackend>(
    graphics: &mut Graphics<B>,
    icon: Option<&Surface>,
    level: i32,
) {
    let center = (graphics.width() / 2, graphics.height() / 2 - RING_LIFT);

    draw_arc(
        graphics,
        center,
        RING_RADIUS,
        1.0,
        Rgba::from_rgb(BASE_COLOR),
        RING_THICKNESS,
    );
    draw_arc(
        graphics,
        center,
        RING_RADIUS,
        level as f32 / 100.0,
        Rgba::from_rgb(FILL_COLOR),
        RING_THICKNESS,
    );

    if let Some(icon) = icon {
        let (w, h) = (icon.width() as i32, icon.height() as i32);
        graphics.blit_surface(Some(icon), center.0 - w / 2, center.1 - h / 2);
    }

    let text = format!("{}% charging", level);
    let x = center.0 - graphics.measure(&text) / 2;
    graphics.set_color(Rgba::WHITE);
    graphics.text(x, center.1 + RING_RADIUS + RING_TEXT_GAP, &text, false);
}
