//! Framebuffer drawing for the charging UI
//!
//! This crate provides:
//! - `Surface`, an owned pixel buffer with fill, blit and text-stamp primitives
//! - `Orientation` and the pure `rotate_*` transforms
//! - `DisplayBackend` trait for the device that presents finished frames
//! - `Graphics`, the drawing layer that applies overscan and rotation on flip
//! - Asset naming by resolution class and the `AssetLoader` trait
//! - `RenderEngine`, which composes the charge screen
//!
//! # Architecture
//!
//! The render engine owns the framebuffer lock (`Arc<Mutex<Graphics>>`).
//! The charge monitor calls it through `charger_core::traits::ProgressRenderer`
//! while holding the charge-render lock, so the lock order is always
//! charge-render then framebuffer.

pub mod assets;
pub mod backend;
pub mod font;
pub mod graphics;
pub mod orientation;
pub mod renderer;
pub mod ring;
pub mod surface;

// Re-export key types
pub use assets::{AssetError, AssetLoader, AssetName, AssetNames, ChargeAssets, ResolutionClass};
pub use backend::{DisplayBackend, DisplayError};
pub use font::Font;
pub use graphics::Graphics;
pub use orientation::{rotate, rotate_180, rotate_ccw, rotate_cw, Orientation, RotateError};
pub use renderer::{ProgressStyle, RenderEngine, RenderOptions, SharedGraphics, TimeOfDay};
pub use surface::{PixelFormat, Rgba, Surface, SurfaceError};
