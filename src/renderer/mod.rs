//! 2D rendering
//!
//! Everything draws through the `Surface` trait; the canvas implementation is
//! only compiled for the browser.

pub mod balls;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod color;
pub mod surface;

pub use balls::{HoleGeometry, SizeTier, draw_ball, draw_scene, hole_geometry};
pub use color::Rgba;
pub use surface::{CompositeOp, DrawCommand, RecordingSurface, Surface};
