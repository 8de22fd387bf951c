//! Retro Bounce - elastic balls over a noisy retro tiled background
//!
//! Core modules:
//! - `sim`: Physics session (arena, balls, fixed-step tick, corner ejection)
//! - `renderer`: 2D surface abstraction and ball drawing styles
//! - `background`: Text tile generation and staggered tiling
//! - `frame`: Cancellable per-frame tasks
//! - `settings`: Configuration handed in by the UI

pub mod background;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::DemoError;
pub use settings::{GraphicsStyle, Settings, StartStyle};

use glam::Vec2;

/// Demo configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Pixels per simulation unit
    pub const PIXELS_PER_UNIT: f32 = 30.0;

    /// Logical canvas size (scaling to the viewport is done by the page)
    pub const CANVAS_WIDTH: u32 = 1920;
    pub const CANVAS_HEIGHT: u32 = 1080;

    /// Arena wall thickness in pixels (never thinner than this)
    pub const WALL_THICKNESS: f32 = 50.0;

    /// Ball radii in pixels (large : medium : small = 1 : 0.5 : 0.375)
    pub const BALL_RADIUS_LARGE: f32 = 64.0;
    pub const BALL_RADIUS_MEDIUM: f32 = 32.0;
    pub const BALL_RADIUS_SMALL: f32 = 24.0;

    /// Ball material
    pub const BALL_DENSITY: f32 = 1.0;
    pub const BALL_FRICTION: f32 = 0.3;
    pub const BALL_RESTITUTION: f32 = 1.0;

    /// Launch speed for moving balls (units/s)
    pub const BALL_SPAWN_SPEED: f32 = 12.0;

    /// Distance from a wall (px) at which a ball counts as touching it
    pub const CORNER_TOLERANCE_PX: f32 = 2.0;
    /// Outward displacement (px) applied on both axes after a corner ejection
    pub const CORNER_NUDGE_PX: f32 = 6.0;
    /// Ejected balls leave a corner at least this fast (units/s)
    pub const EJECT_MIN_SPEED: f32 = 6.0;

    /// Background tile geometry (px)
    pub const TILE_HEIGHT: u32 = 64;
    pub const TILE_MIN_WIDTH: u32 = 160;
    pub const TILE_PADDING: u32 = 48;
    /// Widest tile ever generated; longer labels are clipped at the edges
    pub const TILE_MAX_WIDTH: u32 = 8192;
    /// Font used for the background label
    pub const LABEL_FONT: &str = "bold 28px monospace";
}

/// Convert a pixel length to simulation units
#[inline]
pub fn px_to_units(px: f32) -> f32 {
    px / consts::PIXELS_PER_UNIT
}

/// Convert a simulation length to pixels
#[inline]
pub fn units_to_px(units: f32) -> f32 {
    units * consts::PIXELS_PER_UNIT
}

/// Convert a pixel-space point or velocity to simulation units
#[inline]
pub fn vec_px_to_units(v: Vec2) -> Vec2 {
    v / consts::PIXELS_PER_UNIT
}

/// Convert a simulation-space point or velocity to pixels
#[inline]
pub fn vec_units_to_px(v: Vec2) -> Vec2 {
    v * consts::PIXELS_PER_UNIT
}
