//! Procedural retro background
//!
//! A tile is generated from the label text, then repeated over the canvas in
//! a brick pattern. The controller keeps it static or regenerates it every
//! frame.

#[cfg(target_arch = "wasm32")]
pub mod canvas_label;
pub mod compositor;
pub mod controller;
pub mod label;
pub mod tile;

pub use compositor::{TileGrid, draw_tiled, tile_placements};
pub use controller::{Background, BackgroundController};
pub use label::{BlockFontRasterizer, Glow, LabelPass, LabelRasterizer};
pub use tile::{TileGenerator, TileImage, tile_width};
