//! Brick-stagger tiling of the background tile over the canvas

use glam::Vec2;

use crate::renderer::surface::Surface;

/// Rows and columns needed to cover a canvas, with one spare row and two
/// spare columns so the half-tile shift on odd rows never leaves a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
}

impl TileGrid {
    pub fn for_canvas(canvas: Vec2, tile_w: u32, tile_h: u32) -> Self {
        let tw = tile_w.max(1) as f32;
        let th = tile_h.max(1) as f32;
        Self {
            rows: (canvas.y.max(0.0) / th).ceil() as u32 + 1,
            cols: (canvas.x.max(0.0) / tw).ceil() as u32 + 2,
        }
    }

    pub fn len(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Top-left corner of every tile, row by row. Odd rows start half a tile left.
pub fn tile_placements(canvas: Vec2, tile_w: u32, tile_h: u32) -> Vec<Vec2> {
    let grid = TileGrid::for_canvas(canvas, tile_w, tile_h);
    let tw = tile_w.max(1) as f32;
    let th = tile_h.max(1) as f32;

    let mut out = Vec::with_capacity(grid.len());
    for row in 0..grid.rows {
        let shift = if row % 2 == 1 { -tw / 2.0 } else { 0.0 };
        for col in 0..grid.cols {
            out.push(Vec2::new(col as f32 * tw + shift, row as f32 * th));
        }
    }
    out
}

/// Clear the canvas and cover it with `image`
pub fn draw_tiled<S: Surface>(surface: &mut S, image: &S::Image, canvas: Vec2, tile_w: u32, tile_h: u32) {
    surface.clear(canvas.x, canvas.y);
    for at in tile_placements(canvas, tile_w, tile_h) {
        surface.draw_image(image, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{DrawCommand, RecordedImage, RecordingSurface};
    use proptest::prelude::*;

    #[test]
    fn test_grid_size() {
        let grid = TileGrid::for_canvas(Vec2::new(1920.0, 1080.0), 200, 64);
        // ceil(1080/64)+1 = 18, ceil(1920/200)+2 = 12
        assert_eq!(grid, TileGrid { rows: 18, cols: 12 });
    }

    #[test]
    fn test_odd_rows_shifted_half_tile() {
        let spots = tile_placements(Vec2::new(400.0, 128.0), 200, 64);
        let cols = 4;
        assert_eq!(spots[0], Vec2::new(0.0, 0.0));
        assert_eq!(spots[1], Vec2::new(200.0, 0.0));
        assert_eq!(spots[cols], Vec2::new(-100.0, 64.0));
        assert_eq!(spots[2 * cols], Vec2::new(0.0, 128.0));
    }

    #[test]
    fn test_draw_tiled_clears_then_draws_grid() {
        let mut s = RecordingSurface::new();
        let image = RecordedImage { width: 160, height: 64 };
        let canvas = Vec2::new(640.0, 200.0);
        draw_tiled(&mut s, &image, canvas, 160, 64);

        assert_eq!(s.commands[0], DrawCommand::Clear { width: 640.0, height: 200.0 });
        let expected = TileGrid::for_canvas(canvas, 160, 64).len();
        assert_eq!(s.count(|c| matches!(c, DrawCommand::DrawImage { .. })), expected);
    }

    proptest! {
        // One-pixel tiles mean millions of placements per case
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Every canvas pixel lies inside some tile
        #[test]
        fn prop_tiles_cover_canvas(
            w in 1.0f32..2500.0,
            h in 1.0f32..1500.0,
            tw in 1u32..900,
            th in 1u32..128,
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
        ) {
            let canvas = Vec2::new(w, h);
            let p = Vec2::new(fx * w, fy * h);
            let spots = tile_placements(canvas, tw, th);
            let covered = spots.iter().any(|s| {
                p.x >= s.x && p.x < s.x + tw as f32 && p.y >= s.y && p.y < s.y + th as f32
            });
            prop_assert!(covered, "{:?} uncovered on {:?}", p, canvas);
        }
    }
}
