//! Label text rasterization
//!
//! Text layout is left to a `LabelRasterizer` so the tile pipeline does not
//! care where glyphs come from: the browser uses the canvas font engine, the
//! native build and tests use `BlockFontRasterizer`.

use glam::Vec2;

use super::tile::TileImage;
use crate::error::DemoError;
use crate::renderer::color::Rgba;

/// Soft shadow drawn behind the glyphs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    /// Blur radius in pixels
    pub blur: f32,
}

/// One label draw: color, optional glow, and the left end of the baseline.
/// Text is vertically centered on `origin.y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPass {
    pub color: Rgba,
    pub glow: Option<Glow>,
    pub origin: Vec2,
}

pub trait LabelRasterizer {
    /// Rendered width of `text` in pixels
    fn measure(&mut self, text: &str) -> f32;

    /// Draw `text` into `image` for one pass
    fn draw(&mut self, image: &mut TileImage, text: &str, pass: &LabelPass) -> Result<(), DemoError>;
}

/// Fixed-advance block glyphs. Every visible character is a solid cell.
#[derive(Debug, Clone, Copy)]
pub struct BlockFontRasterizer {
    pub advance: f32,
    pub cap_height: f32,
}

impl Default for BlockFontRasterizer {
    fn default() -> Self {
        Self {
            advance: 18.0,
            cap_height: 20.0,
        }
    }
}

impl BlockFontRasterizer {
    fn cells(&self, text: &str, origin: Vec2) -> impl Iterator<Item = (i32, i32, i32, i32)> {
        let advance = self.advance;
        let cell_w = (advance * 0.75).round() as i32;
        let cell_h = self.cap_height.round() as i32;
        let top = (origin.y - self.cap_height / 2.0).round() as i32;
        text.chars().enumerate().filter_map(move |(i, ch)| {
            if ch.is_whitespace() {
                return None;
            }
            let left = (origin.x + i as f32 * advance).round() as i32;
            Some((left, top, cell_w, cell_h))
        })
    }
}

impl LabelRasterizer for BlockFontRasterizer {
    fn measure(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }

    fn draw(&mut self, image: &mut TileImage, text: &str, pass: &LabelPass) -> Result<(), DemoError> {
        if let Some(glow) = pass.glow {
            // Cheap glow: a faint halo grown by the blur radius
            let spread = glow.blur.round() as i32 / 2;
            let halo = glow.color.with_alpha(glow.color.a * 0.3);
            for (x, y, w, h) in self.cells(text, pass.origin) {
                image.blend_rect(x - spread, y - spread, w + 2 * spread, h + 2 * spread, halo);
            }
        }
        for (x, y, w, h) in self.cells(text, pass.origin) {
            image.blend_rect(x, y, w, h, pass.color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(glow: Option<Glow>) -> LabelPass {
        LabelPass {
            color: Rgba::opaque(0, 255, 0),
            glow,
            origin: Vec2::new(4.0, 16.0),
        }
    }

    #[test]
    fn test_measure_counts_chars() {
        let mut r = BlockFontRasterizer::default();
        assert_eq!(r.measure(""), 0.0);
        assert_eq!(r.measure("AB C"), 4.0 * 18.0);
    }

    #[test]
    fn test_draw_marks_glyph_cells() {
        let mut r = BlockFontRasterizer::default();
        let mut image = TileImage::new(80, 32);
        r.draw(&mut image, "A B", &pass(None)).unwrap();

        // First glyph covers its cell, the space does not
        assert_eq!(image.pixel(6, 16), [0, 255, 0, 255]);
        assert_eq!(image.pixel(4 + 18 + 4, 16)[3], 0);
        assert_eq!(image.pixel(4 + 36 + 4, 16), [0, 255, 0, 255]);
    }

    #[test]
    fn test_glow_reaches_past_glyph() {
        let mut r = BlockFontRasterizer::default();
        let mut image = TileImage::new(40, 40);
        let glow = Glow {
            color: Rgba::opaque(0, 255, 0),
            blur: 8.0,
        };
        r.draw(&mut image, "A", &pass(Some(glow))).unwrap();
        // Two pixels left of the cell is halo only
        assert!(image.pixel(2, 16)[3] > 0);
        assert!(image.pixel(2, 16)[3] < 255);
    }
}
