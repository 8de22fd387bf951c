//! Background tile generation
//!
//! A tile is the label on a dark green field, roughened in a fixed order:
//! 1. Solid background fill
//! 2. Label twice (glowing pass, then a lighter overlay)
//! 3. One-pixel smear in four directions
//! 4. Per-channel random noise, green strongest
//! 5. Scanlines every other row
//!
//! Each step works on the output of the previous one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::label::{Glow, LabelPass, LabelRasterizer};
use crate::consts::{TILE_HEIGHT, TILE_MAX_WIDTH, TILE_MIN_WIDTH, TILE_PADDING};
use crate::renderer::color::{Rgba, colors};

/// Opacity of each smear copy
const SMEAR_ALPHA: f32 = 0.12;
/// Largest noise step per channel, before weighting
const NOISE_AMPLITUDE: f32 = 28.0;
/// Noise weight per channel (r, g, b)
const NOISE_WEIGHTS: [f32; 3] = [0.45, 1.0, 0.55];
/// Glow blur radius of the first label pass
const GLOW_BLUR: f32 = 8.0;

/// RGBA8 raster, row-major, straight alpha
#[derive(Debug, Clone, PartialEq)]
pub struct TileImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl TileImage {
    /// Transparent image. Each dimension is clamped to `1..=TILE_MAX_WIDTH`.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.clamp(1, TILE_MAX_WIDTH);
        let height = height.clamp(1, TILE_MAX_WIDTH);
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .unwrap_or(0);
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite pixels from an RGBA8 buffer of the same size
    pub fn copy_from(&mut self, bytes: &[u8]) {
        let n = self.data.len().min(bytes.len());
        self.data[..n].copy_from_slice(&bytes[..n]);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    pub fn fill(&mut self, color: Rgba) {
        let px = [color.r, color.g, color.b, color.alpha_u8()];
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Source-over blend of `src` onto one pixel, scaled by `opacity`
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4], opacity: f32) {
        let i = self.index(x, y);
        let sa = src[3] as f32 / 255.0 * opacity.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let da = self.data[i + 3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for c in 0..3 {
            let s = src[c] as f32;
            let d = self.data[i + c] as f32;
            let v = (s * sa + d * da * (1.0 - sa)) / out_a;
            self.data[i + c] = v.round().clamp(0.0, 255.0) as u8;
        }
        self.data[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Blend a solid rectangle, clipped to the image
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        let src = [color.r, color.g, color.b, 255];
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px as u32, py as u32, src, color.a);
            }
        }
    }
}

/// Tile width for a label of measured width `measured` px.
///
/// Never narrower than `TILE_MIN_WIDTH`, so empty or very short text still
/// gives a usable tile, and never wider than `TILE_MAX_WIDTH`.
pub fn tile_width(measured: f32) -> u32 {
    let text = measured.max(0.0).ceil() as u32;
    text.saturating_add(TILE_PADDING).clamp(TILE_MIN_WIDTH, TILE_MAX_WIDTH)
}

/// Step 3: composite the tile over itself shifted one pixel each way
pub fn smear(image: &mut TileImage, opacity: f32) {
    let offsets = [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)];
    let (w, h) = (image.width as i32, image.height as i32);
    for (dx, dy) in offsets {
        let copy = image.clone();
        for y in 0..h {
            for x in 0..w {
                let (sx, sy) = (x - dx, y - dy);
                if sx < 0 || sy < 0 || sx >= w || sy >= h {
                    continue;
                }
                let src = copy.pixel(sx as u32, sy as u32);
                image.blend_pixel(x as u32, y as u32, src, opacity);
            }
        }
    }
}

/// Step 4: independent random offset per pixel and channel
pub fn add_noise<R: Rng + ?Sized>(image: &mut TileImage, rng: &mut R, amplitude: f32, weights: [f32; 3]) {
    for chunk in image.data.chunks_exact_mut(4) {
        for (c, weight) in weights.iter().enumerate() {
            let delta = (rng.random::<f32>() * 2.0 - 1.0) * amplitude * weight;
            chunk[c] = (chunk[c] as f32 + delta).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Step 5: darken every second row
pub fn scanlines(image: &mut TileImage, line: Rgba) {
    let w = image.width as i32;
    for y in (0..image.height as i32).step_by(2) {
        image.blend_rect(0, y, w, 1, line);
    }
}

/// Builds tiles for a label, owning the rasterizer and the noise RNG
pub struct TileGenerator<R> {
    rasterizer: R,
    rng: Pcg32,
}

impl<R: LabelRasterizer> TileGenerator<R> {
    pub fn new(rasterizer: R, seed: u64) -> Self {
        Self {
            rasterizer,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Render a complete tile for `text`
    pub fn generate(&mut self, text: &str) -> TileImage {
        let measured = self.rasterizer.measure(text);
        let mut image = TileImage::new(tile_width(measured), TILE_HEIGHT);

        image.fill(colors::TILE_BACKGROUND);

        let origin = Vec2::new(
            (image.width() as f32 - measured.max(0.0)) / 2.0,
            image.height() as f32 / 2.0,
        );
        let passes = [
            LabelPass {
                color: colors::LABEL_GLOW,
                glow: Some(Glow {
                    color: colors::LABEL_GLOW_SHADOW,
                    blur: GLOW_BLUR,
                }),
                origin,
            },
            LabelPass {
                color: colors::LABEL_OVERLAY,
                glow: None,
                origin,
            },
        ];
        for pass in &passes {
            if let Err(e) = self.rasterizer.draw(&mut image, text, pass) {
                // Keep going: a tile without its label beats a missing frame
                log::warn!("Label pass failed: {}", e);
            }
        }

        smear(&mut image, SMEAR_ALPHA);
        add_noise(&mut image, &mut self.rng, NOISE_AMPLITUDE, NOISE_WEIGHTS);
        scanlines(&mut image, colors::SCANLINE);

        image
    }
}
