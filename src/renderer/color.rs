//! Color type shared by the renderer and the tile generator

use serde::{Deserialize, Serialize};

/// 8-bit RGB with a float alpha, the way canvas styles are written
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.clamp(0.0, 1.0))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Alpha as an 8-bit channel value
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Colors for demo elements
pub mod colors {
    use super::Rgba;

    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    /// Fill for cut-out balls
    pub const CUTOUT_GRAY: Rgba = Rgba::new(200, 200, 200, 0.6);
    /// Ball palette, one per layout row
    pub const BALL_RED: Rgba = Rgba::opaque(230, 57, 70);
    pub const BALL_AMBER: Rgba = Rgba::opaque(244, 162, 97);
    pub const BALL_TEAL: Rgba = Rgba::opaque(42, 157, 143);

    /// Background tile
    pub const TILE_BACKGROUND: Rgba = Rgba::opaque(4, 28, 12);
    pub const LABEL_GLOW: Rgba = Rgba::new(0, 255, 90, 0.55);
    pub const LABEL_OVERLAY: Rgba = Rgba::new(150, 255, 170, 0.35);
    pub const LABEL_GLOW_SHADOW: Rgba = Rgba::new(0, 255, 90, 0.8);
    pub const SCANLINE: Rgba = Rgba::new(0, 0, 0, 0.25);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_u8() {
        assert_eq!(Rgba::new(0, 0, 0, 0.5).alpha_u8(), 128);
        assert_eq!(Rgba::new(0, 0, 0, -1.0).alpha_u8(), 0);
    }

    #[test]
    fn test_to_css() {
        assert_eq!(Rgba::new(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
        assert_eq!(Rgba::new(1, 2, 3, 4.0).to_css(), "rgba(1, 2, 3, 1)");
    }
}
