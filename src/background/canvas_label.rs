//! Label rasterizer on a scratch 2D canvas, using the browser's font engine

use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::label::{LabelPass, LabelRasterizer};
use super::tile::TileImage;
use crate::consts::LABEL_FONT;
use crate::error::DemoError;
use crate::renderer::canvas::{js_err, offscreen_canvas, put_tile, read_tile};

pub struct CanvasLabelRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasLabelRasterizer {
    pub fn new(document: &Document) -> Result<Self, DemoError> {
        let (canvas, ctx) = offscreen_canvas(document, 1, 1)?;
        Ok(Self { canvas, ctx })
    }

    /// Resizing a canvas resets its context state, so the font is set after
    fn prepare(&self, width: u32, height: u32) {
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        self.ctx.set_font(LABEL_FONT);
        self.ctx.set_text_baseline("middle");
    }
}

impl LabelRasterizer for CanvasLabelRasterizer {
    fn measure(&mut self, text: &str) -> f32 {
        self.ctx.set_font(LABEL_FONT);
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width() as f32,
            Err(e) => {
                log::warn!("measureText failed: {:?}", e);
                0.0
            }
        }
    }

    fn draw(&mut self, image: &mut TileImage, text: &str, pass: &LabelPass) -> Result<(), DemoError> {
        self.prepare(image.width(), image.height());
        put_tile(&self.ctx, image)?;

        match pass.glow {
            Some(glow) => {
                self.ctx.set_shadow_color(&glow.color.to_css());
                self.ctx.set_shadow_blur(glow.blur as f64);
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
        self.ctx.set_fill_style_str(&pass.color.to_css());
        self.ctx
            .fill_text(text, pass.origin.x as f64, pass.origin.y as f64)
            .map_err(js_err)?;
        self.ctx.set_shadow_blur(0.0);

        read_tile(&self.ctx, image)
    }
}
