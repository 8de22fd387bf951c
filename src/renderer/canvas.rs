//! `Surface` on a browser 2D canvas context

use glam::Vec2;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use super::color::Rgba;
use super::surface::{CompositeOp, Surface};
use crate::background::tile::TileImage;
use crate::error::DemoError;

/// Look up a canvas by id and take its 2D context
pub fn canvas_context(
    document: &Document,
    id: &str,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), DemoError> {
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(|| DemoError::MissingElement(id.to_string()))?;
    let ctx = context_2d(&canvas).ok_or_else(|| DemoError::ContextUnavailable(id.to_string()))?;
    Ok((canvas, ctx))
}

/// Create a detached canvas of the given size
pub fn offscreen_canvas(
    document: &Document,
    width: u32,
    height: u32,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), DemoError> {
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(|| DemoError::MissingElement("offscreen canvas".to_string()))?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = context_2d(&canvas)
        .ok_or_else(|| DemoError::ContextUnavailable("offscreen canvas".to_string()))?;
    Ok((canvas, ctx))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into().ok())
}

pub(crate) fn js_err(e: JsValue) -> DemoError {
    DemoError::ImageUpload(format!("{:?}", e))
}

/// Copy tile pixels into the top-left corner of a context
pub(crate) fn put_tile(ctx: &CanvasRenderingContext2d, tile: &TileImage) -> Result<(), DemoError> {
    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(tile.as_bytes()),
        tile.width(),
        tile.height(),
    )
    .map_err(js_err)?;
    ctx.put_image_data(&data, 0.0, 0.0).map_err(js_err)
}

/// Read a context's pixels back into a tile
pub(crate) fn read_tile(ctx: &CanvasRenderingContext2d, tile: &mut TileImage) -> Result<(), DemoError> {
    let data = ctx
        .get_image_data(0.0, 0.0, tile.width() as f64, tile.height() as f64)
        .map_err(js_err)?;
    tile.copy_from(&data.data().0);
    Ok(())
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    document: Document,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, document: Document) -> Self {
        Self { ctx, document }
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlCanvasElement;

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle as f64);
    }

    fn set_composite(&mut self, op: CompositeOp) {
        let _ = self.ctx.set_global_composite_operation(op.as_str());
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.circle_path(center, radius);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, line_width: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn create_image(&mut self, tile: &TileImage) -> Result<HtmlCanvasElement, DemoError> {
        let (canvas, ctx) = offscreen_canvas(&self.document, tile.width(), tile.height())?;
        put_tile(&ctx, tile)?;
        Ok(canvas)
    }

    fn draw_image(&mut self, image: &HtmlCanvasElement, at: Vec2) {
        let _ = self
            .ctx
            .draw_image_with_html_canvas_element(image, at.x as f64, at.y as f64);
    }
}
