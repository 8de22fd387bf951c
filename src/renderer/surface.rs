//! Drawing surface abstraction
//!
//! The small subset of a 2D canvas context the demo draws with. The browser
//! build implements it on `CanvasRenderingContext2d`; `RecordingSurface` keeps
//! a command list so drawing can be checked without a browser.

use glam::Vec2;

use super::color::Rgba;
use crate::background::tile::TileImage;
use crate::error::DemoError;

/// How new pixels combine with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    /// Paint over
    SourceOver,
    /// Erase: destination alpha is reduced by the source alpha
    DestinationOut,
}

impl CompositeOp {
    /// Canvas `globalCompositeOperation` name
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOp::SourceOver => "source-over",
            CompositeOp::DestinationOut => "destination-out",
        }
    }
}

pub trait Surface {
    /// Surface-resident copy of a tile, cheap to draw repeatedly
    type Image;

    fn clear(&mut self, width: f32, height: f32);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn set_composite(&mut self, op: CompositeOp);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, line_width: f32);

    /// Upload a tile so it can be drawn with `draw_image`
    fn create_image(&mut self, tile: &TileImage) -> Result<Self::Image, DemoError>;
    fn draw_image(&mut self, image: &Self::Image, at: Vec2);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    Composite(CompositeOp),
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    StrokeCircle { center: Vec2, radius: f32, color: Rgba, line_width: f32 },
    StrokeLine { from: Vec2, to: Vec2, color: Rgba, line_width: f32 },
    DrawImage { at: Vec2, width: u32, height: u32 },
}

/// Surface that only records what was asked of it
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    /// Number of `create_image` calls
    pub uploads: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

/// Size of an uploaded tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedImage {
    pub width: u32,
    pub height: u32,
}

impl Surface for RecordingSurface {
    type Image = RecordedImage;

    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate(angle));
    }

    fn set_composite(&mut self, op: CompositeOp) {
        self.commands.push(DrawCommand::Composite(op));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            line_width,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, line_width: f32) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            color,
            line_width,
        });
    }

    fn create_image(&mut self, tile: &TileImage) -> Result<RecordedImage, DemoError> {
        self.uploads += 1;
        Ok(RecordedImage {
            width: tile.width(),
            height: tile.height(),
        })
    }

    fn draw_image(&mut self, image: &RecordedImage, at: Vec2) {
        self.commands.push(DrawCommand::DrawImage {
            at,
            width: image.width,
            height: image.height,
        });
    }
}
