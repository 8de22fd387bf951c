//! Background mode control
//!
//! `Background` owns the tile generator and the surface it tiles onto.
//! `BackgroundController` decides when it redraws: once per text or mode
//! change in static mode, every frame in animated mode.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec2;

use super::compositor::draw_tiled;
use super::label::LabelRasterizer;
use super::tile::TileGenerator;
use crate::frame::{FrameLoop, FrameScheduler};
use crate::renderer::surface::Surface;

struct CachedTile<I> {
    text: String,
    width: u32,
    height: u32,
    image: I,
}

pub struct Background<R, S: Surface> {
    generator: TileGenerator<R>,
    surface: S,
    size: Vec2,
    text: String,
    cached: Option<CachedTile<S::Image>>,
    regenerations: u64,
}

impl<R: LabelRasterizer, S: Surface> Background<R, S> {
    pub fn new(generator: TileGenerator<R>, surface: S, size: Vec2) -> Self {
        Self {
            generator,
            surface,
            size,
            text: String::new(),
            cached: None,
            regenerations: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Tiles generated so far
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.cached = None;
        }
    }

    /// Drop the cached tile so the next static render generates a new one
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Generate and upload a fresh tile. `None` when the upload failed.
    fn regenerate(&mut self) -> Option<CachedTile<S::Image>> {
        let tile = self.generator.generate(&self.text);
        self.regenerations += 1;
        match self.surface.create_image(&tile) {
            Ok(image) => Some(CachedTile {
                text: self.text.clone(),
                width: tile.width(),
                height: tile.height(),
                image,
            }),
            Err(e) => {
                log::warn!("Skipping background frame: {}", e);
                None
            }
        }
    }

    /// Tile the canvas from the cached tile, generating it when missing
    pub fn render_static(&mut self) {
        let stale = self.cached.as_ref().is_none_or(|c| c.text != self.text);
        if stale {
            self.cached = self.regenerate();
        }
        if let Some(c) = &self.cached {
            draw_tiled(&mut self.surface, &c.image, self.size, c.width, c.height);
        }
    }

    /// Generate a new tile and tile the canvas with it
    pub fn render_animated_frame(&mut self) {
        if let Some(fresh) = self.regenerate() {
            draw_tiled(&mut self.surface, &fresh.image, self.size, fresh.width, fresh.height);
        }
    }
}

/// Runs a `Background` in static or animated mode
pub struct BackgroundController<R, S: Surface> {
    background: Rc<RefCell<Background<R, S>>>,
    scheduler: Rc<dyn FrameScheduler>,
    task: Option<FrameLoop>,
    animated: bool,
}

impl<R, S> BackgroundController<R, S>
where
    R: LabelRasterizer + 'static,
    S: Surface + 'static,
{
    pub fn new(background: Background<R, S>, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            background: Rc::new(RefCell::new(background)),
            scheduler,
            task: None,
            animated: false,
        }
    }

    /// Switch to `text` in the given mode. Any running animation is cancelled
    /// before the new mode starts, and the tile is always regenerated.
    pub fn apply(&mut self, text: &str, animated: bool) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
        self.animated = animated;
        {
            let mut background = self.background.borrow_mut();
            background.set_text(text);
            background.invalidate();
        }

        if animated {
            let background = Rc::clone(&self.background);
            self.task = Some(FrameLoop::start(Rc::clone(&self.scheduler), move |_| {
                background.borrow_mut().render_animated_frame();
            }));
        } else {
            self.background.borrow_mut().render_static();
        }
        log::info!(
            "Background {} with text {:?}",
            if animated { "animated" } else { "static" },
            text
        );
    }

    /// Flip between static and animated; returns the new mode
    pub fn toggle_noise(&mut self) -> bool {
        let text = self.background.borrow().text().to_string();
        self.apply(&text, !self.animated);
        self.animated
    }

    /// Whether an animation task is live
    pub fn is_animating(&self) -> bool {
        self.task.as_ref().is_some_and(FrameLoop::is_running)
    }

    pub fn background(&self) -> Ref<'_, Background<R, S>> {
        self.background.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::compositor::TileGrid;
    use crate::background::label::BlockFontRasterizer;
    use crate::consts::{TILE_HEIGHT, TILE_MIN_WIDTH};
    use crate::error::DemoError;
    use crate::frame::ManualScheduler;
    use crate::renderer::surface::{DrawCommand, RecordedImage, RecordingSurface};
    use crate::background::tile::TileImage;

    const CANVAS: Vec2 = Vec2::new(1920.0, 1080.0);

    fn controller(
        scheduler: &Rc<ManualScheduler>,
    ) -> BackgroundController<BlockFontRasterizer, RecordingSurface> {
        let generator = TileGenerator::new(BlockFontRasterizer::default(), 11);
        let background = Background::new(generator, RecordingSurface::new(), CANVAS);
        BackgroundController::new(background, scheduler.clone())
    }

    fn regenerations_over(
        ctl: &BackgroundController<BlockFontRasterizer, RecordingSurface>,
        scheduler: &ManualScheduler,
        frames: usize,
    ) -> u64 {
        let before = ctl.background().regenerations();
        for f in 0..frames {
            scheduler.run_frame(f as f64 * 16.0);
        }
        ctl.background().regenerations() - before
    }

    #[test]
    fn test_static_renders_once() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut ctl = controller(&scheduler);
        ctl.apply("RETRO", false);

        assert_eq!(ctl.background().regenerations(), 1);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(regenerations_over(&ctl, &scheduler, 10), 0);
    }

    #[test]
    fn test_reapply_regenerates_static_tile() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut ctl = controller(&scheduler);
        ctl.apply("RETRO", false);
        ctl.apply("RETRO", false);
        assert_eq!(ctl.background().regenerations(), 2);
        assert_eq!(ctl.background().surface().uploads, 2);

        ctl.apply("OTHER", false);
        assert_eq!(ctl.background().regenerations(), 3);
    }

    #[test]
    fn test_mode_change_regenerates() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut ctl = controller(&scheduler);
        ctl.apply("RETRO", false);
        assert_eq!(ctl.background().regenerations(), 1);

        ctl.toggle_noise();
        scheduler.run_frame(0.0);
        assert_eq!(ctl.background().regenerations(), 2);

        // Back to static: a fresh tile, not the one from before the animation
        ctl.toggle_noise();
        assert_eq!(ctl.background().regenerations(), 3);
    }

    #[test]
    fn test_static_redraw_uses_cache() {
        let generator = TileGenerator::new(BlockFontRasterizer::default(), 8);
        let mut bg = Background::new(generator, RecordingSurface::new(), CANVAS);
        bg.set_text("RETRO");
        bg.render_static();
        bg.render_static();
        assert_eq!(bg.regenerations(), 1);

        bg.invalidate();
        bg.render_static();
        assert_eq!(bg.regenerations(), 2);
    }

    #[test]
    fn test_animated_regenerates_every_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut ctl = controller(&scheduler);
        ctl.apply("RETRO", true);

        assert!(ctl.is_animating());
        assert_eq!(regenerations_over(&ctl, &scheduler, 5), 5);
    }

    #[test]
    fn test_empty_text_still_covers_canvas() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut ctl = controller(&scheduler);
        ctl.apply("", false);

        let bg = ctl.background();
        let cmds = &bg.surface().commands;
        let draws: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawImage { at, width, height } => Some((*at, *width, *height)),
                _ => None,
            })
            .collect();
        let grid = TileGrid::for_canvas(CANVAS, TILE_MIN_WIDTH, TILE_HEIGHT);
        assert_eq!(draws.len(), grid.len());
        assert!(draws.iter().all(|(_, w, h)| *w == TILE_MIN_WIDTH && *h == TILE_HEIGHT));

        // Corners of the canvas are inside some tile
        for p in [Vec2::ZERO, CANVAS - Vec2::ONE, Vec2::new(0.0, CANVAS.y - 1.0)] {
            assert!(draws.iter().any(|(at, w, h)| {
                p.x >= at.x && p.x < at.x + *w as f32 && p.y >= at.y && p.y < at.y + *h as f32
            }));
        }
    }

    #[test]
    fn test_toggle_on_then_off_leaves_no_loop() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut ctl = controller(&scheduler);
        ctl.apply("RETRO", false);

        assert!(ctl.toggle_noise());
        scheduler.run_frame(0.0);
        assert!(!ctl.toggle_noise());

        assert!(!ctl.is_animating());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(regenerations_over(&ctl, &scheduler, 5), 0);
    }

    #[test]
    fn test_retoggle_runs_a_single_loop() {
        let scheduler = Rc::new(ManualScheduler::new());
        let mut ctl = controller(&scheduler);
        ctl.apply("RETRO", true);
        ctl.toggle_noise();
        ctl.toggle_noise();
        ctl.apply("RETRO", true);

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(regenerations_over(&ctl, &scheduler, 4), 4);
    }

    struct FailingSurface(RecordingSurface);

    impl Surface for FailingSurface {
        type Image = RecordedImage;
        fn clear(&mut self, w: f32, h: f32) {
            self.0.clear(w, h)
        }
        fn save(&mut self) {}
        fn restore(&mut self) {}
        fn translate(&mut self, _: Vec2) {}
        fn rotate(&mut self, _: f32) {}
        fn set_composite(&mut self, _: crate::renderer::CompositeOp) {}
        fn fill_circle(&mut self, _: Vec2, _: f32, _: crate::renderer::Rgba) {}
        fn stroke_circle(&mut self, _: Vec2, _: f32, _: crate::renderer::Rgba, _: f32) {}
        fn stroke_line(&mut self, _: Vec2, _: Vec2, _: crate::renderer::Rgba, _: f32) {}
        fn create_image(&mut self, _: &TileImage) -> Result<RecordedImage, DemoError> {
            Err(DemoError::ImageUpload("quota".into()))
        }
        fn draw_image(&mut self, image: &RecordedImage, at: Vec2) {
            self.0.draw_image(image, at)
        }
    }

    #[test]
    fn test_failed_upload_skips_frame() {
        let generator = TileGenerator::new(BlockFontRasterizer::default(), 2);
        let surface = FailingSurface(RecordingSurface::new());
        let mut bg = Background::new(generator, surface, CANVAS);
        bg.set_text("X");
        bg.render_animated_frame();
        bg.render_static();

        assert_eq!(bg.regenerations(), 2);
        assert!(bg.surface().0.commands.is_empty());
    }
}
