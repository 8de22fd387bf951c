//! Retro Bounce entry point
//!
//! In the browser this wires the canvases, input and frame loops together.
//! Natively it runs a short headless session and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent};

    use retro_bounce::background::canvas_label::CanvasLabelRasterizer;
    use retro_bounce::background::{Background, BackgroundController, TileGenerator};
    use retro_bounce::consts::*;
    use retro_bounce::frame::{BrowserScheduler, FrameLoop, FrameScheduler};
    use retro_bounce::renderer::canvas::{CanvasSurface, canvas_context};
    use retro_bounce::renderer::draw_scene;
    use retro_bounce::sim::{SimulationSession, tick};
    use retro_bounce::{DemoError, Settings};

    const SIM_CANVAS_ID: &str = "canvas";
    const BACKGROUND_CANVAS_ID: &str = "background";
    const MENU_ID: &str = "menu";

    /// Everything one running demo owns
    struct App {
        settings: Settings,
        session: SimulationSession,
        surface: CanvasSurface,
        size: Vec2,
        background: BackgroundController<CanvasLabelRasterizer, CanvasSurface>,
    }

    impl App {
        /// Advance one fixed step and redraw the balls
        fn frame(&mut self) {
            tick(&mut self.session);
            let views = self.session.views();
            draw_scene(&mut self.surface, self.size, &views, self.settings.graphics_style);
        }

        fn restart(&mut self) {
            self.session.rebuild(&self.settings);
        }

        /// Apply new settings: full ball rebuild and a fresh background
        fn apply(&mut self, settings: Settings) {
            log::info!(
                "Applying settings: style={} graphics={} noise={}",
                settings.start_style.as_str(),
                settings.graphics_style.as_str(),
                settings.noise_animated
            );
            self.settings = settings;
            self.session.rebuild(&self.settings);
            self.background
                .apply(&self.settings.background_text, self.settings.noise_animated);
        }

        fn toggle_noise(&mut self) {
            self.settings.noise_animated = self.background.toggle_noise();
            log::info!("Background noise animated: {}", self.settings.noise_animated);
        }
    }

    struct Runtime {
        app: Rc<RefCell<App>>,
        _sim_loop: FrameLoop,
    }

    thread_local! {
        static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
    }

    /// Merge a JSON settings object from the page into the running demo
    #[wasm_bindgen]
    pub fn apply_settings(json: &str) {
        RUNTIME.with(|rt| match rt.borrow().as_ref() {
            Some(rt) => {
                let mut app = rt.app.borrow_mut();
                let merged = app.settings.merge_json(json);
                app.apply(merged);
            }
            None => log::warn!("apply_settings called before startup"),
        });
    }

    fn overlay_open(document: &Document) -> bool {
        document
            .get_element_by_id(MENU_ID)
            .is_some_and(|menu| menu.class_list().contains("open"))
    }

    pub fn run() -> Result<(), DemoError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
        }

        log::info!("Retro Bounce starting...");

        let window =
            web_sys::window().ok_or_else(|| DemoError::MissingElement("window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DemoError::MissingElement("document".to_string()))?;

        let (sim_canvas, sim_ctx) = canvas_context(&document, SIM_CANVAS_ID)?;
        let (bg_canvas, bg_ctx) = canvas_context(&document, BACKGROUND_CANVAS_ID)?;
        for canvas in [&sim_canvas, &bg_canvas] {
            canvas.set_width(CANVAS_WIDTH);
            canvas.set_height(CANVAS_HEIGHT);
        }
        let size = Vec2::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32);

        let seed = js_sys::Date::now() as u64;
        let scheduler: Rc<dyn FrameScheduler> = Rc::new(BrowserScheduler::new(window.clone()));

        let generator = TileGenerator::new(CanvasLabelRasterizer::new(&document)?, seed);
        let background = Background::new(
            generator,
            CanvasSurface::new(bg_ctx, document.clone()),
            size,
        );

        let settings = Settings::default();
        let mut session = SimulationSession::new(size.x, size.y, seed);
        session.rebuild(&settings);

        let app = Rc::new(RefCell::new(App {
            settings,
            session,
            surface: CanvasSurface::new(sim_ctx, document.clone()),
            size,
            background: BackgroundController::new(background, Rc::clone(&scheduler)),
        }));
        {
            let mut a = app.borrow_mut();
            let text = a.settings.background_text.clone();
            let animated = a.settings.noise_animated;
            a.background.apply(&text, animated);
        }
        log::info!("Session initialized with seed: {}", seed);

        setup_input_handlers(&window, &document, &sim_canvas, Rc::clone(&app));

        let sim_loop = {
            let app = Rc::clone(&app);
            FrameLoop::start(scheduler, move |_| app.borrow_mut().frame())
        };
        RUNTIME.with(|rt| {
            *rt.borrow_mut() = Some(Runtime {
                app,
                _sim_loop: sim_loop,
            })
        });

        log::info!("Retro Bounce running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        document: &Document,
        canvas: &web_sys::HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) {
        // Click restarts, unless the menu is covering the canvas
        {
            let app = app.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if overlay_open(&document) {
                    return;
                }
                app.borrow_mut().restart();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let "n" | "N" = event.key().as_str() {
                    app.borrow_mut().toggle_noise();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), retro_bounce::DemoError> {
    env_logger::init();
    log::info!("Retro Bounce (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the canvas version");

    headless::run_simulation(retro_bounce::StartStyle::New)?;
    headless::run_simulation(retro_bounce::StartStyle::Old)?;
    headless::run_background();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use retro_bounce::background::{
        Background, BackgroundController, BlockFontRasterizer, TileGenerator,
    };
    use retro_bounce::consts::*;
    use retro_bounce::frame::{FrameLoop, ManualScheduler};
    use retro_bounce::renderer::RecordingSurface;
    use retro_bounce::sim::{SimulationSession, tick};
    use retro_bounce::{DemoError, Settings, StartStyle};

    const SEED: u64 = 0x5eed;
    /// Three seconds at the fixed step
    const FRAMES: usize = 180;

    /// Run one session through a manual frame loop and log the end state
    pub fn run_simulation(style: StartStyle) -> Result<(), DemoError> {
        let settings = Settings {
            start_style: style,
            ..Settings::default()
        };
        let mut session = SimulationSession::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32, SEED);
        session.rebuild(&settings);
        let start_energy = session.speed_squared_sum();

        let session = Rc::new(RefCell::new(session));
        let ejections = Rc::new(RefCell::new(0usize));
        let scheduler = Rc::new(ManualScheduler::new());
        let task = {
            let session = Rc::clone(&session);
            let ejections = Rc::clone(&ejections);
            FrameLoop::start(scheduler.clone(), move |_| {
                let report = tick(&mut session.borrow_mut());
                *ejections.borrow_mut() += report.ejections.len();
            })
        };
        for frame in 0..FRAMES {
            scheduler.run_frame(frame as f64 * SIM_DT as f64 * 1000.0);
        }
        task.cancel();

        let session = session.borrow();
        log::info!(
            "[{}] {} frames, {} corner ejections, speed^2 sum {:.2} -> {:.2}",
            style.as_str(),
            session.frames,
            ejections.borrow(),
            start_energy,
            session.speed_squared_sum()
        );
        log::info!(
            "[{}] snapshot: {}",
            style.as_str(),
            serde_json::to_string(&session.snapshot())?
        );
        Ok(())
    }

    /// Build the background once static and a few frames animated
    pub fn run_background() {
        let settings = Settings::default();
        let size = Vec2::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32);
        let scheduler = Rc::new(ManualScheduler::new());
        let generator = TileGenerator::new(BlockFontRasterizer::default(), SEED);
        let background = Background::new(generator, RecordingSurface::new(), size);
        let mut controller = BackgroundController::new(background, scheduler.clone());

        controller.apply(&settings.background_text, false);
        controller.toggle_noise();
        for frame in 0..3 {
            scheduler.run_frame(frame as f64 * 16.0);
        }
        controller.toggle_noise();

        let bg = controller.background();
        log::info!(
            "Background: {} tiles generated, {} uploads, {} draw calls",
            bg.regenerations(),
            bg.surface().uploads,
            bg.surface().commands.len()
        );
    }
}
