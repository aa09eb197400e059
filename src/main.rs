//! Ballinatone entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use ballinatone::audio::WebAudioSink;
    use ballinatone::controls::Controls;
    use ballinatone::renderer::CanvasContext;
    use ballinatone::sim::Viewport;
    use ballinatone::{Action, App, Settings};

    /// Browser state: the app plus its canvas
    struct Game {
        app: App<Controls>,
        canvas: HtmlCanvasElement,
        wrapper: HtmlElement,
        ctx: CanvasContext,
        viewport: Viewport,
    }

    impl Game {
        /// Match the canvas to its wrapper's size
        fn resize(&mut self) {
            let width = self.wrapper.client_width().max(0) as u32;
            let height = self.wrapper.client_height().max(0) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.viewport = Viewport::new(width as f64, height as f64);
            self.app.resize(self.viewport);
        }

        fn frame(&mut self, time: f64) {
            self.ctx.begin_frame(self.viewport.width, self.viewport.height);
            self.app.frame(time, self.viewport, &mut self.ctx);
            self.ctx.end_frame();
        }
    }

    fn event_pos(event: &MouseEvent) -> DVec2 {
        DVec2::new(event.client_x() as f64, event.client_y() as f64)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ballinatone starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let wrapper: HtmlElement = document
            .get_element_by_id("main-wrapper")
            .expect("no wrapper")
            .dyn_into()
            .expect("wrapper is not an HtmlElement");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("main-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        if !Settings::is_stored() {
            settings.save();
        }
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let controls = Controls::new(&settings, seed);

        let audio = Rc::new(WebAudioSink::new(&settings.compressor));
        audio.load_sample(&settings.sample_url).await;

        let game = Rc::new(RefCell::new(Game {
            app: App::new(Viewport::default(), controls, audio),
            canvas: canvas.clone(),
            wrapper,
            ctx: CanvasContext::new(ctx),
            viewport: Viewport::default(),
        }));
        game.borrow_mut().resize();

        log::info!("Initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());
        setup_visibility(game.clone());

        request_animation_frame(game);

        log::info!("Ballinatone running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer position, used for spawning
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().app.pointer_moved(event_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click removes whatever is under the pointer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .app
                    .apply(Action::RemoveAt(event_pos(&event)));
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let document = web_sys::window().unwrap().document().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().app.key(&event.key());
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// rAF stops while the tab is hidden, so restart timing on hide
    fn setup_visibility(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                game.borrow_mut().app.pause_clock();
                log::debug!("Tab hidden, frame clock reset");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ballinatone (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the web version");

    // ballinatone [settings.json] [scale]
    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => match ballinatone::Settings::from_path(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Cannot load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ballinatone::Settings::load(),
    };
    if let Some(name) = args.next() {
        match name.parse() {
            Ok(scale) => settings.pitch_scale = scale,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }
    }
    log::info!("Pitch scale: {}", settings.pitch_scale);

    if let Err(e) = headless_demo(&settings) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

/// Drop a ring of note balls, fire balls at them and report what played
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(settings: &ballinatone::Settings) -> ballinatone::Result<()> {
    use std::rc::Rc;

    use ballinatone::audio::LogSink;
    use ballinatone::controls::Controls;
    use ballinatone::renderer::ShapeBatch;
    use ballinatone::sim::Viewport;
    use ballinatone::{Action, App};
    use glam::DVec2;

    const FRAMES: u32 = 600;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    let viewport = Viewport::new(1280.0, 720.0);
    let controls = Controls::try_new(settings, settings.seed.unwrap_or(2024))?;
    let audio = Rc::new(LogSink::new());
    let mut app = App::new(viewport, controls, audio.clone());
    let mut batch = ShapeBatch::new();

    let center = viewport.center();
    for i in 0..6 {
        let angle = i as f64 / 6.0 * std::f64::consts::TAU;
        app.apply(Action::SpawnSoundBall(center + DVec2::from_angle(angle) * 250.0));
    }
    for _ in 0..8 {
        app.apply(Action::SpawnBall(center));
    }

    for frame in 0..FRAMES {
        batch.clear();
        app.frame(frame as f64 * FRAME_MS, viewport, &mut batch);
    }

    log::info!(
        "{} frames: {} entities left, {} notes played, {} vertices in last frame",
        FRAMES,
        app.scene.len(),
        audio.played(),
        batch.len()
    );
    println!("{}", serde_json::to_string_pretty(&app.scene.snapshot())?);
    Ok(())
}
