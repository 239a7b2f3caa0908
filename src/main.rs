//! Ciallo Fireworks entry point
//!
//! On the web: wires the page (home/game screens, canvas, pointer input) to
//! the show. Natively: runs the show headless and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use ciallo_fireworks::platform::{self, RafScheduler};
    use ciallo_fireworks::renderer::{CanvasSurface, Surface};
    use ciallo_fireworks::{Show, ShowSettings};
    use glam::Vec2;

    /// Page state shared by all callbacks
    struct App {
        show: Show,
        surface: CanvasSurface,
        /// Instructions fade after the first launch
        instructions_visible: bool,
    }

    type SharedApp = Rc<RefCell<App>>;

    fn scheduler(app: &SharedApp) -> RafScheduler {
        let app = app.clone();
        RafScheduler::new(Rc::new(move |_time: f64| on_animation_frame(&app)))
    }

    fn on_animation_frame(app: &SharedApp) {
        let mut scheduler = scheduler(app);
        let mut guard = app.borrow_mut();
        let App { show, surface, .. } = &mut *guard;
        if let Err(e) = show.on_frame(&mut scheduler, surface) {
            log::error!("Frame failed: {}", e);
        }
    }

    /// Launch toward a canvas-space point
    fn launch(app: &SharedApp, x: f32, y: f32) {
        let mut g = app.borrow_mut();
        let outcome = g.show.launch(Vec2::new(x, y), platform::now_ms());
        if outcome.is_launched() && g.instructions_visible {
            g.instructions_visible = false;
            if let Some(el) = platform::html_element("instructions") {
                platform::set_opacity(&el, "0");
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ciallo Fireworks starting...");

        let canvas: HtmlCanvasElement = platform::document()
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let surface = match CanvasSurface::new(canvas.clone()) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Canvas unavailable: {}", e);
                return;
            }
        };

        let settings = ShowSettings::load();
        let seed = js_sys::Date::now() as u64;
        let show = match Show::new(settings, seed) {
            Ok(show) => show,
            Err(e) => {
                log::error!("{}; falling back to defaults", e);
                match Show::new(ShowSettings::default(), seed) {
                    Ok(show) => show,
                    Err(e) => {
                        log::error!("{}", e);
                        return;
                    }
                }
            }
        };

        let app: SharedApp = Rc::new(RefCell::new(App {
            show,
            surface,
            instructions_visible: true,
        }));

        setup_screens(&app);
        setup_pointer_input(&canvas, &app);
        setup_resize(&app);

        log::info!("Ready, seed {}", seed);
    }

    fn setup_screens(app: &SharedApp) {
        // Start: home fades out, game fades in, show begins
        if let Some(btn) = platform::html_element("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Some(home) = platform::html_element("home-screen") {
                    platform::set_opacity(&home, "0");
                    platform::set_timeout(800, move || platform::hide(&home));
                }
                if let Some(game) = platform::html_element("game-screen") {
                    platform::reveal(&game);
                    platform::set_opacity(&game, "1");
                    platform::set_pointer_events(&game, "auto");
                }

                let mut scheduler = scheduler(&app);
                let mut g = app.borrow_mut();
                let viewport = g.surface.fit_to_device();
                if let Err(e) = g.show.start(viewport, &mut scheduler) {
                    log::error!("Could not start show: {}", e);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back: stop immediately, clear the canvas once the fade is done
        if let Some(btn) = platform::html_element("back-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut scheduler = scheduler(&app);
                app.borrow_mut().show.stop(&mut scheduler);

                if let Some(game) = platform::html_element("game-screen") {
                    platform::set_opacity(&game, "0");
                    platform::set_pointer_events(&game, "none");
                }
                if let Some(home) = platform::html_element("home-screen") {
                    platform::reveal(&home);
                    platform::set_opacity(&home, "1");
                }

                let app = app.clone();
                platform::set_timeout(1000, move || {
                    let mut g = app.borrow_mut();
                    // Leave a show restarted during the fade alone
                    if g.show.is_running() {
                        return;
                    }
                    if let Some(game) = platform::html_element("game-screen") {
                        platform::hide(&game);
                    }
                    g.surface.clear();
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer_input(canvas: &HtmlCanvasElement, app: &SharedApp) {
        // Mouse down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                launch(&app, event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: one launch per active touch
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = canvas_clone.get_bounding_client_rect();
                let touches = event.touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let x = touch.client_x() as f32 - rect.left() as f32;
                        let y = touch.client_y() as f32 - rect.top() as f32;
                        launch(&app, x, y);
                    }
                }
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    fn setup_resize(app: &SharedApp) {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = app.borrow_mut();
            if g.show.is_running() {
                let viewport = g.surface.fit_to_device();
                g.show.resize(viewport);
            }
        });
        let _ = platform::window()
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ciallo Fireworks (native) starting...");
    log::info!("The page build runs in the browser - use `trunk serve` for the web version");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.first() {
        Some(arg) => match native::settings_from_arg(arg) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(2);
            }
        },
        None => ciallo_fireworks::ShowSettings::load(),
    };
    let frames = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(600);

    if let Err(e) = native::run_headless(settings, frames) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ciallo_fireworks::renderer::RecordingSurface;
    use ciallo_fireworks::settings::SettingsError;
    use ciallo_fireworks::sim::Viewport;
    use ciallo_fireworks::{ManualScheduler, Show, ShowError, ShowSettings, Variant};
    use glam::Vec2;

    /// Frame period used for the cooldown clock
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// A preset name or a path to a settings JSON file
    pub fn settings_from_arg(arg: &str) -> Result<ShowSettings, SettingsError> {
        if let Some(variant) = Variant::from_str(arg) {
            return Ok(variant.settings());
        }
        let json = std::fs::read_to_string(arg)
            .map_err(|e| SettingsError::Json(format!("{arg}: {e}")))?;
        ShowSettings::from_json(&json)
    }

    /// Run `frames` frames on a 400x600 canvas with one pointer launch
    pub fn run_headless(settings: ShowSettings, frames: u64) -> Result<(), ShowError> {
        let seed = 2024;
        let mut show = Show::new(settings, seed)?;
        let mut scheduler = ManualScheduler::default();
        let mut surface = RecordingSurface::default();

        show.start(Viewport::new(400.0, 600.0), &mut scheduler)?;
        let outcome = show.launch(Vec2::new(200.0, 100.0), 0.0);
        log::info!("Pointer launch: {:?}", outcome);

        let mut explosions = 0;
        let mut peak_particles = 0;
        let mut frame = 0;
        while frame < frames && scheduler.take_pending().is_some() {
            if let Some(summary) = show.on_frame(&mut scheduler, &mut surface)? {
                explosions += summary.exploded;
                if summary.exploded > 0 {
                    log::info!(
                        "Frame {}: {} explosion(s), {} particles live",
                        frame + 1,
                        summary.exploded,
                        show.state().particles.len()
                    );
                }
            }
            peak_particles = peak_particles.max(show.state().particles.len());
            surface.take_ops();
            frame += 1;
        }

        log::info!(
            "{} frames, {} explosions, peak {} particles, {} draw calls",
            frame,
            explosions,
            peak_particles,
            surface.total_ops
        );
        show.stop(&mut scheduler);
        Ok(())
    }
}
