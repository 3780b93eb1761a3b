//! Maxwell's Demon entry point
//!
//! Handles platform-specific initialization and runs the game loop.

use maxwells_demon::audio::AudioManager;
use maxwells_demon::sim::{GameEvent, GameState};
use maxwells_demon::telemetry::Telemetry;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Hand the side effects queued by the last tick to the collaborators
fn forward_events(state: &mut GameState, audio: &mut AudioManager, telemetry: &mut Telemetry) {
    for event in state.drain_events() {
        match event {
            GameEvent::Sound(clip) => audio.play_one_shot(clip),
            GameEvent::Telemetry(record) => telemetry.log_async(&record),
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::Clamped;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, MouseEvent, TouchEvent};

    use maxwells_demon::audio::AudioManager;
    use maxwells_demon::consts::*;
    use maxwells_demon::input::ActivationInput;
    use maxwells_demon::renderer::{PixelBuffer, Scene};
    use maxwells_demon::sim::{GameState, tick};
    use maxwells_demon::telemetry::{Telemetry, new_play_id};
    use maxwells_demon::{GAME_NAME, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scene: Scene,
        frame: PixelBuffer,
        ctx: CanvasRenderingContext2d,
        input: ActivationInput,
        audio: AudioManager,
        telemetry: Telemetry,
        autopilot: bool,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.update();
                let input = self.input.tick_input(self.autopilot);
                tick(&mut self.state, &input);
                super::forward_events(&mut self.state, &mut self.audio, &mut self.telemetry);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Draw the current state and upload it to the canvas
        fn render(&mut self) {
            self.scene.draw(&mut self.frame, &self.state);
            let image = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(self.frame.as_bytes()),
                self.frame.width(),
                self.frame.height(),
            );
            match image {
                Ok(image) => {
                    if let Err(e) = self.ctx.put_image_data(&image, 0.0, 0.0) {
                        log::warn!("Frame upload failed: {:?}", e);
                    }
                }
                Err(e) => log::warn!("ImageData creation failed: {:?}", e),
            }
        }
    }

    /// Settings object the page may define as `window.GAME_SETTINGS`
    fn page_settings(window: &web_sys::Window) -> Settings {
        let value = js_sys::Reflect::get(window, &JsValue::from_str("GAME_SETTINGS"))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null());
        let Some(value) = value else {
            return Settings::default();
        };
        match js_sys::JSON::stringify(&value).ok().and_then(|s| s.as_string()) {
            Some(json) => Settings::from_json(&json),
            None => {
                log::warn!("GAME_SETTINGS is not serializable, using defaults");
                Settings::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Maxwell's Demon starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };
        canvas.set_width(SCREEN_WIDTH);
        canvas.set_height(SCREEN_HEIGHT);

        let ctx = match canvas.get_context("2d") {
            Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::error!("Context is not 2d");
                    return;
                }
            },
            _ => {
                log::error!("Failed to get 2d context");
                return;
            }
        };

        let settings = page_settings(&window);
        let seed = settings.resolve_seed();
        let play_id = new_play_id(&mut rand::rng());
        log::info!("Game initialized with seed: {}, play id: {}", seed, play_id);

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed),
            scene: Scene::new(),
            frame: PixelBuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            ctx,
            input: ActivationInput::new(),
            audio: AudioManager::new(settings.master_volume, settings.sfx_volume, settings.muted),
            telemetry: Telemetry::spawn(GAME_NAME, play_id, settings.telemetry_enabled),
            autopilot: settings.autopilot,
            accumulator: 0.0,
            last_time: 0.0,
        }));

        setup_input_handlers(&window, &canvas, game.clone());

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Maxwell's Demon running!");
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Mouse down - activation, and unlock audio on the first gesture
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.pointer_down();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up anywhere releases
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        g.input.touch_start(touch.identifier());
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        g.input.touch_end(touch.identifier());
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "a" | "A" => {
                        g.autopilot = !g.autopilot;
                        log::info!("Autopilot: {}", g.autopilot);
                    }
                    "m" | "M" => {
                        let muted = !g.audio.is_muted();
                        g.audio.set_muted(muted);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use maxwells_demon::audio::AudioManager;
    use maxwells_demon::consts::*;
    use maxwells_demon::renderer::{PixelBuffer, Scene, colors};
    use maxwells_demon::sim::{GameMode, GameState, TickInput, tick};
    use maxwells_demon::telemetry::{Telemetry, new_play_id};
    use maxwells_demon::{GAME_NAME, Settings};

    /// Environment variable holding the number of levels to play
    const LEVELS_VAR: &str = "GAME_LEVELS";
    const DEFAULT_LEVELS: u32 = 3;
    /// Simulated time allowed per level before giving up
    const TICK_BUDGET_PER_LEVEL: u64 = 30 * 60 * TICKS_PER_SECOND;

    fn levels_from_env() -> u32 {
        match std::env::var(LEVELS_VAR) {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!("Ignoring invalid {LEVELS_VAR}={raw:?}");
                    DEFAULT_LEVELS
                }
            },
            Err(_) => DEFAULT_LEVELS,
        }
    }

    /// Play `GAME_LEVELS` levels with the autopilot, rendering one frame
    /// per simulated second
    pub fn run() {
        let settings = Settings::from_env();
        let levels = levels_from_env();
        let seed = settings.resolve_seed();
        let play_id = new_play_id(&mut rand::rng());
        log::info!("Maxwell's Demon (headless) seed {seed}, {levels} level(s), play id {play_id}");
        if !settings.autopilot {
            log::info!("No player attached, autopilot takes over");
        }

        let mut audio =
            AudioManager::new(settings.master_volume, settings.sfx_volume, settings.muted);
        let mut telemetry = Telemetry::spawn(GAME_NAME, play_id, settings.telemetry_enabled);
        let mut scene = Scene::new();
        let mut frame = PixelBuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let mut state = GameState::new(seed);
        super::forward_events(&mut state, &mut audio, &mut telemetry);

        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let budget = TICK_BUDGET_PER_LEVEL * levels as u64;
        let mut frames = 0u64;
        let mut records = Vec::new();

        while state.time_ticks < budget {
            let before = state.mode;
            tick(&mut state, &input);
            super::forward_events(&mut state, &mut audio, &mut telemetry);

            if state.time_ticks % TICKS_PER_SECOND == 0 {
                scene.draw(&mut frame, &state);
                frames += 1;
            }

            if before == GameMode::Playing && state.mode == GameMode::Complete {
                records.push((state.level, state.elapsed_secs));
                if state.level >= levels {
                    scene.draw(&mut frame, &state);
                    frames += 1;
                    break;
                }
            }
        }

        for (level, secs) in &records {
            log::info!("Level {level}: sorted in {secs}s");
        }
        if (records.len() as u32) < levels {
            log::warn!(
                "Tick budget ran out on level {} after {} ticks",
                state.level,
                state.time_ticks
            );
        }
        let ink = frame.pixels().len() - frame.count(colors::BACKGROUND);
        log::info!(
            "{} ticks, {} frames (last frame {} drawn pixels), {} sounds, canvas {:?}",
            state.time_ticks,
            frames,
            ink,
            audio.played(),
            scene.dots().canvas().capacity()
        );

        telemetry.shutdown();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
