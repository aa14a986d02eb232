//! Ruby Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use ruby_snake::audio::AudioManager;
    use ruby_snake::consts::GRID_SIZE;
    use ruby_snake::platform::input::BUTTON_IDS;
    use ruby_snake::platform::{InputAction, KeyValueStore, map_button, map_key, now_ms};
    use ruby_snake::renderer::{RenderState, SceneOptions, build_scene};
    use ruby_snake::sim::{GamePhase, Session, Snapshot};
    use ruby_snake::{HighScore, Settings, Tuning};

    type Store = Box<dyn KeyValueStore>;

    /// Game instance holding all state
    struct Game {
        session: Session<HighScore<Store>>,
        settings: Settings,
        prefs: Store,
        audio: AudioManager,
        render_state: Option<RenderState>,
        scene: SceneOptions,
        rules_visible: bool,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let prefs = ruby_snake::platform::open_default();
            let settings = Settings::load(&prefs);
            let audio = AudioManager::new(&settings);
            let scores = HighScore::new(ruby_snake::platform::open_default());
            Self {
                session: Session::new(seed, Tuning::default(), scores),
                scene: SceneOptions::from_settings(&settings),
                settings,
                prefs,
                audio,
                render_state: None,
                rules_visible: false,
                last_phase: GamePhase::NotStarted,
            }
        }

        fn handle(&mut self, action: InputAction) {
            let now = now_ms();
            // Browsers only allow audio after a user gesture
            self.audio.resume();

            match action {
                InputAction::ToggleMute => {
                    let muted = self.settings.toggle_mute();
                    self.audio.set_muted(muted);
                    if !muted && self.session.phase() == GamePhase::Running {
                        self.audio.start_music();
                    }
                    self.settings.save(&mut self.prefs);
                }
                InputAction::ToggleRules => {
                    self.rules_visible = !self.rules_visible;
                    if let Some(document) = document() {
                        set_hidden(&document, "rules", !self.rules_visible);
                    }
                }
                _ => {
                    self.session.handle(action, now);
                    self.sync_music();
                }
            }
        }

        /// Music follows the phase: on while running, off otherwise
        fn sync_music(&mut self) {
            let phase = self.session.phase();
            if phase == self.last_phase {
                return;
            }
            match phase {
                GamePhase::Running => self.audio.start_music(),
                _ => self.audio.stop_music(),
            }
            self.last_phase = phase;
        }

        /// Pause when the page loses focus
        fn auto_pause(&mut self, reason: &str) {
            if self.session.pause(now_ms()) {
                log::info!("Auto-paused ({reason})");
                self.sync_music();
            }
        }

        fn frame(&mut self) {
            let now = now_ms();
            self.session.frame(now);
            let events = self.session.drain_events();
            self.audio.play_events(&events);
            self.sync_music();

            let snapshot = self.session.snapshot(now);
            self.render(&snapshot, now);
            self.update_hud(&snapshot);
        }

        /// Render the current frame
        fn render(&mut self, snapshot: &Snapshot, now: u64) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(snapshot, &self.scene, now);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, snap: &Snapshot) {
            let Some(document) = document() else { return };

            set_text(&document, "hud-score", &snap.score.to_string());
            set_text(&document, "hud-best", &snap.high_score.to_string());
            set_text(&document, "hud-time", &snap.food_seconds_left().to_string());

            let time_el = document.get_element_by_id("hud-time");
            if let Some(el) = time_el {
                let _ = el.class_list().toggle_with_force("low", snap.is_low_time());
            }

            set_hidden(&document, "hud-invincible", !snap.invincible);
            if snap.invincible {
                set_text(
                    &document,
                    "hud-invincible-time",
                    &snap.invincible_seconds_left().to_string(),
                );
            }

            set_hidden(&document, "start-screen", snap.phase != GamePhase::NotStarted);
            set_hidden(&document, "pause-menu", snap.phase != GamePhase::Paused);
            set_hidden(&document, "game-over", snap.phase != GamePhase::GameOver);
            if snap.phase == GamePhase::GameOver {
                set_text(&document, "final-score", &snap.score.to_string());
                set_text(&document, "final-best", &snap.high_score.to_string());
            }

            set_text(
                &document,
                "btn-mute",
                if self.audio.is_muted() { "Unmute" } else { "Mute" },
            );
            set_hidden(&document, "autopilot-indicator", !self.session.autopilot());
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Ruby Snake starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = ruby_snake::platform::clock_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let canvas = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        match canvas {
            Some(canvas) => init_renderer(&window, canvas, &game).await,
            None => log::error!("No #canvas element, rendering disabled"),
        }

        setup_input_handlers(&window, &document, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        request_animation_frame(game);
    }

    async fn init_renderer(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        game: &Rc<RefCell<Game>>,
    ) {
        let board = game.borrow().session.state().tiles() as f32 * GRID_SIZE;

        // Backing store at device resolution
        let dpr = window.device_pixel_ratio();
        let width = (board as f64 * dpr) as u32;
        let height = width;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("Failed to create surface: {err}");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(err) => {
                log::error!("Failed to get adapter: {err}");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, board).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(err) => log::error!("Failed to create device: {err}"),
        }
    }

    fn setup_input_handlers(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let Some(action) = map_key(&event.key()) else {
                    return;
                };
                // Arrows and space would scroll the page
                if action.is_direction() || action == InputAction::TogglePause {
                    event.prevent_default();
                }
                game.borrow_mut().handle(action);
            });
            let _ =
                window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen buttons
        for id in BUTTON_IDS {
            let Some(button) = document.get_element_by_id(id) else {
                continue;
            };
            let Some(action) = map_button(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.prevent_default();
                game.borrow_mut().handle(action);
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Draws every refresh; the session decides whether a tick is due
    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the autopilot plays one run on a simulated clock
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ruby_snake::audio::AudioManager;
    use ruby_snake::platform::{clock_seed, open_default};
    use ruby_snake::sim::{GameEvent, GamePhase, Session};
    use ruby_snake::{HighScore, Settings, Tuning};

    env_logger::init();

    let mut seed = clock_seed();
    let mut max_ticks: u64 = 10_000;
    let mut tuning = Tuning::default();

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                if let Some(value) = iter.next() {
                    seed = value.parse().unwrap_or(seed);
                }
            }
            "--max-ticks" => {
                if let Some(value) = iter.next() {
                    max_ticks = value.parse().unwrap_or(max_ticks);
                }
            }
            "--tuning" => {
                let Some(path) = iter.next() else {
                    eprintln!("--tuning needs a path");
                    std::process::exit(1);
                };
                let loaded = std::fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
                match loaded {
                    Ok(t) => tuning = t,
                    Err(err) => {
                        eprintln!("Invalid tuning file {path}: {err}");
                        std::process::exit(1);
                    }
                }
            }
            _ => eprintln!("Unknown argument: {}", arg),
        }
    }

    log::info!("Ruby Snake (native) starting...");
    log::info!("Native mode runs the autopilot headless - use `trunk serve` for the web version");

    let audio = AudioManager::new(&Settings::default());
    let mut session = Session::new(seed, tuning, HighScore::new(open_default()));
    session.set_autopilot(true);

    let mut now = 0;
    session.start(now);
    let mut rubies = 0;
    let mut cause = None;
    while session.phase() == GamePhase::Running && session.state().time_ticks < max_ticks {
        now += session.state().tick_interval_ms;
        session.frame(now);
        let events = session.drain_events();
        audio.play_events(&events);
        for event in events {
            match event {
                GameEvent::AteRuby => rubies += 1,
                GameEvent::Died { cause: c } => cause = Some(format!("{c:?}")),
                GameEvent::TimedOut => cause = Some("food timeout".to_string()),
                _ => {}
            }
        }
    }
    session.stop();

    let state = session.state();
    println!("Seed:        {seed}");
    println!("Ticks:       {}", state.time_ticks);
    println!("Score:       {}", state.score);
    println!("Length:      {}", state.snake.len());
    println!("Rubies:      {rubies}");
    println!("Tick (ms):   {}", state.tick_interval_ms);
    println!("Best:        {}", session.high_score());
    println!(
        "Ended by:    {}",
        cause.unwrap_or_else(|| "tick limit".to_string())
    );
}
