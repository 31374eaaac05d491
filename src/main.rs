//! Math Playground entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, MouseEvent, PageTransitionEvent,
        PointerEvent, WheelEvent,
    };

    use math_playground::consts::*;
    use math_playground::renderer::{RenderError, RenderState};
    use math_playground::sim::SessionPhase;
    use math_playground::{Arcade, GameKind, PieceCollection, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        arcade: Arcade,
        settings: Settings,
        render_state: Option<RenderState>,
        last_time: f64,
        /// Pending requestAnimationFrame id while the loop runs
        frame_handle: Option<i32>,
        /// setInterval id while the clock runs
        timer_handle: Option<i32>,
        /// Created once; shared by every setInterval registration
        timer_closure: Option<Closure<dyn FnMut()>>,
        /// Last score written to the HUD
        shown_score: Option<u64>,
    }

    impl Game {
        fn new(arcade: Arcade, settings: Settings) -> Self {
            Self {
                arcade,
                settings,
                render_state: None,
                last_time: 0.0,
                frame_handle: None,
                timer_handle: None,
                timer_closure: None,
                shown_score: None,
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = self.arcade.vertices();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                        render_state.reconfigure();
                    }
                    Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.arcade.hud();

            if self.shown_score != Some(hud.score) {
                set_text(&document, "hud-score", &hud.score.to_string());
                self.shown_score = Some(hud.score);
            }
            set_text(&document, "hud-time", &hud.time_left.to_string());
            set_text(&document, "hud-target", &hud.target.to_string());
            if let Some(message) = self.arcade.take_notice() {
                set_text(&document, "hud-message", &message);
            }
            set_text(
                &document,
                "hud-pieces",
                &format!(
                    "{}/{}",
                    self.arcade.collection().count(),
                    math_playground::rewards::TOTAL_PIECES
                ),
            );

            if let Some(el) = document.get_element_by_id("game-over") {
                if hud.phase == SessionPhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    set_text(&document, "final-score", &hud.score.to_string());
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Persist pieces unlocked since the last frame
        fn save_rewards(&mut self) {
            let unlocked = self.arcade.drain_unlocked();
            if !unlocked.is_empty() {
                self.arcade.collection().save();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    set_text(&document, "piece-unlocked", &unlocked.join(", "));
                }
            }
        }

        fn start_timer(&mut self) {
            self.stop_timer();
            let (Some(window), Some(closure)) = (web_sys::window(), self.timer_closure.as_ref()) else {
                return;
            };
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                1000,
            ) {
                Ok(id) => self.timer_handle = Some(id),
                Err(e) => log::error!("Failed to start timer: {:?}", e),
            }
        }

        fn stop_timer(&mut self) {
            if let (Some(id), Some(window)) = (self.timer_handle.take(), web_sys::window()) {
                window.clear_interval_with_handle(id);
            }
        }

        fn cancel_frame(&mut self) {
            if let (Some(id), Some(window)) = (self.frame_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }

        /// Stop everything scheduled for this page
        fn shutdown(&mut self) {
            self.stop_timer();
            self.cancel_frame();
            log::info!("Game loop and timer stopped");
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Page-provided tuning override, falling back to the built-in tables
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Using tuning from page");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring page tuning: {}", e);
                Tuning::default()
            }
        }
    }

    /// Canvas size in CSS pixels and device pixels
    fn canvas_sizes(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> ((u32, u32), (f32, f32)) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(0);
        let client_h = canvas.client_height().max(0);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        ((width, height), (client_w as f32, client_h as f32))
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        size: (u32, u32),
        logical: (f32, f32),
    ) -> Result<RenderState, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);
        RenderState::new(surface, &adapter, size, logical).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Math Playground starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::warn!("No document, nothing to do");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("No #canvas element found");
            return;
        };

        let (size, logical) = canvas_sizes(&window, &canvas);
        canvas.set_width(size.0);
        canvas.set_height(size.1);

        let kind = GameKind::from_hash(&window.location().hash().unwrap_or_default());
        let settings = Settings::load();
        let tuning = load_tuning(&document);
        let seed = js_sys::Date::now() as u64;

        let mut arcade = Arcade::new(kind, &settings, tuning, PieceCollection::load(), seed);
        arcade.resize(logical.0, logical.1);
        let game = Rc::new(RefCell::new(Game::new(arcade, settings)));

        log::info!("{} game initialized with seed: {}", kind.as_str(), seed);

        match init_gpu(&canvas, size, logical).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("WebGPU unavailable: {}", e);
                if let Some(el) = document.get_element_by_id("gpu-error") {
                    let _ = el.set_attribute("class", "");
                }
                return;
            }
        }

        // Shared timer callback
        {
            let game_ref = game.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let mut g = game_ref.borrow_mut();
                if g.arcade.tick_second() {
                    g.stop_timer();
                }
            });
            game.borrow_mut().timer_closure = Some(closure);
        }

        if let Some(el) = document.get_element_by_id("difficulty") {
            if let Ok(select) = el.dyn_into::<HtmlSelectElement>() {
                select.set_value(game.borrow().settings.difficulty.as_str());
            }
        }
        if let Some(el) = document.get_element_by_id("ripples") {
            if let Ok(checkbox) = el.dyn_into::<HtmlInputElement>() {
                checkbox.set_checked(game.borrow().settings.ripples);
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_difficulty_select(game.clone());
        setup_ripples_toggle(game.clone());
        setup_lifecycle(&canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        start(&game, None);

        log::info!("Math Playground running!");
    }

    /// (Re)start the current game, optionally switching level first, and
    /// make sure the clock and frame loop are running.
    fn start(game: &Rc<RefCell<Game>>, difficulty: Option<math_playground::Difficulty>) {
        let needs_frame = {
            let mut g = game.borrow_mut();
            let seed = js_sys::Date::now() as u64;
            let ready = match difficulty {
                Some(level) => {
                    let kind = g.arcade.kind();
                    g.arcade.switch(kind, level, seed)
                }
                None => g.arcade.reset(),
            };
            if !ready {
                log::warn!("Canvas not laid out yet, game not started");
                return;
            }
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                set_text(&document, "hud-message", "");
            }
            g.start_timer();
            g.last_time = 0.0;
            g.frame_handle.is_none()
        };
        if needs_frame {
            request_animation_frame(game.clone());
        }
    }

    fn pointer_listener(
        canvas: &HtmlCanvasElement,
        event_name: &str,
        game: Rc<RefCell<Game>>,
        handler: fn(&mut Arcade, f32, f32),
    ) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let mut g = game.borrow_mut();
            handler(&mut g.arcade, event.offset_x() as f32, event.offset_y() as f32);
        });
        let _ = canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        pointer_listener(canvas, "pointerdown", game.clone(), Arcade::pointer_down);
        pointer_listener(canvas, "pointermove", game.clone(), Arcade::pointer_move);
        pointer_listener(canvas, "pointerup", game.clone(), Arcade::pointer_up);
        // Leaving the canvas ends any drag or pan
        pointer_listener(canvas, "pointerleave", game.clone(), Arcade::pointer_up);

        // Double click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .arcade
                    .double_click(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("dblclick", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zoom, relative to the canvas rect
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                if game.borrow_mut().arcade.wheel(event.delta_y() as f32, x, y) {
                    event.prevent_default();
                }
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_ref = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game_ref, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().frame_handle = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.arcade.update(dt);
            g.save_rewards();
            g.render();
            g.update_hud();

            // The final frozen frame stays on screen
            if g.arcade.is_over() {
                g.stop_timer();
                log::info!("Frame loop stopped at game over");
                false
            } else {
                true
            }
        };

        if keep_running {
            request_animation_frame(game);
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["restart-btn", "play-again-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    start(&game, None);
                    log::info!("Game restarted");
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_difficulty_select(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(select) = document
            .get_element_by_id("difficulty")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };

        let select_clone = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let level = {
                let mut g = game.borrow_mut();
                if !g.settings.set_difficulty_str(&select_clone.value()) {
                    return;
                }
                g.settings.save();
                g.settings.difficulty
            };
            start(&game, Some(level));
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_ripples_toggle(game: Rc<RefCell<Game>>) {
        let Some(checkbox) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("ripples"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };

        let checkbox_clone = checkbox.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let enabled = checkbox_clone.checked();
            g.settings.ripples = enabled;
            g.settings.save();
            g.arcade.set_ripples(enabled);
        });
        let _ = checkbox.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Resize tracking and teardown on navigation
    fn setup_lifecycle(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let (size, logical) = canvas_sizes(&window, &canvas);
                canvas.set_width(size.0);
                canvas.set_height(size.1);
                let mut g = game.borrow_mut();
                g.arcade.resize(logical.0, logical.1);
                if let Some(ref mut render_state) = g.render_state {
                    render_state.resize(size, logical);
                }
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving the page must not leave the clock or frame loop behind
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().shutdown();
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restored from the back/forward cache: pick up where the player left
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if !event.persisted() {
                    return;
                }
                let needs_frame = {
                    let mut g = game.borrow_mut();
                    if !g.arcade.resume() {
                        return;
                    }
                    if g.timer_handle.is_none() {
                        g.start_timer();
                    }
                    g.last_time = 0.0;
                    g.frame_handle.is_none()
                };
                if needs_frame {
                    request_animation_frame(game.clone());
                }
                log::info!("Game resumed after page restore");
            });
            let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Math Playground (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play both games for a few simulated seconds and log the outcome
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use math_playground::consts::FRAME_DT;
    use math_playground::{Arcade, ActiveGame, GameKind, PieceCollection, Settings, Tuning};

    let settings = Settings::default();
    for kind in [GameKind::Bubble, GameKind::Tower] {
        let mut arcade = Arcade::new(kind, &settings, Tuning::default(), PieceCollection::new(), 2024);
        arcade.resize(1024.0, 768.0);
        if !arcade.reset() {
            log::error!("Reset failed for {}", kind.as_str());
            continue;
        }

        for second in 0..10 {
            for _ in 0..60 {
                arcade.update(FRAME_DT);
            }
            // One scripted move per second
            match arcade.game() {
                ActiveGame::Bubble(game) => {
                    if let [a, b, ..] = game.bubbles() {
                        let (from, to) = (a.pos, b.pos);
                        arcade.pointer_down(from.x, from.y);
                        arcade.pointer_move(to.x, to.y);
                        arcade.pointer_up(to.x, to.y);
                    }
                }
                ActiveGame::Tower(game) => {
                    let nodes = game.nodes();
                    if let (Some(a), Some(b)) = (nodes.get(second % nodes.len()), nodes.last()) {
                        let (from, to) = (
                            game.camera().world_to_screen(a.pos()),
                            game.camera().world_to_screen(b.pos()),
                        );
                        arcade.pointer_down(from.x, from.y);
                        arcade.pointer_move(to.x, to.y);
                        arcade.pointer_up(to.x, to.y);
                    }
                }
            }
            arcade.tick_second();
        }

        let hud = arcade.hud();
        log::info!(
            "{}: score {}, target {}, {} s left, {} triangles",
            kind.as_str(),
            hud.score,
            hud.target,
            hud.time_left,
            arcade.vertices().len() / 3
        );
    }
    println!("Headless demo finished");
}
