//! Echo Runner entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, EventTarget, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, Window};

    use echo_runner::Settings;
    use echo_runner::platform::{Adapter, AdapterEvent, SpriteLoad, Variant};
    use echo_runner::renderer::{RenderState, SceneOptions, Scenery, SpriteSheet, scene};
    use echo_runner::sim::Snapshot;

    /// Viewports at most this wide with a touch screen get the touch variant
    const TOUCH_BREAKPOINT: f64 = 768.0;
    const SPRITE_URL: &str = "echo-sprite/echo-side.png";

    type FrameHandle = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Input listener kept so teardown can detach it
    struct Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    struct Game {
        adapter: Adapter,
        canvas: HtmlCanvasElement,
        render_state: Option<RenderState>,
        scenery: Scenery,
        sprite: Option<SpriteSheet>,
        sprite_load: SpriteLoad,
        settings: Settings,
        /// Self-rescheduling frame callback; emptied on teardown
        frame: FrameHandle,
        raf_id: Option<i32>,
        loading_shown: bool,
        listeners: Vec<Listener>,
        last_hud: Option<HudState>,
    }

    /// What the DOM HUD currently shows
    #[derive(Clone, PartialEq)]
    struct HudState {
        score: u32,
        combo: u32,
        speed_label: Option<&'static str>,
        over: bool,
    }

    impl HudState {
        fn from_snapshot(snap: &Snapshot) -> Self {
            Self {
                score: snap.score,
                combo: snap.combo_count,
                speed_label: snap.speed_tier.label(),
                over: snap.is_over(),
            }
        }
    }

    impl Game {
        /// Render the current frame
        fn render(&mut self, snap: &Snapshot) {
            let options = SceneOptions {
                sprite: self.sprite,
                reduced_motion: self.settings.reduced_motion,
            };
            let vertices = scene::build(snap, &options, &self.scenery);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, snap: &Snapshot) {
            let hud = HudState::from_snapshot(snap);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }
            let Some(document) = document() else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &hud.score.to_string());

            let show_combo = self.settings.show_combo && hud.combo > 0;
            set_text(&document, "#hud-combo .hud-value", &hud.combo.to_string());
            set_hidden(&document, "hud-combo", !show_combo);

            set_text(&document, "#hud-speed", hud.speed_label.unwrap_or(""));
            set_hidden(&document, "hud-speed", hud.speed_label.is_none());

            if hud.over {
                set_text(&document, "#final-score", &hud.score.to_string());
                set_text(&document, "#restart-hint", self.adapter.variant().restart_hint());
            }
            set_hidden(&document, "game-over", !hud.over);

            self.last_hud = Some(hud);
        }

        fn on_event(&mut self, event: AdapterEvent) -> bool {
            match event {
                AdapterEvent::DebugToggled(enabled) => {
                    self.settings.show_hitboxes = enabled;
                    self.settings.save();
                    false
                }
                AdapterEvent::CloseRequested => true,
            }
        }

        fn resize_to_viewport(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (vw, vh) = viewport(&window);
            if self.adapter.resize(vw, vh) {
                let (w, h) = self.adapter.canvas_size();
                self.canvas.set_width(w);
                self.canvas.set_height(h);
                if let Some(ref mut render_state) = self.render_state {
                    render_state.resize(w, h);
                }
                log::debug!("Canvas resized to {}x{}", w, h);
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn viewport(window: &Window) -> (f64, f64) {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width, height)
    }

    fn detect_variant(window: &Window) -> Variant {
        let touch = window.navigator().max_touch_points() > 0;
        if touch && viewport(window).0 <= TOUCH_BREAKPOINT {
            Variant::Touch
        } else {
            Variant::Desktop
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Echo Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let variant = detect_variant(&window);
        let (vw, vh) = viewport(&window);
        let adapter = Adapter::new(
            variant,
            vw,
            vh,
            Some(Box::new(|score| {
                log::info!("Game Over! Final score: {}", score)
            })),
        )
        .ok_or("viewport too small for the game")?;
        let (width, height) = adapter.canvas_size();
        canvas.set_width(width);
        canvas.set_height(height);
        log::info!("Variant {:?}, canvas {}x{}", variant, width, height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            adapter,
            canvas: canvas.clone(),
            render_state: None,
            scenery: Scenery::new(seed),
            sprite: None,
            sprite_load: SpriteLoad::new(js_sys::Date::now()),
            settings,
            frame: Rc::new(RefCell::new(None)),
            raf_id: None,
            loading_shown: true,
            listeners: Vec::new(),
            last_hud: None,
        }));
        {
            let mut g = game.borrow_mut();
            let debug = g.settings.show_hitboxes;
            g.adapter.set_debug_mode(debug);
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get device: {}", e)))?;
        game.borrow_mut().render_state = Some(render_state);

        load_sprite(game.clone())?;

        let controls = match variant {
            Variant::Desktop => "SPACE / \u{2191} jump \u{b7} \u{2192} dash \u{b7} D hitboxes \u{b7} ESC exit",
            Variant::Touch => "Tap to jump",
        };
        set_text(&document, "#controls", controls);
        set_hidden(&document, "hud", false);

        setup_input_handlers(&canvas, &game, variant);
        setup_resize_handlers(&game);
        setup_exit_button(game.clone());

        start_frame_loop(game)?;

        log::info!("Echo Runner running!");
        Ok(())
    }

    /// Kick off the sprite download; play starts once it lands, fails, or times out
    fn load_sprite(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;

        let onload = {
            let game = game.clone();
            let image = image.clone();
            Closure::<dyn FnMut()>::new(move || {
                let mut g = game.borrow_mut();
                g.sprite_load.on_loaded();
                let sheet = g.render_state.as_mut().map(|rs| rs.set_sprite_image(&image));
                g.sprite = sheet;
            })
        };
        let onerror = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut().sprite_load.on_error();
            })
        };
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();

        image.set_src(SPRITE_URL);
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: &Rc<RefCell<Game>>, variant: Variant) {
        let Some(window) = web_sys::window() else {
            return;
        };

        match variant {
            Variant::Desktop => {
                let handler_game = game.clone();
                listen(game, window.as_ref(), "keydown", move |event: web_sys::Event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let key = event.key();
                    let close = {
                        let mut g = handler_game.borrow_mut();
                        if g.adapter.is_torn_down() {
                            return;
                        }
                        if matches!(key.as_str(), " " | "ArrowUp" | "ArrowRight") {
                            event.prevent_default();
                        }
                        match g.adapter.key(&key) {
                            Some(event) => g.on_event(event),
                            None => false,
                        }
                    };
                    if close {
                        close_game(&handler_game);
                    }
                });
            }
            Variant::Touch => {
                let handler_game = game.clone();
                listen(game, canvas.as_ref(), "touchstart", move |event: web_sys::Event| {
                    let mut g = handler_game.borrow_mut();
                    if g.adapter.is_torn_down() {
                        return;
                    }
                    event.prevent_default();
                    if let Some(event) = g.adapter.tap() {
                        g.on_event(event);
                    }
                });
            }
        }
    }

    fn setup_resize_handlers(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        for event in ["resize", "orientationchange"] {
            let handler_game = game.clone();
            listen(game, window.as_ref(), event, move |_event: web_sys::Event| {
                handler_game.borrow_mut().resize_to_viewport();
            });
        }
    }

    /// Attach a listener that `close_game` detaches again
    fn listen(
        game: &Rc<RefCell<Game>>,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => game.borrow_mut().listeners.push(Listener {
                target: target.clone(),
                event,
                closure,
            }),
            Err(e) => log::warn!("Could not listen for {}: {:?}", event, e),
        }
    }

    fn setup_exit_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("exit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                close_game(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_frame_loop(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let frame = game.borrow().frame.clone();
        let loop_game = game.clone();
        *frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if game_loop(&loop_game, time) {
                if let Err(e) = request_animation_frame(&loop_game) {
                    log::error!("Failed to schedule frame: {:?}", e);
                }
            }
        }));
        request_animation_frame(&game)
    }

    fn request_animation_frame(game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let mut g = game.borrow_mut();
        let id = match g.frame.borrow().as_ref() {
            Some(closure) => window.request_animation_frame(closure.as_ref().unchecked_ref())?,
            None => return Ok(()),
        };
        g.raf_id = Some(id);
        Ok(())
    }

    /// One display frame; returns whether to schedule another
    fn game_loop(game: &Rc<RefCell<Game>>, time: f64) -> bool {
        let mut g = game.borrow_mut();
        g.raf_id = None;

        // Hold the run until the sprite settles
        if g.loading_shown {
            g.sprite_load.poll(js_sys::Date::now());
            if let Some(document) = document() {
                set_text(&document, "#loading", g.sprite_load.message());
                set_hidden(&document, "loading", g.sprite_load.is_settled());
            }
            g.loading_shown = !g.sprite_load.is_settled();
            if g.loading_shown {
                return true;
            }
        }

        let Some(snap) = g.adapter.frame(time) else {
            return false;
        };
        g.render(&snap);
        g.update_hud(&snap);
        g.adapter.should_schedule()
    }

    /// Stop the loop for good and hand control back to the page
    fn close_game(game: &Rc<RefCell<Game>>) {
        let (frame, listeners) = {
            let mut g = game.borrow_mut();
            g.adapter.tear_down();
            if let (Some(id), Some(window)) = (g.raf_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            (g.frame.clone(), std::mem::take(&mut g.listeners))
        };
        // Drops the loop closure and the reference cycle through it
        frame.borrow_mut().take();

        for listener in listeners {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            );
            // Detached but not dropped: the keydown handler may be the caller
            listener.closure.forget();
        }

        if let Some(document) = document() {
            set_hidden(&document, "game-overlay", true);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Echo Runner (native) starting...");
    log::info!("Native mode is headless - serve index.html with the wasm build to play");

    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one desktop run to game over and back through the adapter
#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use echo_runner::consts::FRAME_MS;
    use echo_runner::platform::{Adapter, Variant};

    let Some(mut adapter) = Adapter::new(
        Variant::Desktop,
        0.0,
        0.0,
        Some(Box::new(|score| log::info!("Game Over! Final score: {}", score))),
    ) else {
        log::error!("Could not build the desktop adapter");
        return;
    };

    let mut now = 0.0;
    let mut frames = 0u32;
    while adapter.snapshot().is_running() && frames < 10_000 {
        now += FRAME_MS as f64;
        adapter.frame(now);
        frames += 1;
    }

    let snap = adapter.snapshot();
    println!("Run ended after {} frames with score {}", frames, snap.score);

    adapter.key("Enter");
    let snap = adapter.snapshot();
    if snap.is_running() && snap.score == 0 {
        println!("\u{2713} Restart round trip passed!");
    } else {
        log::error!("Restart did not reset the run");
    }
}
