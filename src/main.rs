//! Touch Stick entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use touch_stick::assets::{AssetLoader, load_spritesheet};
    use touch_stick::renderer::{PlayerFrames, SpriteRenderState};
    use touch_stick::settings::Settings;
    use touch_stick::sim::{GameMode, GameState, MOUSE_TOUCH_ID, TouchId, Viewport, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SpriteRenderState>,
        canvas: HtmlCanvasElement,
        // Track mode to toggle the end scene once
        last_mode: GameMode,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, viewport: Viewport, settings: Settings) -> Self {
            Self {
                state: GameState::new(viewport, &settings),
                settings,
                render_state: None,
                canvas,
                last_mode: GameMode::Play,
            }
        }

        /// Convert client coordinates to canvas-local pixels
        fn local_position(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            )
        }

        fn touch_start(&mut self, id: TouchId, pos: Vec2) {
            let half = self.state.touch_start(id, pos);
            log::debug!("touchstart {} at ({}, {}) -> {:?}", id, pos.x, pos.y, half);
        }

        fn touch_move(&mut self, id: TouchId, pos: Vec2) {
            let half = self.state.touch_move(id, pos);
            log::trace!("touchmove {} at ({}, {}) -> {:?}", id, pos.x, pos.y, half);
        }

        fn touch_end(&mut self, id: TouchId) {
            let half = self.state.touch_end(id);
            log::debug!("touchend {} -> {:?}", id, half);
        }

        /// Run one display frame
        fn update(&mut self) {
            tick(&mut self.state);

            if self.state.mode != self.last_mode {
                if self.state.mode == GameMode::End {
                    show_end_scene();
                }
                self.last_mode = self.state.mode;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.settings) {
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
        }

        /// Match the canvas to the window
        fn resize(&mut self) {
            let (viewport, width, height) = size_canvas(&self.canvas);
            self.state.resize(viewport);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }
    }

    /// Size the canvas backing store to the window. Returns the CSS viewport
    /// and the physical size.
    fn size_canvas(canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let Some(window) = web_sys::window() else {
            return (Viewport::new(1.0, 1.0), 1, 1);
        };
        let css_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let css_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let dpr = window.device_pixel_ratio();
        let width = ((css_w * dpr) as u32).max(1);
        let height = ((css_h * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (Viewport::new(css_w as f32, css_h as f32), width, height)
    }

    fn set_class(id: &str, class: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", class);
        }
    }

    fn show_end_scene() {
        set_class("canvas", "hidden");
        set_class("game-over", "");
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let settings = Settings::load();
        let _ = console_log::init_with_level(settings.log_level());

        log::info!("Touch Stick starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #canvas element");
                return;
            }
        };

        let (viewport, width, height) = size_canvas(&canvas);

        // Sprite sheet first; nothing to draw without it
        let mut loader = AssetLoader::new();
        let loaded = match load_spritesheet(&mut loader, &settings.spritesheet_url).await {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };
        let frames = match PlayerFrames::from_sheet(&loaded.sheet) {
            Ok(frames) => frames,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        set_class("loading", "hidden");
        // Settings that led to a playable game become the stored ones
        settings.save();

        // Initialize WebGPU, falling back to WebGL
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
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
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            match SpriteRenderState::new(surface, &adapter, width, height, &loaded.image, frames)
                .await
            {
                Ok(render_state) => render_state,
                Err(e) => {
                    log::error!("Failed to create device: {}", e);
                    return;
                }
            };

        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), viewport, settings)));
        game.borrow_mut().render_state = Some(render_state);

        setup_touch_handlers(&canvas, game.clone());
        setup_mouse_handlers(&canvas, game.clone());
        setup_keyboard(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Touch Stick running!");
    }

    /// Forward every changed touch of `event` to `handle`
    fn for_each_changed_touch(
        game: &Rc<RefCell<Game>>,
        event: &TouchEvent,
        mut handle: impl FnMut(&mut Game, TouchId, Vec2),
    ) {
        let touches = event.changed_touches();
        let mut g = game.borrow_mut();
        for i in 0..touches.length() {
            if let Some(touch) = touches.get(i) {
                let pos = g.local_position(touch.client_x(), touch.client_y());
                handle(&mut *g, touch.identifier(), pos);
            }
        }
    }

    fn setup_touch_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                for_each_changed_touch(&game, &event, |g, id, pos| g.touch_start(id, pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                for_each_changed_touch(&game, &event, |g, id, pos| g.touch_move(id, pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end and cancel both release the finger
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                for_each_changed_touch(&game, &event, |g, id, _| g.touch_end(id));
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Desktop fallback: the mouse acts as a single finger
    fn setup_mouse_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.local_position(event.client_x(), event.client_y());
                g.touch_start(MOUSE_TOUCH_ID, pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.local_position(event.client_x(), event.client_y());
                g.touch_move(MOUSE_TOUCH_ID, pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Released anywhere, including outside the canvas
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().touch_end(MOUSE_TOUCH_ID);
        });
        let _ = window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() == "Escape" {
                game.borrow_mut().state.end_game();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
        }

        request_animation_frame(game);
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
    log::info!("Touch Stick (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    replay_stick_gesture();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the simulation with a scripted left-stick drag and log the path
#[cfg(not(target_arch = "wasm32"))]
fn replay_stick_gesture() {
    use glam::Vec2;
    use touch_stick::Settings;
    use touch_stick::sim::{GameState, Viewport, tick};

    let settings = Settings::load();
    let mut state = GameState::new(Viewport::new(800.0, 600.0), &settings);

    state.touch_start(0, Vec2::new(100.0, 400.0));
    for (i, target) in [Vec2::new(120.0, 400.0), Vec2::new(140.0, 380.0), Vec2::new(150.0, 350.0)]
        .into_iter()
        .enumerate()
    {
        state.touch_move(0, target);
        for _ in 0..20 {
            tick(&mut state);
        }
        let p = state.player.position;
        log::info!(
            "leg {}: pos ({:.1}, {:.1}) rot {:.2} rad frame {}",
            i + 1,
            p.x,
            p.y,
            state.player.rotation,
            state.player.animation.current_frame()
        );
    }

    state.touch_end(0);
    tick(&mut state);
    log::info!(
        "released: velocity {:?}, frame {}",
        state.player.velocity,
        state.player.animation.current_frame()
    );
}
