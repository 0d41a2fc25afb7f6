mod engine;
pub mod game;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{WebGlRenderingContext, HtmlCanvasElement, KeyboardEvent, Request, RequestInit, RequestMode, Response};
use nalgebra::Perspective3;
use std::cell::RefCell;
use std::rc::Rc;
use crate::engine::renderer::{FrameTarget, Renderer};
use crate::game::config::GameConfig;
use crate::game::{CameraView, Game};

struct App {
    game: Game,
    renderer: Renderer,
    started_at: f64,
    last_time: f32,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen]
pub async fn init_game() -> Result<(), JsValue> {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        // A second init_game call finds the logger already installed.
        let _ = console_log::init_with_level(log::Level::Info);
    }

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document.get_element_by_id("canvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let renderer = Renderer::new(gl)?;
    let config = load_config(&window).await;

    let game = Game::new(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
    log::info!("game ready with {} live lanes", game.world.live_lanes());
    APP.with(|app| {
        *app.borrow_mut() = Some(App { game, renderer, started_at: js_sys::Date::now(), last_time: 0.0 });
    });

    // Input handling
    let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let handled = with_game(|game| match event.key().as_str() {
            " " | "i" | "I" | "ArrowUp" => { game.jump_forward(); true },
            "k" | "K" | "ArrowDown" => { game.jump_backward(); true },
            "j" | "J" | "ArrowLeft" => { game.turn_left(); true },
            "l" | "L" | "ArrowRight" => { game.turn_right(); true },
            "c" | "C" => { game.toggle_camera(); true },
            _ => false,
        });
        if handled == Some(true) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);

    window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();

    // Game loop
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        APP.with(|app| {
            if let Some(app) = app.borrow_mut().as_mut() {
                app.tick();
            }
        });
        if let Some(callback) = f.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(callback);
    }

    Ok(())
}

/// Fetches `/assets/config.json`. A missing or invalid file leaves the defaults in place.
async fn load_config(window: &web_sys::Window) -> GameConfig {
    match fetch_text(window, "/assets/config.json").await {
        Ok(text) => match GameConfig::from_json(&text) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring config: {err}");
                GameConfig::default()
            }
        },
        Err(err) => {
            log::warn!("no config loaded ({err:?}), using defaults");
            GameConfig::default()
        }
    }
}

async fn fetch_text(window: &web_sys::Window, url: &str) -> Result<String, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("{url}: HTTP {}", resp.status())));
    }
    let text = JsFuture::from(resp.text()?).await?;
    text.as_string().ok_or_else(|| JsValue::from_str("response body is not text"))
}

impl App {
    fn tick(&mut self) {
        let time = ((js_sys::Date::now() - self.started_at) / 1000.0) as f32;
        let dt = time - self.last_time;
        self.last_time = time;

        self.game.frame(time, dt);
        self.render();
        update_ui(self.game.score());
    }

    fn render(&self) {
        let Some(canvas) = self.renderer.canvas() else {
            return;
        };
        let (width, height) = (canvas.width(), canvas.height());
        self.renderer.resize(width as i32, height as i32);
        self.renderer.clear(0.55, 0.8, 0.95);
        self.renderer.enable_depth_test();

        let aspect = width as f32 / height.max(1) as f32;
        let fov = match self.game.camera {
            CameraView::Overhead => 0.8,
            CameraView::FirstPerson => 1.1,
        };
        let projection = Perspective3::new(aspect, fov, 0.1, 150.0).to_homogeneous();
        let view = self.game.camera_pose().inverse().unwrap_or_default();

        let mut target = FrameTarget::new(&self.renderer, &projection, view.matrix());
        self.game.render(&mut target);
    }
}

fn with_game<T>(f: impl FnOnce(&mut Game) -> T) -> Option<T> {
    APP.with(|app| app.borrow_mut().as_mut().map(|app| f(&mut app.game)))
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {err:?}");
        }
    }
}

fn update_ui(score: u32) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(score_el) = document.get_element_by_id("score") {
                score_el.set_inner_html(&format!("Score: {}", score));
            }
        }
    }
}

/// Current HUD state as a plain JS object.
#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsValue> {
    let snapshot = with_game(|game| game.snapshot()).ok_or("Game not started")?;
    serde_wasm_bindgen::to_value(&snapshot).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn touch_forward() {
    with_game(Game::jump_forward);
}

#[wasm_bindgen]
pub fn touch_back() {
    with_game(Game::jump_backward);
}

#[wasm_bindgen]
pub fn touch_left() {
    with_game(Game::turn_left);
}

#[wasm_bindgen]
pub fn touch_right() {
    with_game(Game::turn_right);
}

#[wasm_bindgen]
pub fn toggle_camera() {
    with_game(Game::toggle_camera);
}

#[wasm_bindgen]
pub fn restart() {
    with_game(Game::restart);
}
