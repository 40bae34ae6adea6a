pub mod runner;

pub use runner::{LoadRequest, WebHost, WebRunner};

use std::cell::RefCell;

use orrery_engine::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<WebRunner>> = RefCell::new(None);
}

/// Run `f` against the installed runner. Calls made before `orrery_init`
/// (or after a failed init) are dropped with a console warning.
fn with_runner<R: Default>(f: impl FnOnce(&mut WebRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            web_sys::console::warn_1(&"orrery: not initialized, call orrery_init() first".into());
            R::default()
        }
    })
}

/// Build the simulation from a JSON manifest, or the built-in solar system
/// when `manifest_json` is omitted, and queue every asset load request.
/// Errors are returned to JavaScript as a string.
#[wasm_bindgen]
pub fn orrery_init(manifest_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = WebRunner::new(manifest_json.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("orrery: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn orrery_tick() {
    with_runner(|r| r.tick());
}

#[wasm_bindgen]
pub fn orrery_is_running() -> bool {
    with_runner(|r| r.runner().is_running())
}

// ---- Input ----

#[wasm_bindgen]
pub fn orrery_pointer_click(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerClick { x, y }));
}

#[wasm_bindgen]
pub fn orrery_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

#[wasm_bindgen]
pub fn orrery_camera(eye_x: f32, eye_y: f32, eye_z: f32, target_x: f32, target_y: f32, target_z: f32) {
    with_runner(|r| {
        r.push_input(InputEvent::CameraMoved {
            eye: [eye_x, eye_y, eye_z],
            target: [target_x, target_y, target_z],
        })
    });
}

// ---- Asset completion ----

#[wasm_bindgen]
pub fn orrery_asset_loaded(body: &str, handle: u32, triangles: &[f32]) {
    with_runner(|r| r.asset_loaded(body, handle, triangles));
}

#[wasm_bindgen]
pub fn orrery_asset_loaded_sphere(body: &str, handle: u32, radius: f32) {
    with_runner(|r| r.asset_loaded_sphere(body, handle, radius));
}

#[wasm_bindgen]
pub fn orrery_asset_failed(body: &str, reason: &str) {
    with_runner(|r| r.asset_failed(body, reason));
}

#[wasm_bindgen]
pub fn orrery_loading_progress(completed: u32, total: u32) {
    with_runner(|r| r.loading_progress(completed, total));
}

// ---- Buffered collaborator calls (JSON arrays) ----

#[wasm_bindgen]
pub fn orrery_drain_signals() -> String {
    with_runner(|r| r.drain_signals_json())
}

#[wasm_bindgen]
pub fn orrery_drain_load_requests() -> String {
    with_runner(|r| r.drain_load_requests_json())
}

#[wasm_bindgen]
pub fn orrery_drain_released() -> String {
    with_runner(|r| r.drain_released_json())
}

// ---- Frame data accessors ----

#[wasm_bindgen]
pub fn orrery_transforms_ptr() -> *const f32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.transforms_ptr())
    })
}

#[wasm_bindgen]
pub fn orrery_transform_count() -> u32 {
    with_runner(|r| r.transform_count())
}

#[wasm_bindgen]
pub fn orrery_orbit_rings_ptr() -> *const f32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.orbit_rings_ptr())
    })
}

#[wasm_bindgen]
pub fn orrery_orbit_ring_count() -> u32 {
    with_runner(|r| r.orbit_ring_count())
}

/// Orbit path of a body as flat xyz floats, for line drawing.
#[wasm_bindgen]
pub fn orrery_orbit_path(body: &str) -> js_sys::Float32Array {
    let points = with_runner(|r| r.orbit_path(body));
    js_sys::Float32Array::from(points.as_slice())
}

// ---- Teardown ----

/// Stop the loop, then release drawables. Returns the names of the
/// subscriptions JavaScript must remove; empty on repeated calls.
#[wasm_bindgen]
pub fn orrery_teardown() -> js_sys::Array {
    let revoked = with_runner(|r| r.teardown());
    revoked
        .into_iter()
        .map(|kind| {
            let name = match kind {
                orrery_engine::EventKind::Pointer => "pointer",
                orrery_engine::EventKind::Resize => "resize",
            };
            JsValue::from_str(name)
        })
        .collect()
}
