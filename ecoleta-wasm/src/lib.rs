use std::cell::RefCell;
use std::rc::Rc;

use ecoleta_core::{Config, Coordinate, Event};
use wasm_bindgen::prelude::*;

mod constants;
mod geolocation;
mod http;
mod render;
mod runtime;
mod state;
mod ui;
mod utils;

use state::{STATE, State, with_state};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let search = window.location().search().unwrap_or_default();
    let config = Config::resolve(|key| utils::window_global(&window, key), &search);
    log::info!(
        "backend {}, language {:?}, validation {:?}",
        config.endpoints.items(),
        config.lang,
        config.validation
    );

    let state = Rc::new(RefCell::new(State::new(window, document, config)));
    STATE.with(|st| st.replace(Some(state.clone())));
    ui::attach_ui(state.clone())?;

    let commands = {
        let mut s = state.borrow_mut();
        let cmds = s.form.mount();
        render::render(&mut s);
        cmds
    };
    runtime::run(&state, commands);
    Ok(())
}

/// Called by the host's map widget when the user clicks a location.
#[wasm_bindgen]
pub fn record_map_click(lat: f64, lng: f64) {
    with_state(|st| runtime::dispatch(st, Event::MapClicked(Coordinate::new(lat, lng))));
}

/// Initial map center as `[lat, lng]`; `(0, 0)` until the device answers.
#[wasm_bindgen]
pub fn map_center() -> Vec<f64> {
    let c = with_state(|st| st.borrow().form.map_center()).unwrap_or_default();
    vec![c.latitude, c.longitude]
}

/// Re-issue every load that failed.
#[wasm_bindgen]
pub fn retry() {
    with_state(|st| runtime::dispatch(st, Event::RetryRequested));
}

/// JSON snapshot of the form, for debugging from the console.
#[wasm_bindgen]
pub fn form_state_json() -> Result<String, JsValue> {
    with_state(|st| serde_json::to_string(&st.borrow().form))
        .unwrap_or_else(|| Ok("null".to_string()))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Tear the form down; late network or geolocation results are ignored.
#[wasm_bindgen]
pub fn unmount() {
    with_state(runtime::teardown);
}
