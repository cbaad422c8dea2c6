use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Window};

/// Read a string global set by the host page, e.g. `window.__API_URL`.
pub fn window_global(window: &Window, key: &str) -> Option<String> {
    let v = js_sys::Reflect::get(window, &JsValue::from_str(key)).ok()?;
    v.as_string()
}

/// Look up an element by id and cast it, or `None` if absent or of another type.
pub fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Best-effort text of a thrown JS value.
pub fn describe_js(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    format!("{err:?}")
}
