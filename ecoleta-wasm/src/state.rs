use std::cell::RefCell;
use std::rc::Rc;

use ecoleta_core::{Category, Config, FormState};
use web_sys::{Document, Window};

/// Runtime state stored behind an `Rc<RefCell<_>>` so it can be shared
/// across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub config: Config,
    pub form: FormState,
    // what the DOM currently shows, to avoid rebuilding unchanged lists
    pub shown_regions: Option<Vec<String>>,
    pub shown_sub_regions: Option<Vec<String>>,
    pub shown_categories: Option<Vec<Category>>,
}

impl State {
    pub fn new(window: Window, document: Document, config: Config) -> Self {
        let form = FormState::new(config.validation);
        State {
            window,
            document,
            config,
            form,
            shown_regions: None,
            shown_sub_regions: None,
            shown_categories: None,
        }
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

/// Run `f` against the mounted form, if any.
pub fn with_state<R>(f: impl FnOnce(&Rc<RefCell<State>>) -> R) -> Option<R> {
    let st = STATE.with(|st| st.borrow().clone())?;
    Some(f(&st))
}
