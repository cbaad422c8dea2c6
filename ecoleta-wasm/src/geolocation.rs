use std::cell::RefCell;
use std::rc::Rc;

use ecoleta_core::{Coordinate, GeolocationFailure, PositionOutcome, PositionSource};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError, Window};

use crate::utils::describe_js;

type Done = Rc<RefCell<Option<Box<dyn FnOnce(PositionOutcome)>>>>;

/// `navigator.geolocation` behind the core's position-source interface.
pub struct BrowserPosition {
    geolocation: Geolocation,
}

impl BrowserPosition {
    /// `None` when the browser exposes no geolocation capability.
    pub fn new(window: &Window) -> Option<Self> {
        let geolocation = window.navigator().geolocation().ok()?;
        Some(BrowserPosition { geolocation })
    }
}

fn finish(done: &Done, outcome: PositionOutcome) {
    let f = done.borrow_mut().take();
    if let Some(f) = f {
        f(outcome);
    }
}

impl PositionSource for BrowserPosition {
    fn current_position(&self, done: Box<dyn FnOnce(PositionOutcome)>) {
        let done: Done = Rc::new(RefCell::new(Some(done)));

        let d_ok = done.clone();
        let on_ok = Closure::once_into_js(move |pos: GeolocationPosition| {
            let c = pos.coords();
            finish(&d_ok, Ok(Coordinate::new(c.latitude(), c.longitude())));
        });
        let d_err = done.clone();
        let on_err = Closure::once_into_js(move |err: GeolocationPositionError| {
            let failure = if err.code() == GeolocationPositionError::PERMISSION_DENIED {
                GeolocationFailure::Denied
            } else {
                GeolocationFailure::Unavailable(err.message())
            };
            finish(&d_err, Err(failure));
        });

        // The browser calls exactly one of the two; the other is never freed.
        // One lookup per mount keeps that to a single small closure.
        if let Err(e) = self.geolocation.get_current_position_with_error_callback(
            on_ok.unchecked_ref(),
            Some(on_err.unchecked_ref()),
        ) {
            finish(&done, Err(GeolocationFailure::Unavailable(describe_js(&e))));
        }
    }
}
