use std::cell::RefCell;
use std::rc::Rc;

use ecoleta_core::i18n::text;
use ecoleta_core::{
    Command, Event, FixedPosition, GeolocationFailure, Msg, PositionSource, Resource, api,
};
use wasm_bindgen_futures::spawn_local;

use crate::geolocation::BrowserPosition;
use crate::http;
use crate::render::render;
use crate::state::{STATE, State};

/// Apply one event, redraw, then run whatever the form asked for.
pub fn dispatch(state: &Rc<RefCell<State>>, event: Event) {
    let commands = {
        let mut s = state.borrow_mut();
        if s.form.is_unmounted() {
            log::debug!("form unmounted, event dropped");
            return;
        }
        let cmds = s.form.apply(event);
        render(&mut s);
        cmds
    };
    run(state, commands);
}

pub fn run(state: &Rc<RefCell<State>>, commands: Vec<Command>) {
    for cmd in commands {
        execute(state, cmd);
    }
}

fn execute(state: &Rc<RefCell<State>>, cmd: Command) {
    log::debug!("command: {cmd:?}");
    let (window, endpoints, lang) = {
        let s = state.borrow();
        (s.window.clone(), s.config.endpoints.clone(), s.config.lang)
    };
    let handle = Rc::clone(state);
    match cmd {
        Command::LoadCategories => spawn_local(async move {
            let result = http::get_text(&window, &endpoints.items(), Resource::Categories)
                .await
                .and_then(|body| api::decode_categories(&body));
            dispatch(&handle, Event::CategoriesLoaded(result.map_err(|e| e.to_string())));
        }),
        Command::LoadRegions => spawn_local(async move {
            let result = http::get_text(&window, &endpoints.regions(), Resource::Regions)
                .await
                .and_then(|body| api::decode_regions(&body));
            dispatch(&handle, Event::RegionsLoaded(result.map_err(|e| e.to_string())));
        }),
        Command::LoadSubRegions(request) => spawn_local(async move {
            let url = endpoints.sub_regions(&request.region);
            let result = http::get_text(&window, &url, Resource::SubRegions)
                .await
                .and_then(|body| api::decode_sub_regions(&body));
            dispatch(
                &handle,
                Event::SubRegionsLoaded {
                    request,
                    result: result.map_err(|e| e.to_string()),
                },
            );
        }),
        Command::LocateDevice => {
            let source: Box<dyn PositionSource> = match BrowserPosition::new(&window) {
                Some(browser) => Box::new(browser),
                None => Box::new(FixedPosition(Err(GeolocationFailure::Unavailable(
                    "navigator.geolocation is not available".to_string(),
                )))),
            };
            source.current_position(Box::new(move |outcome| {
                dispatch(&handle, Event::DevicePositionResolved(outcome));
            }));
        }
        Command::Submit(payload) => spawn_local(async move {
            let result = match payload.to_json() {
                Ok(body) => http::post_json(&window, &endpoints.points(), &body).await,
                Err(e) => Err(e),
            };
            dispatch(&handle, Event::SubmitFinished(result.map_err(|e| e.to_string())));
        }),
        Command::NotifyCreated => {
            let _ = window.alert_with_message(text(lang, Msg::PointCreated));
        }
        Command::NavigateHome => {
            let home = state.borrow().config.home_route.clone();
            teardown(state);
            if let Err(e) = window.location().set_href(&home) {
                log::warn!("navigation to {home} failed: {}", crate::utils::describe_js(&e));
            }
        }
    }
}

/// Detach the form. Results still in flight are dropped by the form when they land.
pub fn teardown(state: &Rc<RefCell<State>>) {
    state.borrow_mut().form.unmount();
    STATE.with(|st| st.replace(None));
    log::info!("collection point form unmounted");
}
