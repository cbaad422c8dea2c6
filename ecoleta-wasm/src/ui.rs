use std::cell::RefCell;
use std::rc::Rc;

use ecoleta_core::{ContactField, Event as FormEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement};

use crate::constants::*;
use crate::runtime::dispatch;
use crate::state::State;
use crate::utils::element;

// Wires up every form control to the runtime.
pub fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    // Submit
    if let Some(form) = element::<HtmlFormElement>(&doc, FORM_ID) {
        let st = state.clone();
        let onsubmit = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            e.prevent_default();
            dispatch(&st, FormEvent::SubmitRequested);
        }));
        form.set_onsubmit(Some(onsubmit.as_ref().unchecked_ref()));
        onsubmit.forget();
    }

    // Contact inputs, keyed by their `name` attribute
    for field in ContactField::ALL {
        let Some(input) = element::<HtmlInputElement>(&doc, field.as_str()) else {
            log::warn!("input #{field} not found");
            continue;
        };
        let st = state.clone();
        let input_read = input.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            match input_read.name().parse::<ContactField>() {
                Ok(field) => dispatch(
                    &st,
                    FormEvent::ContactEdited {
                        field,
                        value: input_read.value(),
                    },
                ),
                Err(e) => log::warn!("{e}"),
            }
        }));
        input.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    // State / city selectors
    attach_select(&state, REGION_SELECT_ID, FormEvent::RegionSelected)?;
    attach_select(&state, SUB_REGION_SELECT_ID, FormEvent::SubRegionSelected)?;

    // Item tiles: one delegated listener on the list
    if let Some(list) = element::<HtmlElement>(&doc, ITEMS_ID) {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            let id = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("li").ok().flatten())
                .and_then(|li| li.dyn_into::<HtmlElement>().ok())
                .and_then(|li| li.dataset().get("id"))
                .and_then(|v| v.parse::<u32>().ok());
            if let Some(id) = id {
                dispatch(&st, FormEvent::CategoryToggled(id));
            }
        }));
        list.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Retry failed loads
    if let Some(btn) = element::<HtmlElement>(&doc, RETRY_ID) {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            dispatch(&st, FormEvent::RetryRequested);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    Ok(())
}

fn attach_select(
    state: &Rc<RefCell<State>>,
    id: &str,
    to_event: fn(String) -> FormEvent,
) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let sel = doc
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("select #{id} not found")))?
        .dyn_into::<HtmlSelectElement>()?;
    let st = state.clone();
    let sel_read = sel.clone();
    let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        dispatch(&st, to_event(sel_read.value()));
    }));
    sel.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}
