use ecoleta_core::i18n::text;
use ecoleta_core::{
    Category, GeolocationFailure, GeolocationState, Lang, LoadState, Msg, SENTINEL, SubmitState,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlSelectElement};

use crate::constants::*;
use crate::state::State;
use crate::utils::element;

/// Bring the page in line with the form state.
pub fn render(state: &mut State) {
    if let Err(e) = render_inner(state) {
        log::warn!("render failed: {}", crate::utils::describe_js(&e));
    }
}

fn render_inner(state: &mut State) -> Result<(), JsValue> {
    let lang = state.config.lang;
    let doc = state.document.clone();

    if is_stale(&state.shown_regions, state.form.regions()) {
        let regions = state.form.regions().to_vec();
        fill_select(&doc, REGION_SELECT_ID, text(lang, Msg::SelectRegion), &regions)?;
        state.shown_regions = Some(regions);
    }
    if is_stale(&state.shown_sub_regions, state.form.sub_regions()) {
        let sub_regions = state.form.sub_regions().to_vec();
        fill_select(
            &doc,
            SUB_REGION_SELECT_ID,
            text(lang, Msg::SelectSubRegion),
            &sub_regions,
        )?;
        state.shown_sub_regions = Some(sub_regions);
    }
    set_select_value(&doc, REGION_SELECT_ID, state.form.region());
    set_select_value(&doc, SUB_REGION_SELECT_ID, state.form.sub_region());

    if is_stale(&state.shown_categories, state.form.categories()) {
        fill_items(&doc, state.form.categories())?;
        state.shown_categories = Some(state.form.categories().to_vec());
    }
    mark_selected_items(state);

    update_status_dom(state);
    update_map_dom(state)?;
    Ok(())
}

/// Whether the DOM copy of a list differs from the form's, by full value.
fn is_stale<T: PartialEq>(shown: &Option<Vec<T>>, current: &[T]) -> bool {
    shown.as_deref() != Some(current)
}

fn fill_select(
    doc: &Document,
    id: &str,
    placeholder: &str,
    values: &[String],
) -> Result<(), JsValue> {
    let Some(sel) = element::<HtmlSelectElement>(doc, id) else {
        return Ok(());
    };
    sel.set_length(0);
    let first = doc.create_element("option")?;
    first.set_attribute("value", SENTINEL)?;
    first.set_text_content(Some(placeholder));
    sel.append_child(&first)?;
    for v in values {
        let opt = doc.create_element("option")?;
        opt.set_attribute("value", v)?;
        opt.set_text_content(Some(v));
        sel.append_child(&opt)?;
    }
    Ok(())
}

fn set_select_value(doc: &Document, id: &str, value: Option<&str>) {
    if let Some(sel) = element::<HtmlSelectElement>(doc, id) {
        sel.set_value(value.unwrap_or(SENTINEL));
    }
}

fn fill_items(doc: &Document, categories: &[Category]) -> Result<(), JsValue> {
    let Some(list) = element::<HtmlElement>(doc, ITEMS_ID) else {
        return Ok(());
    };
    list.set_inner_html("");
    for c in categories {
        let li: HtmlElement = doc.create_element("li")?.dyn_into()?;
        li.dataset().set("id", &c.id.to_string())?;
        let img = doc.create_element("img")?;
        img.set_attribute("src", &c.icon_url)?;
        img.set_attribute("alt", &c.title)?;
        li.append_child(&img)?;
        let span = doc.create_element("span")?;
        span.set_text_content(Some(&c.title));
        li.append_child(&span)?;
        list.append_child(&li)?;
    }
    Ok(())
}

fn mark_selected_items(state: &State) {
    let Some(list) = element::<HtmlElement>(&state.document, ITEMS_ID) else {
        return;
    };
    let children = list.children();
    for i in 0..children.length() {
        let Some(li) = children
            .item(i)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let selected = li
            .dataset()
            .get("id")
            .and_then(|v| v.parse::<u32>().ok())
            .is_some_and(|id| state.form.is_selected(id));
        li.set_class_name(if selected { SELECTED_CLASS } else { "" });
    }
}

fn load_text(lang: Lang, status: &LoadState) -> String {
    match status {
        LoadState::Idle | LoadState::Loaded => String::new(),
        LoadState::Loading => text(lang, Msg::Loading).to_string(),
        LoadState::Failed(reason) => format!("{} ({})", text(lang, Msg::LoadFailed), reason),
    }
}

fn set_text(doc: &Document, id: &str, txt: &str) {
    if let Some(el) = element::<HtmlElement>(doc, id) {
        el.set_inner_text(txt);
    }
}

fn update_status_dom(state: &State) {
    let doc = &state.document;
    let lang = state.config.lang;
    let form = &state.form;

    set_text(doc, ITEMS_STATUS_ID, &load_text(lang, form.categories_status()));
    set_text(doc, REGION_STATUS_ID, &load_text(lang, form.regions_status()));
    set_text(doc, SUB_REGION_STATUS_ID, &load_text(lang, form.sub_regions_status()));

    let location = match form.geolocation() {
        GeolocationState::Pending | GeolocationState::Located => String::new(),
        GeolocationState::Failed(GeolocationFailure::Denied) => {
            text(lang, Msg::LocationDenied).to_string()
        }
        GeolocationState::Failed(GeolocationFailure::Unavailable(reason)) => {
            format!("{} ({})", text(lang, Msg::LocationUnavailable), reason)
        }
    };
    set_text(doc, LOCATION_STATUS_ID, &location);

    let submit = match form.submit_state() {
        SubmitState::Idle | SubmitState::Succeeded => String::new(),
        SubmitState::InFlight => text(lang, Msg::Submitting).to_string(),
        SubmitState::Rejected(missing) => {
            let names: Vec<String> = missing.iter().map(|m| m.to_string()).collect();
            format!("{} {}", text(lang, Msg::MissingFields), names.join(", "))
        }
        SubmitState::Failed(reason) => format!("{} ({})", text(lang, Msg::SubmitFailed), reason),
    };
    set_text(doc, SUBMIT_STATUS_ID, &submit);

    if let Some(btn) = element::<HtmlButtonElement>(doc, SUBMIT_ID) {
        btn.set_disabled(!form.can_submit());
        let label = if *form.submit_state() == SubmitState::InFlight {
            Msg::Submitting
        } else {
            Msg::Submit
        };
        btn.set_inner_text(text(lang, label));
    }

    if let Some(btn) = element::<HtmlElement>(doc, RETRY_ID) {
        let any_failed = form.categories_status().is_failed()
            || form.regions_status().is_failed()
            || form.sub_regions_status().is_failed();
        btn.set_hidden(!any_failed);
        btn.set_inner_text(text(lang, Msg::Retry));
    }
}

/// Publish center and marker on `#map` as `data-*` attributes; the host's
/// map widget follows them.
fn update_map_dom(state: &State) -> Result<(), JsValue> {
    let Some(map) = element::<HtmlElement>(&state.document, MAP_ID) else {
        return Ok(());
    };
    let data = map.dataset();
    let center = state.form.map_center();
    let marker = state.form.chosen_position();
    data.set("centerLat", &center.latitude.to_string())?;
    data.set("centerLng", &center.longitude.to_string())?;
    data.set("markerLat", &marker.latitude.to_string())?;
    data.set("markerLng", &marker.longitude.to_string())?;
    Ok(())
}
