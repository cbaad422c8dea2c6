use ecoleta_core::{FormError, Resource};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

use crate::utils::describe_js;

fn network(resource: Resource, err: &JsValue) -> FormError {
    FormError::network(resource, describe_js(err))
}

async fn send(
    window: &Window,
    request: &Request,
    resource: Resource,
) -> Result<Response, FormError> {
    let resp_value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|e| network(resource, &e))?;
    let resp: Response = resp_value.dyn_into().map_err(|e| network(resource, &e))?;
    if !resp.ok() {
        return Err(FormError::network(
            resource,
            format!("HTTP {} {}", resp.status(), resp.status_text()),
        ));
    }
    Ok(resp)
}

/// GET a text body. Non-2xx answers are failures.
pub async fn get_text(
    window: &Window,
    url: &str,
    resource: Resource,
) -> Result<String, FormError> {
    let request = Request::new_with_str(url).map_err(|e| network(resource, &e))?;
    let resp = send(window, &request, resource).await?;
    let text_promise = resp.text().map_err(|e| network(resource, &e))?;
    let text_js = JsFuture::from(text_promise)
        .await
        .map_err(|e| network(resource, &e))?;
    text_js
        .as_string()
        .ok_or_else(|| FormError::network(resource, "response body is not text"))
}

/// POST a JSON body. The response body is not inspected.
pub async fn post_json(window: &Window, url: &str, body: &str) -> Result<(), FormError> {
    let resource = Resource::Submission;
    let headers = Headers::new().map_err(|e| network(resource, &e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| network(resource, &e))?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &init).map_err(|e| network(resource, &e))?;
    send(window, &request, resource).await?;
    Ok(())
}
