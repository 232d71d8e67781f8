//! Browser Fetch Bindings
//!
//! Thin wrappers over `window.fetch` returning gateway errors.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::{GatewayError, GatewayResult};

pub(crate) fn js_error(value: JsValue) -> GatewayError {
    GatewayError::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

async fn send(request: &Request) -> GatewayResult<Response> {
    let window = web_sys::window().ok_or_else(|| GatewayError::Transport("no window".to_string()))?;
    let value = JsFuture::from(window.fetch_with_request(request)).await.map_err(js_error)?;
    let response: Response = value.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(GatewayError::Http { status: response.status() });
    }
    Ok(response)
}

/// POST a GraphQL request body, returning the response body
pub(crate) async fn post_graphql(endpoint: &str, api_key: &str, body: &str) -> GatewayResult<String> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(endpoint, &init).map_err(js_error)?;
    let headers = request.headers();
    headers.set("content-type", "application/json").map_err(js_error)?;
    headers.set("x-api-key", api_key).map_err(js_error)?;

    let response = send(&request).await?;
    let text = JsFuture::from(response.text().map_err(js_error)?).await.map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| GatewayError::Transport("response body is not text".to_string()))
}

/// GET a JSON document
pub(crate) async fn get_json(url: &str) -> GatewayResult<JsValue> {
    let request = Request::new_with_str(url).map_err(js_error)?;
    let response = send(&request).await?;
    JsFuture::from(response.json().map_err(js_error)?).await.map_err(js_error)
}
