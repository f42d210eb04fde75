//! JSON POST over `fetch`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, window};

use crate::error::{ControllerError, Result};
use crate::protocol::ServerResponse;

fn network(err: JsValue) -> ControllerError {
    ControllerError::Network(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// POST `body` (JSON, if any) to `url` and decode the reply.
pub async fn post(url: &str, body: Option<String>) -> Result<ServerResponse> {
    let win = window().ok_or_else(|| ControllerError::Dom("no window".into()))?;

    let init = RequestInit::new();
    init.set_method("POST");
    if let Some(body) = &body {
        init.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(url, &init)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let reply = JsFuture::from(win.fetch_with_request(&request))
        .await
        .map_err(network)?;
    let response: Response = reply.dyn_into()?;
    if !response.ok() {
        return Err(ControllerError::HttpStatus(response.status()));
    }

    let text = JsFuture::from(response.text()?).await.map_err(network)?;
    let text = text
        .as_string()
        .ok_or_else(|| ControllerError::MalformedResponse("body is not text".into()))?;
    ServerResponse::parse(&text)
}
