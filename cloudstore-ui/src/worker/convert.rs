//! Conversions between web-sys and `cloudstore::sw` requests/responses
//!
//! Browser objects ride along in the core types' [`Handle`], so a request is
//! forwarded with its mode, headers and credentials intact and a response
//! body is never copied into wasm memory.

use std::any::Any;

use cloudstore::sw::{Handle, Native, Request, RequestMode, Response};
use cloudstore::{SwError, SwResult};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, ResponseInit};

use crate::web::describe;

pub struct NativeRequest(pub web_sys::Request);

impl Native for NativeRequest {
    fn duplicate(&self) -> Option<Handle> {
        web_sys::Request::clone(&self.0)
            .ok()
            .map(|copy| Handle::new(NativeRequest(copy)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct NativeResponse(pub web_sys::Response);

impl Native for NativeResponse {
    fn duplicate(&self) -> Option<Handle> {
        web_sys::Response::clone(&self.0)
            .ok()
            .map(|copy| Handle::new(NativeResponse(copy)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn request_from_web(request: web_sys::Request) -> Request {
    let mode = if request.mode() == web_sys::RequestMode::Navigate {
        RequestMode::Navigate
    } else {
        RequestMode::Other
    };
    Request {
        url: request.url(),
        method: request.method(),
        mode,
        handle: Some(Handle::new(NativeRequest(request))),
    }
}

/// The browser request behind `request`, if it came from a fetch event
pub fn native_request(request: &Request) -> Option<&web_sys::Request> {
    request
        .handle
        .as_ref()?
        .downcast_ref::<NativeRequest>()
        .map(|native| &native.0)
}

/// Status and headers; the body stays in the native response
pub fn response_from_web(response: web_sys::Response) -> Response {
    let mut headers = Vec::new();
    if let Ok(Some(entries)) = js_sys::try_iter(&response.headers()) {
        for entry in entries.flatten() {
            let pair: js_sys::Array = entry.unchecked_into();
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                headers.push((name, value));
            }
        }
    }

    Response {
        status: response.status(),
        status_text: response.status_text(),
        headers,
        body: Vec::new(),
        handle: Some(Handle::new(NativeResponse(response))),
    }
}

pub fn response_to_web(response: &Response) -> SwResult<web_sys::Response> {
    if let Some(native) = response
        .handle
        .as_ref()
        .and_then(|handle| handle.downcast_ref::<NativeResponse>())
    {
        return Ok(<web_sys::Response as Clone>::clone(&native.0));
    }

    let headers = Headers::new().map_err(scope_error)?;
    for (name, value) in &response.headers {
        headers.append(name, value).map_err(scope_error)?;
    }

    let init = ResponseInit::new();
    init.set_status(response.status);
    init.set_status_text(&response.status_text);
    init.set_headers(&headers);

    if response.is_null_body_status() {
        return web_sys::Response::new_with_opt_buffer_source_and_init(None, &init).map_err(scope_error);
    }
    let body = js_sys::Uint8Array::from(response.body.as_slice());
    let body: &js_sys::Object = &body;
    web_sys::Response::new_with_opt_buffer_source_and_init(Some(body), &init).map_err(scope_error)
}

pub fn network_error(value: JsValue) -> SwError {
    SwError::Network(describe(&value))
}

pub fn cache_error(value: JsValue) -> SwError {
    SwError::Cache(describe(&value))
}

pub fn scope_error(value: JsValue) -> SwError {
    SwError::Scope(describe(&value))
}

/// Await a promise, mapping rejection through `on_error`
pub async fn settle(
    promise: Result<js_sys::Promise, JsValue>,
    on_error: fn(JsValue) -> SwError,
) -> SwResult<JsValue> {
    JsFuture::from(promise.map_err(on_error)?).await.map_err(on_error)
}
