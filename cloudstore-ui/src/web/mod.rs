//! web-sys implementations of the `cloudstore` platform traits

mod dom;
mod http;
mod observer;
mod prompt;
mod registrar;
mod timers;
mod window;

pub use dom::{WebDom, WebElement};
pub use http::GlooHttp;
pub use observer::WebObserver;
pub use prompt::DeferredPrompt;
pub use registrar::WebRegistrar;
pub use timers::WebScheduler;
pub use window::{WebStorage, WebWindow};

use cloudstore::PlatformError;
use wasm_bindgen::JsValue;

/// Convert a thrown JS value into a platform error
pub fn js_error(value: JsValue) -> PlatformError {
    PlatformError::Js(describe(&value))
}

/// Best-effort message for a thrown JS value
pub fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
