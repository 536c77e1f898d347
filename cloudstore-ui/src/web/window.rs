//! Window, navigator and localStorage access

use cloudstore::platform::{Storage, Window};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlDocument;

pub struct WebWindow {
    window: web_sys::Window,
}

impl WebWindow {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

impl Window for WebWindow {
    fn navigate(&self, href: &str) {
        if let Err(e) = self.window.location().set_href(href) {
            tracing::warn!(href, error = %super::describe(&e), "Navigation failed");
        }
    }

    fn reload(&self) {
        let _ = self.window.location().reload();
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn origin(&self) -> String {
        self.window.location().origin().unwrap_or_default()
    }

    fn user_agent(&self) -> String {
        self.window.navigator().user_agent().unwrap_or_default()
    }

    fn cookie(&self) -> String {
        self.window
            .document()
            .and_then(|doc| doc.dyn_into::<HtmlDocument>().ok())
            .and_then(|doc| doc.cookie().ok())
            .unwrap_or_default()
    }

    fn matches_media(&self, query: &str) -> bool {
        self.window
            .match_media(query)
            .ok()
            .flatten()
            .map(|list| list.matches())
            .unwrap_or(false)
    }

    fn is_ios_standalone(&self) -> bool {
        js_sys::Reflect::get(&self.window.navigator(), &JsValue::from_str("standalone"))
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }
}

/// `localStorage`; a browser that blocks it behaves as empty storage
pub struct WebStorage {
    storage: Option<web_sys::Storage>,
}

impl WebStorage {
    pub fn new(window: &web_sys::Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "localStorage write failed");
            }
        }
    }
}
