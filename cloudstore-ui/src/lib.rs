//! Cloudstore Browser Bindings
//!
//! Compiles the `cloudstore` page logic and service worker to WebAssembly.
//!
//! # Builds
//!
//! - Pages: `wasm-pack build --target web --out-dir static/pkg`, loaded as an
//!   ES module at the end of `<body>`.
//! - Service worker: `wasm-pack build --target no-modules --out-dir static/pkg-sw`,
//!   loaded by `static/sw.js` through `importScripts`.
//!
//! The same module serves both: on start it boots the page when there is a
//! `window`, and otherwise waits for the worker shim to call its exports.

use wasm_bindgen::prelude::*;

mod components;
mod logging;
mod page;
mod web;
mod worker;

pub use worker::{handle_fetch, on_activate, on_install, on_notification_click, on_push, on_sync, route};

#[wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let config = cloudstore::Config::default();
    logging::init(&config.logging.level);

    if web_sys::window().is_some() {
        if let Err(e) = page::boot(config) {
            tracing::error!(error = %e, "Page boot failed");
        }
    }
}
