//! Service Worker Exports
//!
//! Entry points called by `static/sw.js`. Each builds the worker lazily from
//! the global scope, so a restarted worker rebuilds its state on the first
//! event it receives.

mod cache;
mod convert;
mod scope;

use std::cell::RefCell;
use std::rc::Rc;

use cloudstore::sw::{ClickOutcome, Request, RequestMode, ServiceWorker};
use cloudstore::{Config, SwError, SwResult};
use js_sys::Promise;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::ServiceWorkerGlobalScope;

use cache::WebCacheStorage;
use convert::{request_from_web, response_to_web, scope_error};
use scope::WebScope;

thread_local! {
    static WORKER: RefCell<Option<Rc<ServiceWorker>>> = const { RefCell::new(None) };
}

fn build() -> SwResult<ServiceWorker> {
    let global: ServiceWorkerGlobalScope = js_sys::global()
        .dyn_into()
        .map_err(|_| SwError::Scope("not running in a service worker".to_string()))?;

    let origin = Url::parse(&global.location().origin())?;
    let caches = global.caches().map_err(scope_error)?;
    let scope = Rc::new(WebScope::new(global));

    Ok(ServiceWorker::new(
        Config::default().service_worker,
        origin,
        Rc::new(WebCacheStorage::new(caches)),
        scope.clone(),
        scope,
    ))
}

fn worker() -> SwResult<Rc<ServiceWorker>> {
    WORKER.with(|slot| {
        if let Some(worker) = slot.borrow().as_ref() {
            return Ok(Rc::clone(worker));
        }
        let worker = Rc::new(build()?);
        *slot.borrow_mut() = Some(Rc::clone(&worker));
        Ok(worker)
    })
}

fn reject(err: SwError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Run `task` against the worker as a promise for `event.waitUntil`
fn run<F, Fut>(task: F) -> Promise
where
    F: FnOnce(Rc<ServiceWorker>) -> Fut + 'static,
    Fut: std::future::Future<Output = SwResult<JsValue>> + 'static,
{
    future_to_promise(async move {
        let worker = worker().map_err(reject)?;
        task(worker).await.map_err(reject)
    })
}

#[wasm_bindgen]
pub fn on_install() -> Promise {
    run(|worker| async move {
        let assets = worker.install().await?;
        Ok(JsValue::from(assets.len() as u32))
    })
}

#[wasm_bindgen]
pub fn on_activate() -> Promise {
    run(|worker| async move {
        worker.activate().await?;
        Ok(JsValue::UNDEFINED)
    })
}

/// Strategy name for a request, so the shim can skip `respondWith` on passthrough
#[wasm_bindgen]
pub fn route(url: String, method: String, mode: String) -> Result<String, JsValue> {
    let request = Request {
        mode: RequestMode::from_mode(&mode),
        ..Request::get(&url)
    }
    .with_method(&method);
    let worker = worker().map_err(reject)?;
    Ok(worker.route(&request).to_string())
}

/// Answer a fetch; resolves to `undefined` for passthrough requests and
/// rejects when no response could be produced, leaving the shim's fallback
#[wasm_bindgen]
pub fn handle_fetch(request: web_sys::Request) -> Promise {
    let request = request_from_web(request);
    run(move |worker| async move {
        match worker.handle_fetch(&request).await {
            Ok(Some(response)) => Ok(response_to_web(&response)?.into()),
            Ok(None) => Ok(JsValue::UNDEFINED),
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Fetch failed");
                Err(e)
            }
        }
    })
}

#[wasm_bindgen]
pub fn on_push(payload: Option<String>) -> Promise {
    run(move |worker| async move {
        worker.on_push(payload.as_deref()).await?;
        Ok(JsValue::UNDEFINED)
    })
}

#[wasm_bindgen]
pub fn on_notification_click(action: String, url: Option<String>) -> Promise {
    run(move |worker| async move {
        let outcome = worker.on_notification_click(&action, url.as_deref()).await?;
        Ok(match outcome {
            ClickOutcome::Dismissed => JsValue::NULL,
            ClickOutcome::Focused(url) | ClickOutcome::Opened(url) => JsValue::from(url),
        })
    })
}

#[wasm_bindgen]
pub fn on_sync(tag: String) -> Promise {
    run(move |worker| async move { Ok(JsValue::from(worker.on_sync(&tag).await)) })
}
