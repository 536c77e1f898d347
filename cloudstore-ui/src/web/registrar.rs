//! `navigator.serviceWorker.register`

use async_trait::async_trait;
use cloudstore::chrome::WorkerRegistrar;
use cloudstore::PlatformResult;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{RegistrationOptions, ServiceWorkerRegistration};

use super::js_error;

pub struct WebRegistrar {
    navigator: web_sys::Navigator,
}

impl WebRegistrar {
    pub fn new(window: &web_sys::Window) -> Self {
        Self {
            navigator: window.navigator(),
        }
    }
}

#[async_trait(?Send)]
impl WorkerRegistrar for WebRegistrar {
    fn is_supported(&self) -> bool {
        js_sys::Reflect::has(&self.navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false)
    }

    async fn register(&self, script_url: &str, scope: &str) -> PlatformResult<String> {
        let options = RegistrationOptions::new();
        options.set_scope(scope);

        let promise = self
            .navigator
            .service_worker()
            .register_with_options(script_url, &options);
        let registration = JsFuture::from(promise).await.map_err(js_error)?;
        let registration: ServiceWorkerRegistration = registration.unchecked_into();
        Ok(registration.scope())
    }
}
