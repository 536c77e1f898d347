//! The deferred `beforeinstallprompt` event

use async_trait::async_trait;
use cloudstore::pwa::{InstallOutcome, InstallPrompt};
use cloudstore::{PlatformError, PlatformResult};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::js_error;

/// `BeforeInstallPromptEvent` is not in web-sys, so it is driven by reflection
pub struct DeferredPrompt {
    event: JsValue,
}

impl DeferredPrompt {
    pub fn new(event: JsValue) -> Self {
        Self { event }
    }

    fn property(&self, name: &str) -> PlatformResult<JsValue> {
        Reflect::get(&self.event, &JsValue::from_str(name)).map_err(js_error)
    }
}

#[async_trait(?Send)]
impl InstallPrompt for DeferredPrompt {
    async fn prompt(&self) -> PlatformResult<InstallOutcome> {
        let prompt = self
            .property("prompt")?
            .dyn_into::<Function>()
            .map_err(|_| PlatformError::Unsupported("BeforeInstallPromptEvent.prompt"))?;
        prompt.call0(&self.event).map_err(js_error)?;

        let choice = self
            .property("userChoice")?
            .dyn_into::<Promise>()
            .map_err(|_| PlatformError::Unsupported("BeforeInstallPromptEvent.userChoice"))?;
        let choice = JsFuture::from(choice)
            .await
            .map_err(|e| PlatformError::Aborted(super::describe(&e)))?;

        let outcome = Reflect::get(&choice, &JsValue::from_str("outcome"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default();
        Ok(InstallOutcome::from_choice(&outcome))
    }
}
