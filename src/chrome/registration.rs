//! Service Worker Registration

use async_trait::async_trait;

use crate::platform::PlatformResult;

/// `navigator.serviceWorker`
#[async_trait(?Send)]
pub trait WorkerRegistrar {
    fn is_supported(&self) -> bool;

    /// Register `script_url`, returning the registration's scope
    async fn register(&self, script_url: &str, scope: &str) -> PlatformResult<String>;
}

/// Register the worker if the browser supports it; failures are only logged
pub async fn register_service_worker(
    registrar: &dyn WorkerRegistrar,
    script_url: &str,
    scope: &str,
) -> bool {
    if !registrar.is_supported() {
        tracing::debug!("Service workers unsupported");
        return false;
    }

    match registrar.register(script_url, scope).await {
        Ok(scope) => {
            tracing::info!(%scope, "Service worker registered");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Service worker registration failed");
            false
        }
    }
}
