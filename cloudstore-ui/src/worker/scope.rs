//! Worker global scope: fetch, clients and notifications

use async_trait::async_trait;
use cloudstore::sw::{Fetcher, Notification, Request, Response, WorkerScope};
use cloudstore::SwResult;
use futures_util::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use web_sys::{ClientQueryOptions, ClientType, NotificationOptions, RequestInit, ServiceWorkerGlobalScope, WindowClient};

use super::convert::{native_request, network_error, response_from_web, scope_error, settle};

pub struct WebScope {
    scope: ServiceWorkerGlobalScope,
}

impl WebScope {
    pub fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }

    async fn window_clients(&self) -> SwResult<Vec<WindowClient>> {
        let options = ClientQueryOptions::new();
        options.set_type(ClientType::Window);
        options.set_include_uncontrolled(true);

        let clients = settle(
            Ok(self.scope.clients().match_all_with_options(&options)),
            scope_error,
        )
        .await?;
        let clients: js_sys::Array = clients.unchecked_into();
        Ok(clients
            .iter()
            .filter_map(|client| client.dyn_into::<WindowClient>().ok())
            .collect())
    }
}

#[async_trait(?Send)]
impl Fetcher for WebScope {
    async fn fetch(&self, request: &Request) -> SwResult<Response> {
        // Intercepted requests go out as the page issued them
        let promise = match native_request(request) {
            Some(native) => self.scope.fetch_with_request(native),
            None => {
                let init = RequestInit::new();
                init.set_method(&request.method);
                self.scope.fetch_with_str_and_init(&request.url, &init)
            }
        };

        let response = settle(Ok(promise), network_error).await?;
        Ok(response_from_web(response.unchecked_into()))
    }
}

#[async_trait(?Send)]
impl WorkerScope for WebScope {
    async fn skip_waiting(&self) -> SwResult<()> {
        settle(self.scope.skip_waiting(), scope_error).await?;
        Ok(())
    }

    async fn claim_clients(&self) -> SwResult<()> {
        settle(Ok(self.scope.clients().claim()), scope_error).await?;
        Ok(())
    }

    async fn show_notification(&self, notification: &Notification) -> SwResult<()> {
        let options = serde_json::to_string(&notification.options)?;
        let options: NotificationOptions = js_sys::JSON::parse(&options).map_err(scope_error)?.unchecked_into();

        settle(
            self.scope
                .registration()
                .show_notification_with_options(&notification.title, &options),
            scope_error,
        )
        .await?;
        Ok(())
    }

    async fn window_client_urls(&self) -> SwResult<Vec<String>> {
        Ok(self.window_clients().await?.iter().map(|client| client.url()).collect())
    }

    async fn focus_client(&self, url: &str) -> SwResult<bool> {
        let clients = self.window_clients().await?;
        let Some(client) = clients.into_iter().find(|client| client.url() == url) else {
            return Ok(false);
        };
        settle(client.focus(), scope_error).await?;
        Ok(true)
    }

    async fn open_window(&self, url: &str) -> SwResult<()> {
        settle(Ok(self.scope.clients().open_window(url)), scope_error).await?;
        Ok(())
    }

    fn wait_until(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

