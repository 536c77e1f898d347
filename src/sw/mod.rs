//! Service Worker
//!
//! Offline caching and push notifications. Event handlers are methods on
//! [`ServiceWorker`]; the worker global scope, Cache Storage and `fetch` are
//! traits so the same logic runs in the browser, the tests and the CLI.

mod cache;
mod error;
mod http;
#[cfg(feature = "native")]
mod network;
mod push;
mod routing;
mod strategy;

pub use cache::{Cache, CacheStorage, MemoryCache, MemoryCacheStorage};
pub use error::{SwError, SwResult};
pub use http::{absolutize, Handle, Native, Request, RequestMode, Response};
#[cfg(feature = "native")]
pub use network::ReqwestFetcher;
pub use push::{
    click_target, ClickOutcome, Notification, NotificationAction, NotificationData, NotificationOptions,
    PushPayload, ACTION_CLOSE, ACTION_OPEN,
};
pub use routing::{Matcher, Route, RouteTable, Strategy};
pub use strategy::{cache_first, network_first, precache, Background, CachedAsset, Fetcher};

use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::cell::Cell;
use std::rc::Rc;
use url::Url;

use crate::config::ServiceWorkerConfig;

/// Worker lifecycle as driven by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Install failed; the browser discards this worker
    Redundant,
}

/// The worker global scope: registration, clients and notifications
#[async_trait(?Send)]
pub trait WorkerScope {
    async fn skip_waiting(&self) -> SwResult<()>;

    async fn claim_clients(&self) -> SwResult<()>;

    async fn show_notification(&self, notification: &Notification) -> SwResult<()>;

    /// URLs of every window client, controlled or not
    async fn window_client_urls(&self) -> SwResult<Vec<String>>;

    /// Focus the first window client at `url`; false if none
    async fn focus_client(&self, url: &str) -> SwResult<bool>;

    async fn open_window(&self, url: &str) -> SwResult<()>;

    /// Keep the worker alive for `task` without delaying the current response
    fn wait_until(&self, task: LocalBoxFuture<'static, ()>);
}

pub struct ServiceWorker {
    config: ServiceWorkerConfig,
    origin: Url,
    routes: RouteTable,
    caches: Rc<dyn CacheStorage>,
    fetcher: Rc<dyn Fetcher>,
    scope: Rc<dyn WorkerScope>,
    state: Cell<Lifecycle>,
}

impl ServiceWorker {
    pub fn new(
        config: ServiceWorkerConfig,
        origin: Url,
        caches: Rc<dyn CacheStorage>,
        fetcher: Rc<dyn Fetcher>,
        scope: Rc<dyn WorkerScope>,
    ) -> Self {
        Self {
            routes: RouteTable::from_config(&config),
            config,
            origin,
            caches,
            fetcher,
            scope,
            state: Cell::new(Lifecycle::Parsed),
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state.get()
    }

    pub fn config(&self) -> &ServiceWorkerConfig {
        &self.config
    }

    /// Pre-cache the app shell, then take over without waiting
    pub async fn install(&self) -> SwResult<Vec<CachedAsset>> {
        tracing::info!(cache = %self.config.cache_name, "Installing");
        self.state.set(Lifecycle::Installing);

        let assets = match precache(
            self.caches.as_ref(),
            &self.config.cache_name,
            self.fetcher.as_ref(),
            &self.origin,
            &self.config.precache,
        )
        .await
        {
            Ok(assets) => assets,
            Err(e) => {
                tracing::error!(error = %e, "Install failed");
                self.state.set(Lifecycle::Redundant);
                return Err(e);
            }
        };
        tracing::info!(count = assets.len(), "Cached static assets");

        self.scope.skip_waiting().await?;
        self.state.set(Lifecycle::Installed);
        Ok(assets)
    }

    /// Drop every cache store but the current one, then claim open pages
    pub async fn activate(&self) -> SwResult<Vec<String>> {
        tracing::info!("Activating");
        self.state.set(Lifecycle::Activating);

        let mut deleted = Vec::new();
        for name in self.caches.keys().await? {
            if name != self.config.cache_name && self.caches.delete(&name).await? {
                tracing::debug!(cache = %name, "Deleted old cache");
                deleted.push(name);
            }
        }

        self.scope.claim_clients().await?;
        self.state.set(Lifecycle::Activated);
        Ok(deleted)
    }

    pub fn route(&self, request: &Request) -> Strategy {
        self.routes.resolve(request)
    }

    /// Answer a fetch event; `None` leaves the request to the browser
    pub async fn handle_fetch(&self, request: &Request) -> SwResult<Option<Response>> {
        let cache_name = &self.config.cache_name;
        let scope = Rc::clone(&self.scope);
        let background = move |task: LocalBoxFuture<'static, ()>| scope.wait_until(task);

        match self.route(request) {
            Strategy::Passthrough => Ok(None),
            Strategy::CacheFirst => {
                cache_first(&self.caches, cache_name, self.fetcher.as_ref(), request, &background)
                    .await
                    .map(Some)
            }
            Strategy::NetworkFirst => {
                let offline_url = absolutize(&self.origin, &self.config.offline_url)?;
                let response = network_first(
                    &self.caches,
                    cache_name,
                    self.fetcher.as_ref(),
                    request,
                    &offline_url,
                    &background,
                )
                .await;
                Ok(Some(response))
            }
        }
    }

    /// Notification for a push message
    pub fn notification_for(&self, payload: Option<&str>) -> Notification {
        Notification::from_payload(PushPayload::parse(payload), &self.config.notification)
    }

    pub async fn on_push(&self, payload: Option<&str>) -> SwResult<Notification> {
        tracing::info!("Push received");
        let notification = self.notification_for(payload);
        self.scope.show_notification(&notification).await?;
        Ok(notification)
    }

    /// Handle a click on a shown notification (already closed by the caller)
    pub async fn on_notification_click(&self, action: &str, data_url: Option<&str>) -> SwResult<ClickOutcome> {
        tracing::info!(action, "Notification clicked");
        if action == ACTION_CLOSE {
            return Ok(ClickOutcome::Dismissed);
        }

        let target = click_target(data_url, &self.origin);
        let clients = self.scope.window_client_urls().await?;
        if clients.iter().any(|url| *url == target) && self.scope.focus_client(&target).await? {
            return Ok(ClickOutcome::Focused(target));
        }

        self.scope.open_window(&target).await?;
        Ok(ClickOutcome::Opened(target))
    }

    /// Background sync; returns whether the tag is one this worker owns
    pub async fn on_sync(&self, tag: &str) -> bool {
        tracing::info!(tag, "Background sync");
        if tag != self.config.sync_tag {
            return false;
        }
        self.sync_reading_progress().await;
        true
    }

    /// Reading progress is saved online only, so there is nothing queued to
    /// replay yet
    async fn sync_reading_progress(&self) {
        tracing::debug!("Syncing reading progress");
    }
}
