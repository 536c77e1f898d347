//! # Cloudstore
//!
//! Browser layer of the Cloudstore web application: the UI chrome shared by
//! every page, the loading bar and page transitions, the PWA install flow,
//! the food diary widget and an offline-first service worker.
//!
//! Every browser capability is a trait in [`platform`], so the page logic is
//! plain Rust that runs the same in the browser (through the `cloudstore-ui`
//! wasm bindings) and in unit tests.
//!
//! ## Modules
//!
//! - [`platform`]: DOM, window, storage, timer and event abstractions
//! - [`chrome`]: sidebar, search, toasts, unread badge, gestures, shortcuts
//! - [`loading_bar`]: simulated page-load progress
//! - [`transitions`]: exit/enter animations around navigation
//! - [`pwa`]: install prompt capture and the iOS install guide
//! - [`food_diary`]: meal deletion and the calorie ring
//! - [`sw`]: service worker routing, caching and push notifications
//! - [`app`]: wires all of the above onto one page
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloudstore::sw::{Request, RouteTable};
//!
//! let routes = RouteTable::default();
//! let strategy = routes.resolve(&Request::get("https://cloudstore.uz/static/blog/style.css"));
//! println!("{}", strategy); // cache-first
//! ```

pub mod api;
pub mod app;
pub mod chrome;
pub mod config;
pub mod food_diary;
pub mod loading_bar;
#[cfg(feature = "native")]
pub mod logging;
pub mod platform;
pub mod pwa;
pub mod sw;
pub mod transitions;

// Re-export top-level types for convenience
pub use api::{ApiError, ApiResult, HttpClient};
pub use app::{App, Services};
pub use config::{
    ClientConfig, Config, ConfigError, GestureConfig, LoggingConfig, NotificationConfig, ServiceWorkerConfig,
};
pub use platform::{Browser, EventBus, Listener, PageEvent, PlatformError, PlatformResult, Propagation};
pub use sw::{Lifecycle, ServiceWorker, Strategy, SwError, SwResult};
