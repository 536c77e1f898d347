//! Configuration System
//!
//! Endpoints, gesture thresholds and service worker settings. Every field has
//! a default matching the deployed site, so the browser bundle runs on
//! `Config::default()`; the CLI additionally reads TOML files and
//! `CLOUDSTORE_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub service_worker: ServiceWorkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Page script settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_online_status_url")]
    pub online_status_url: String,

    /// Delete endpoint with an `{id}` placeholder
    #[serde(default = "default_delete_intake_url")]
    pub delete_intake_url: String,

    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_csrf_cookie")]
    pub csrf_cookie: String,

    /// Seconds between unread-count checks; 0 checks once at boot only
    #[serde(default = "default_unread_poll_secs")]
    pub unread_poll_secs: u32,

    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u32,

    #[serde(default)]
    pub gestures: GestureConfig,

    /// Days a dismissed install banner stays hidden
    #[serde(default = "default_banner_snooze_days")]
    pub banner_snooze_days: u32,
}

fn default_online_status_url() -> String {
    "/api/online-status/".to_string()
}

fn default_delete_intake_url() -> String {
    "/api/food-intake/{id}/delete/".to_string()
}

fn default_search_url() -> String {
    "/kitoblar/".to_string()
}

fn default_csrf_cookie() -> String {
    "csrftoken".to_string()
}

fn default_unread_poll_secs() -> u32 {
    60
}

fn default_toast_duration_ms() -> u32 {
    3000
}

fn default_banner_snooze_days() -> u32 {
    7
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            online_status_url: default_online_status_url(),
            delete_intake_url: default_delete_intake_url(),
            search_url: default_search_url(),
            csrf_cookie: default_csrf_cookie(),
            unread_poll_secs: default_unread_poll_secs(),
            toast_duration_ms: default_toast_duration_ms(),
            gestures: GestureConfig::default(),
            banner_snooze_days: default_banner_snooze_days(),
        }
    }
}

/// Touch gesture thresholds, in CSS pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Minimum horizontal travel for a swipe
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,

    /// An opening swipe must start this close to the left edge
    #[serde(default = "default_swipe_edge")]
    pub swipe_edge: f64,

    /// Pull distance after which the body starts to follow the finger
    #[serde(default = "default_pull_offset_start")]
    pub pull_offset_start: f64,

    /// Pull distance that reloads on release
    #[serde(default = "default_pull_reload")]
    pub pull_reload: f64,

    #[serde(default = "default_pull_max_offset")]
    pub pull_max_offset: f64,

    /// Fraction of the pull distance applied to the body
    #[serde(default = "default_pull_resistance")]
    pub pull_resistance: f64,
}

fn default_swipe_threshold() -> f64 {
    80.0
}

fn default_swipe_edge() -> f64 {
    50.0
}

fn default_pull_offset_start() -> f64 {
    100.0
}

fn default_pull_reload() -> f64 {
    120.0
}

fn default_pull_max_offset() -> f64 {
    50.0
}

fn default_pull_resistance() -> f64 {
    0.3
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: default_swipe_threshold(),
            swipe_edge: default_swipe_edge(),
            pull_offset_start: default_pull_offset_start(),
            pull_reload: default_pull_reload(),
            pull_max_offset: default_pull_max_offset(),
            pull_resistance: default_pull_resistance(),
        }
    }
}

/// Service worker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceWorkerConfig {
    #[serde(default = "default_script_url")]
    pub script_url: String,

    #[serde(default = "default_scope")]
    pub scope: String,

    /// Bumping this name evicts every older cache on activation
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    #[serde(default = "default_offline_url")]
    pub offline_url: String,

    /// Assets fetched at install time; one failure fails the install
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Path prefixes the worker never intercepts
    #[serde(default = "default_passthrough_prefixes")]
    pub passthrough_prefixes: Vec<String>,

    /// URL fragments served cache-first
    #[serde(default = "default_cache_first_patterns")]
    pub cache_first_patterns: Vec<String>,

    #[serde(default)]
    pub notification: NotificationConfig,

    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,
}

fn default_script_url() -> String {
    "/sw.js".to_string()
}

fn default_scope() -> String {
    "/".to_string()
}

fn default_cache_name() -> String {
    "cloudstore-v1".to_string()
}

fn default_offline_url() -> String {
    "/offline/".to_string()
}

fn default_precache() -> Vec<String> {
    vec![
        "/".to_string(),
        "/static/blog/style.css".to_string(),
        "/static/manifest.json".to_string(),
        "/offline/".to_string(),
        "/static/pkg-sw/cloudstore_ui.js".to_string(),
        "/static/pkg-sw/cloudstore_ui_bg.wasm".to_string(),
        "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css".to_string(),
    ]
}

fn default_passthrough_prefixes() -> Vec<String> {
    vec!["/api/".to_string(), "/admin/".to_string()]
}

fn default_cache_first_patterns() -> Vec<String> {
    ["/static/", "/media/", ".css", ".js", ".png", ".jpg"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_sync_tag() -> String {
    "sync-reading-progress".to_string()
}

impl Default for ServiceWorkerConfig {
    fn default() -> Self {
        Self {
            script_url: default_script_url(),
            scope: default_scope(),
            cache_name: default_cache_name(),
            offline_url: default_offline_url(),
            precache: default_precache(),
            passthrough_prefixes: default_passthrough_prefixes(),
            cache_first_patterns: default_cache_first_patterns(),
            notification: NotificationConfig::default(),
            sync_tag: default_sync_tag(),
        }
    }
}

/// Push notification defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_title")]
    pub default_title: String,

    #[serde(default = "default_notification_body")]
    pub default_body: String,

    #[serde(default = "default_notification_url")]
    pub default_url: String,

    #[serde(default = "default_notification_icon")]
    pub icon: String,

    #[serde(default = "default_notification_badge")]
    pub badge: String,

    #[serde(default = "default_vibrate")]
    pub vibrate: Vec<u32>,

    #[serde(default = "default_open_label")]
    pub open_label: String,

    #[serde(default = "default_close_label")]
    pub close_label: String,
}

fn default_notification_title() -> String {
    "Cloudstore".to_string()
}

fn default_notification_body() -> String {
    "Yangi xabar!".to_string()
}

fn default_notification_url() -> String {
    "/".to_string()
}

fn default_notification_icon() -> String {
    "/static/icons/icon-192x192.png".to_string()
}

fn default_notification_badge() -> String {
    "/static/icons/badge-72x72.png".to_string()
}

fn default_vibrate() -> Vec<u32> {
    vec![100, 50, 100]
}

fn default_open_label() -> String {
    "Ochish".to_string()
}

fn default_close_label() -> String {
    "Yopish".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_title: default_notification_title(),
            default_body: default_notification_body(),
            default_url: default_notification_url(),
            icon: default_notification_icon(),
            badge: default_notification_badge(),
            vibrate: default_vibrate(),
            open_label: default_open_label(),
            close_label: default_close_label(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`; the browser console always gets plain lines
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    #[cfg(feature = "native")]
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("cloudstore").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CLOUDSTORE_SEARCH_URL") {
            self.client.search_url = url;
        }

        if let Ok(name) = std::env::var("CLOUDSTORE_CACHE_NAME") {
            self.service_worker.cache_name = name;
        }
        if let Ok(url) = std::env::var("CLOUDSTORE_OFFLINE_URL") {
            self.service_worker.offline_url = url;
        }

        if let Ok(level) = std::env::var("CLOUDSTORE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CLOUDSTORE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Cloudstore browser layer configuration
#
# Environment variables override these settings:
# - CLOUDSTORE_SEARCH_URL
# - CLOUDSTORE_CACHE_NAME
# - CLOUDSTORE_OFFLINE_URL
# - CLOUDSTORE_LOG_LEVEL
# - CLOUDSTORE_LOG_FORMAT

[client]
online_status_url = "/api/online-status/"
delete_intake_url = "/api/food-intake/{id}/delete/"
search_url = "/kitoblar/"
csrf_cookie = "csrftoken"

# Seconds between unread-message checks (0 = check once at page load)
unread_poll_secs = 60

toast_duration_ms = 3000

# Days a dismissed install banner stays hidden
banner_snooze_days = 7

[client.gestures]
swipe_threshold = 80.0
swipe_edge = 50.0
pull_offset_start = 100.0
pull_reload = 120.0
pull_max_offset = 50.0
pull_resistance = 0.3

[service_worker]
script_url = "/sw.js"
scope = "/"

# Bump to evict all previously cached responses
cache_name = "cloudstore-v1"
offline_url = "/offline/"

precache = [
    "/",
    "/static/blog/style.css",
    "/static/manifest.json",
    "/offline/",
    # Worker module, so a restarted worker can boot offline
    "/static/pkg-sw/cloudstore_ui.js",
    "/static/pkg-sw/cloudstore_ui_bg.wasm",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css",
]

# Never intercepted (in addition to every non-GET request)
passthrough_prefixes = ["/api/", "/admin/"]

# Served from cache when present
cache_first_patterns = ["/static/", "/media/", ".css", ".js", ".png", ".jpg"]

sync_tag = "sync-reading-progress"

[service_worker.notification]
default_title = "Cloudstore"
default_body = "Yangi xabar!"
default_url = "/"
icon = "/static/icons/icon-192x192.png"
badge = "/static/icons/badge-72x72.png"
vibrate = [100, 50, 100]
open_label = "Ochish"
close_label = "Yopish"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
