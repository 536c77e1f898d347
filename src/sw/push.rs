//! Push Notifications
//!
//! Turning push payloads into notifications, and deciding where a click on
//! one should take the user.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::NotificationConfig;

pub const ACTION_OPEN: &str = "open";
pub const ACTION_CLOSE: &str = "close";

/// Body of a push message; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PushPayload {
    /// Parse the raw message text; missing or malformed payloads are empty
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed push payload, using defaults");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// `NotificationOptions` as passed to `showNotification`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub options: NotificationOptions,
}

/// Empty strings count as absent
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Notification {
    pub fn from_payload(payload: PushPayload, config: &NotificationConfig) -> Self {
        Self {
            title: or_default(payload.title, &config.default_title),
            options: NotificationOptions {
                body: or_default(payload.body, &config.default_body),
                icon: config.icon.clone(),
                badge: config.badge.clone(),
                vibrate: config.vibrate.clone(),
                data: NotificationData {
                    url: or_default(payload.url, &config.default_url),
                },
                actions: vec![
                    NotificationAction {
                        action: ACTION_OPEN.to_string(),
                        title: config.open_label.clone(),
                    },
                    NotificationAction {
                        action: ACTION_CLOSE.to_string(),
                        title: config.close_label.clone(),
                    },
                ],
            },
        }
    }
}

/// Result of a notification click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The "close" action; nothing else happens
    Dismissed,
    /// An open window was already at the target
    Focused(String),
    Opened(String),
}

/// Absolute URL a click should lead to
///
/// Client URLs are always absolute, so relative targets are resolved against
/// the worker's origin before comparison.
pub fn click_target(data_url: Option<&str>, origin: &Url) -> String {
    let url = data_url.filter(|u| !u.is_empty()).unwrap_or("/");
    origin
        .join(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: Option<&str>) -> Notification {
        Notification::from_payload(PushPayload::parse(raw), &NotificationConfig::default())
    }

    #[test]
    fn test_full_payload() {
        let n = build(Some(r#"{"title": "Xabar", "body": "Salom", "url": "/xabarlar/"}"#));
        assert_eq!(n.title, "Xabar");
        assert_eq!(n.options.body, "Salom");
        assert_eq!(n.options.data.url, "/xabarlar/");
        assert_eq!(n.options.vibrate, vec![100, 50, 100]);
        assert_eq!(n.options.actions[0].action, "open");
        assert_eq!(n.options.actions[1].title, "Yopish");
    }

    #[test]
    fn test_missing_payload_uses_defaults() {
        let n = build(None);
        assert_eq!(n.title, "Cloudstore");
        assert_eq!(n.options.body, "Yangi xabar!");
        assert_eq!(n.options.data.url, "/");
    }

    #[test]
    fn test_malformed_payload_uses_defaults() {
        assert_eq!(build(Some("not json")), build(None));
        assert_eq!(build(Some(r#"{"title": 5}"#)), build(None));
    }

    #[test]
    fn test_partial_and_empty_fields() {
        let n = build(Some(r#"{"title": "", "body": "Yangi kitob"}"#));
        assert_eq!(n.title, "Cloudstore");
        assert_eq!(n.options.body, "Yangi kitob");
    }

    #[test]
    fn test_options_serialize_for_show_notification() {
        let json = serde_json::to_value(&build(None).options).unwrap();
        assert_eq!(json["data"]["url"], "/");
        assert_eq!(json["icon"], "/static/icons/icon-192x192.png");
        assert_eq!(json["actions"][1]["action"], "close");
    }

    #[test]
    fn test_click_target_is_absolute() {
        let origin = Url::parse("https://cloudstore.uz/").unwrap();
        assert_eq!(click_target(Some("/xabarlar/"), &origin), "https://cloudstore.uz/xabarlar/");
        assert_eq!(click_target(None, &origin), "https://cloudstore.uz/");
        assert_eq!(click_target(Some(""), &origin), "https://cloudstore.uz/");
        assert_eq!(
            click_target(Some("https://t.me/cloudstore"), &origin),
            "https://t.me/cloudstore"
        );
    }
}
