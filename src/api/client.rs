//! HTTP API Client
//!
//! Calls to the two JSON endpoints the page scripts use. The transport is a
//! trait so the browser binding can use `gloo-net` and tests can use canned
//! bodies.

use async_trait::async_trait;
use serde::Deserialize;

use super::error::ApiResult;

/// Header carrying Django's CSRF token
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Minimal HTTP transport returning the raw response body
///
/// Non-2xx statuses are not errors here: the endpoints report failure in the
/// JSON body, so callers always get to parse it.
#[async_trait(?Send)]
pub trait HttpClient {
    async fn get(&self, url: &str) -> ApiResult<String>;

    async fn post(&self, url: &str, headers: &[(String, String)]) -> ApiResult<String>;
}

// ============ Response Types ============

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnlineStatus {
    #[serde(default)]
    pub unread_count: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

// ============ API Functions ============

/// Fetch the signed-in user's online status
pub async fn fetch_online_status(http: &dyn HttpClient, url: &str) -> ApiResult<OnlineStatus> {
    let body = http.get(url).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Delete one food-intake record
///
/// `url_template` contains an `{id}` placeholder.
pub async fn delete_food_intake(
    http: &dyn HttpClient,
    url_template: &str,
    id: u64,
    csrf_token: &str,
) -> ApiResult<DeleteResponse> {
    let url = url_template.replace("{id}", &id.to_string());
    let headers = vec![(CSRF_HEADER.to_string(), csrf_token.to_string())];

    let body = http.post(&url, &headers).await?;
    Ok(serde_json::from_str(&body)?)
}
