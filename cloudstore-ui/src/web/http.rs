//! gloo-net transport for the JSON API

use async_trait::async_trait;
use cloudstore::{ApiError, ApiResult, HttpClient};
use gloo_net::http::Request;

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooHttp;

#[async_trait(?Send)]
impl HttpClient for GlooHttp {
    async fn get(&self, url: &str) -> ApiResult<String> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        response.text().await.map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn post(&self, url: &str, headers: &[(String, String)]) -> ApiResult<String> {
        let mut request = Request::post(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        response.text().await.map_err(|e| ApiError::Network(e.to_string()))
    }
}
