//! Native fetcher backed by reqwest

use async_trait::async_trait;
use std::time::Duration;

use super::error::{SwError, SwResult};
use super::http::{Request, Response};
use super::strategy::Fetcher;

pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> SwResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cloudstore/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SwError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &Request) -> SwResult<Response> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| SwError::Network(e.to_string()))?;

        let response = self
            .client
            .request(method, &request.url)
            .send()
            .await
            .map_err(|e| SwError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| SwError::Network(e.to_string()))?;

        tracing::debug!(url = %request.url, status = status.as_u16(), bytes = body.len(), "Fetched");

        Ok(Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: body.to_vec(),
            handle: None,
        })
    }
}
