//! Caching Strategies
//!
//! The network side of the worker and the three ways a request can be
//! answered from it and the cache.

use async_trait::async_trait;
use futures_util::future::{join_all, LocalBoxFuture};
use std::rc::Rc;
use url::Url;

use super::cache::CacheStorage;
use super::error::{SwError, SwResult};
use super::http::{absolutize, Request, Response};

/// `fetch()` from the worker scope
#[async_trait(?Send)]
pub trait Fetcher {
    /// Perform the request; only transport failures are errors
    async fn fetch(&self, request: &Request) -> SwResult<Response>;
}

/// Runs a task detached from the response, e.g. through `FetchEvent.waitUntil`
pub type Background<'a> = &'a dyn Fn(LocalBoxFuture<'static, ()>);

/// Summary of one pre-cached asset
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAsset {
    pub url: String,
    pub status: u16,
    pub bytes: usize,
}

/// Fetch every asset and store them all, or store nothing
pub async fn precache(
    caches: &dyn CacheStorage,
    cache_name: &str,
    fetcher: &dyn Fetcher,
    base: &Url,
    urls: &[String],
) -> SwResult<Vec<CachedAsset>> {
    let requests = urls
        .iter()
        .map(|url| absolutize(base, url).map(|abs| Request::get(&abs)))
        .collect::<SwResult<Vec<_>>>()?;

    let responses = join_all(requests.iter().map(|request| fetcher.fetch(request))).await;

    let mut fetched = Vec::with_capacity(requests.len());
    for (request, response) in requests.iter().zip(responses) {
        let response = response.map_err(|e| SwError::Precache {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;
        if !response.ok() {
            return Err(SwError::Precache {
                url: request.url.clone(),
                reason: format!("HTTP {}", response.status),
            });
        }
        fetched.push((request, response));
    }

    let cache = caches.open(cache_name).await?;
    let mut assets = Vec::with_capacity(fetched.len());
    for (request, response) in fetched {
        cache.put(&request.url, &response).await?;
        assets.push(CachedAsset {
            url: request.url.clone(),
            status: response.status,
            bytes: response.body.len(),
        });
    }
    Ok(assets)
}

/// Queue a cache write of a successful response; failures are logged only
fn store(
    caches: &Rc<dyn CacheStorage>,
    cache_name: &str,
    url: &str,
    response: &Response,
    background: Background<'_>,
) {
    if !response.ok() {
        return;
    }
    let copy = match response.tee() {
        Ok(copy) => copy,
        Err(e) => {
            tracing::warn!(url, error = %e, "Cache write skipped");
            return;
        }
    };

    let caches = Rc::clone(caches);
    let cache_name = cache_name.to_string();
    let url = url.to_string();
    background(Box::pin(async move {
        let result: SwResult<()> = async {
            let cache = caches.open(&cache_name).await?;
            cache.put(&url, &copy).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(url = %url, error = %e, "Cache write failed");
        }
    }));
}

/// Serve from the cache, falling back to (and filling from) the network
pub async fn cache_first(
    caches: &Rc<dyn CacheStorage>,
    cache_name: &str,
    fetcher: &dyn Fetcher,
    request: &Request,
    background: Background<'_>,
) -> SwResult<Response> {
    match caches.match_any(&request.url).await {
        Ok(Some(hit)) => return Ok(hit),
        Ok(None) => {}
        Err(e) => tracing::warn!(url = %request.url, error = %e, "Cache lookup failed"),
    }

    let response = fetcher.fetch(request).await?;
    store(caches, cache_name, &request.url, &response, background);
    Ok(response)
}

/// Ask the network first; offline, use the cache, then the offline page for
/// navigations, then a synthetic 503
pub async fn network_first(
    caches: &Rc<dyn CacheStorage>,
    cache_name: &str,
    fetcher: &dyn Fetcher,
    request: &Request,
    offline_url: &str,
    background: Background<'_>,
) -> Response {
    match fetcher.fetch(request).await {
        Ok(response) => {
            store(caches, cache_name, &request.url, &response, background);
            return response;
        }
        Err(e) => tracing::debug!(url = %request.url, error = %e, "Network unavailable"),
    }

    if let Some(hit) = lookup(caches.as_ref(), &request.url).await {
        return hit;
    }

    if request.is_navigation() {
        if let Some(page) = lookup(caches.as_ref(), offline_url).await {
            return page;
        }
        tracing::warn!(offline_url, "Offline page missing from cache");
    }

    Response::offline()
}

async fn lookup(caches: &dyn CacheStorage, url: &str) -> Option<Response> {
    caches.match_any(url).await.unwrap_or_else(|e| {
        tracing::warn!(url, error = %e, "Cache lookup failed");
        None
    })
}
