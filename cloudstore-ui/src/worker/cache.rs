//! Cache Storage over `caches`

use std::rc::Rc;

use async_trait::async_trait;
use cloudstore::sw::{Cache, CacheStorage, Response};
use cloudstore::SwResult;
use wasm_bindgen::JsCast;

use super::convert::{cache_error, response_from_web, response_to_web, settle};

pub struct WebCache {
    cache: web_sys::Cache,
}

#[async_trait(?Send)]
impl Cache for WebCache {
    async fn match_url(&self, url: &str) -> SwResult<Option<Response>> {
        let found = settle(Ok(self.cache.match_with_str(url)), cache_error).await?;
        match found.dyn_into::<web_sys::Response>() {
            Ok(response) => Ok(Some(response_from_web(response))),
            Err(_) => Ok(None),
        }
    }

    async fn put(&self, url: &str, response: &Response) -> SwResult<()> {
        let response = response_to_web(response)?;
        settle(Ok(self.cache.put_with_str(url, &response)), cache_error).await?;
        Ok(())
    }
}

pub struct WebCacheStorage {
    caches: web_sys::CacheStorage,
}

impl WebCacheStorage {
    pub fn new(caches: web_sys::CacheStorage) -> Self {
        Self { caches }
    }
}

#[async_trait(?Send)]
impl CacheStorage for WebCacheStorage {
    async fn open(&self, name: &str) -> SwResult<Rc<dyn Cache>> {
        let cache = settle(Ok(self.caches.open(name)), cache_error).await?;
        Ok(Rc::new(WebCache {
            cache: cache.unchecked_into(),
        }))
    }

    async fn keys(&self) -> SwResult<Vec<String>> {
        let keys = settle(Ok(self.caches.keys()), cache_error).await?;
        let keys: js_sys::Array = keys.unchecked_into();
        Ok(keys.iter().filter_map(|key| key.as_string()).collect())
    }

    async fn delete(&self, name: &str) -> SwResult<bool> {
        let deleted = settle(Ok(self.caches.delete(name)), cache_error).await?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn match_any(&self, url: &str) -> SwResult<Option<Response>> {
        let found = settle(Ok(self.caches.match_with_str(url)), cache_error).await?;
        match found.dyn_into::<web_sys::Response>() {
            Ok(response) => Ok(Some(response_from_web(response))),
            Err(_) => Ok(None),
        }
    }
}
