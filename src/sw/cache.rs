//! Cache Storage
//!
//! The worker's view of the Cache API: named stores of URL → response.
//! `MemoryCacheStorage` backs the tests and the CLI.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::error::SwResult;
use super::http::Response;

/// One named cache store
#[async_trait(?Send)]
pub trait Cache {
    async fn match_url(&self, url: &str) -> SwResult<Option<Response>>;

    async fn put(&self, url: &str, response: &Response) -> SwResult<()>;
}

/// `caches` in the worker scope
#[async_trait(?Send)]
pub trait CacheStorage {
    /// Open a store, creating it if needed
    async fn open(&self, name: &str) -> SwResult<Rc<dyn Cache>>;

    /// Store names in creation order
    async fn keys(&self) -> SwResult<Vec<String>>;

    async fn delete(&self, name: &str) -> SwResult<bool>;

    /// Look `url` up in every store, oldest first
    async fn match_any(&self, url: &str) -> SwResult<Option<Response>>;
}

#[derive(Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, Response>>,
}

impl MemoryCache {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Cached URLs, sorted
    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.entries.borrow().keys().cloned().collect();
        urls.sort();
        urls
    }
}

#[async_trait(?Send)]
impl Cache for MemoryCache {
    async fn match_url(&self, url: &str) -> SwResult<Option<Response>> {
        Ok(self.entries.borrow().get(url).cloned())
    }

    async fn put(&self, url: &str, response: &Response) -> SwResult<()> {
        self.entries
            .borrow_mut()
            .insert(url.to_string(), response.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCacheStorage {
    stores: RefCell<Vec<(String, Rc<MemoryCache>)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to a store without the async API
    pub fn store(&self, name: &str) -> Option<Rc<MemoryCache>> {
        self.stores
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cache)| Rc::clone(cache))
    }
}

#[async_trait(?Send)]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> SwResult<Rc<dyn Cache>> {
        if let Some(cache) = self.store(name) {
            return Ok(cache);
        }
        let cache = Rc::new(MemoryCache::default());
        self.stores
            .borrow_mut()
            .push((name.to_string(), Rc::clone(&cache)));
        Ok(cache)
    }

    async fn keys(&self) -> SwResult<Vec<String>> {
        Ok(self.stores.borrow().iter().map(|(n, _)| n.clone()).collect())
    }

    async fn delete(&self, name: &str) -> SwResult<bool> {
        let mut stores = self.stores.borrow_mut();
        let before = stores.len();
        stores.retain(|(n, _)| n != name);
        Ok(stores.len() != before)
    }

    async fn match_any(&self, url: &str) -> SwResult<Option<Response>> {
        let stores: Vec<Rc<MemoryCache>> = self.stores.borrow().iter().map(|(_, c)| Rc::clone(c)).collect();
        for store in stores {
            if let Some(hit) = store.match_url(url).await? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let storage = MemoryCacheStorage::new();
        let first = storage.open("cloudstore-v1").await.unwrap();
        first.put("https://cloudstore.uz/", &Response::new(200, "home")).await.unwrap();

        let again = storage.open("cloudstore-v1").await.unwrap();
        assert!(again.match_url("https://cloudstore.uz/").await.unwrap().is_some());
        assert_eq!(storage.keys().await.unwrap(), vec!["cloudstore-v1".to_string()]);
    }

    #[tokio::test]
    async fn test_match_any_prefers_oldest_store() {
        let storage = MemoryCacheStorage::new();
        let old = storage.open("cloudstore-v0").await.unwrap();
        let new = storage.open("cloudstore-v1").await.unwrap();
        old.put("https://cloudstore.uz/a.css", &Response::new(200, "old")).await.unwrap();
        new.put("https://cloudstore.uz/a.css", &Response::new(200, "new")).await.unwrap();

        let hit = storage.match_any("https://cloudstore.uz/a.css").await.unwrap().unwrap();
        assert_eq!(hit.text(), "old");
        assert!(storage.match_any("https://cloudstore.uz/b.css").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = MemoryCacheStorage::new();
        storage.open("a").await.unwrap();

        assert!(storage.delete("a").await.unwrap());
        assert!(!storage.delete("a").await.unwrap());
        assert!(storage.keys().await.unwrap().is_empty());
    }
}
