//! Fetch Routing
//!
//! Ordered rules deciding how the worker answers each request. The first
//! matching rule wins; unmatched requests go network-first.

use std::fmt;

use super::http::Request;
use crate::config::ServiceWorkerConfig;

/// How a request is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Not intercepted; the browser fetches normally
    Passthrough,
    /// Cached copy if any, else network (successful responses are stored)
    CacheFirst,
    /// Network, storing successes; cache and offline fallbacks on failure
    NetworkFirst,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Passthrough => "passthrough",
            Strategy::CacheFirst => "cache-first",
            Strategy::NetworkFirst => "network-first",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// URL path starts with the prefix
    PathPrefix(String),
    /// Request method differs (case-insensitive)
    MethodOtherThan(String),
    /// Full URL contains the substring
    UrlContains(String),
}

impl Matcher {
    fn matches(&self, request: &Request, path: &str) -> bool {
        match self {
            Matcher::PathPrefix(prefix) => path.starts_with(prefix.as_str()),
            Matcher::MethodOtherThan(method) => !request.method.eq_ignore_ascii_case(method),
            Matcher::UrlContains(needle) => request.url.contains(needle.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub matcher: Matcher,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Strategy,
}

impl RouteTable {
    pub fn new(fallback: Strategy) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    pub fn route(mut self, matcher: Matcher, strategy: Strategy) -> Self {
        self.routes.push(Route { matcher, strategy });
        self
    }

    /// API/admin and non-GET pass through, static assets cache-first, pages
    /// network-first
    pub fn from_config(config: &ServiceWorkerConfig) -> Self {
        let mut table = Self::new(Strategy::NetworkFirst);
        for prefix in &config.passthrough_prefixes {
            table = table.route(Matcher::PathPrefix(prefix.clone()), Strategy::Passthrough);
        }
        table = table.route(Matcher::MethodOtherThan("GET".to_string()), Strategy::Passthrough);
        for pattern in &config.cache_first_patterns {
            table = table.route(Matcher::UrlContains(pattern.clone()), Strategy::CacheFirst);
        }
        table
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Strategy for `request`; unparsable URLs are left to the browser
    pub fn resolve(&self, request: &Request) -> Strategy {
        let path = match request.parsed_url() {
            Ok(url) => url.path().to_string(),
            Err(_) => return Strategy::Passthrough,
        };

        self.routes
            .iter()
            .find(|route| route.matcher.matches(request, &path))
            .map(|route| route.strategy)
            .unwrap_or(self.fallback)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_config(&ServiceWorkerConfig::default())
    }
}
