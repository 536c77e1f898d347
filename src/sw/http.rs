//! Requests and responses as seen by the worker
//!
//! A request or response that came from the browser keeps its platform
//! object in a [`Handle`], so the binding can hand it back untouched
//! instead of rebuilding it from these fields.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use url::Url;

use super::error::{SwError, SwResult};

/// A platform request/response object carried through the worker
pub trait Native: Any {
    /// An independent copy for a second consumer; bodies can be read once
    fn duplicate(&self) -> Option<Handle>;

    fn as_any(&self) -> &dyn Any;
}

#[derive(Clone)]
pub struct Handle(Rc<dyn Native>);

impl Handle {
    pub fn new(native: impl Native) -> Self {
        Self(Rc::new(native))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn duplicate(&self) -> Option<Handle> {
        self.0.duplicate()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handle(..)")
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// A top-level page navigation
    Navigate,
    Other,
}

impl RequestMode {
    /// Parse `Request.mode`
    pub fn from_mode(mode: &str) -> Self {
        if mode == "navigate" {
            RequestMode::Navigate
        } else {
            RequestMode::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Absolute URL
    pub url: String,
    pub method: String,
    pub mode: RequestMode,
    pub handle: Option<Handle>,
}

impl Request {
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: "GET".to_string(),
            mode: RequestMode::Other,
            handle: None,
        }
    }

    pub fn navigate(url: &str) -> Self {
        Self {
            mode: RequestMode::Navigate,
            ..Self::get(url)
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_uppercase();
        self
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    pub fn parsed_url(&self) -> SwResult<Url> {
        Ok(Url::parse(&self.url)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    /// Empty when the body stays inside `handle`
    pub body: Vec<u8>,
    pub handle: Option<Handle>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.into(),
            handle: None,
        }
    }

    /// Synthetic reply when neither network nor cache can answer
    pub fn offline() -> Self {
        Self {
            status_text: "Service Unavailable".to_string(),
            ..Self::new(503, "Offline")
        }
    }

    /// `Response.ok`: status in the 2xx range
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// A copy that can be consumed independently of `self`
    pub fn tee(&self) -> SwResult<Response> {
        let handle = match &self.handle {
            Some(handle) => Some(
                handle
                    .duplicate()
                    .ok_or_else(|| SwError::Cache("response body already used".to_string()))?,
            ),
            None => None,
        };
        Ok(Response {
            handle,
            ..self.clone()
        })
    }

    /// 101, 204, 205 and 304 responses must not carry a body
    pub fn is_null_body_status(&self) -> bool {
        matches!(self.status, 101 | 204 | 205 | 304)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Resolve `url` (possibly relative) against `base`
pub fn absolutize(base: &Url, url: &str) -> SwResult<String> {
    Ok(base.join(url)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok_range() {
        assert!(Response::new(200, "").ok());
        assert!(Response::new(204, "").ok());
        assert!(!Response::new(304, "").ok());
        assert!(!Response::new(404, "").ok());
    }

    #[test]
    fn test_offline_response() {
        let response = Response::offline();
        assert_eq!(response.status, 503);
        assert_eq!(response.text(), "Offline");
    }

    #[test]
    fn test_absolutize() {
        let base = Url::parse("https://cloudstore.uz/").unwrap();
        assert_eq!(absolutize(&base, "/offline/").unwrap(), "https://cloudstore.uz/offline/");
        assert_eq!(
            absolutize(&base, "https://cdnjs.cloudflare.com/a.css").unwrap(),
            "https://cdnjs.cloudflare.com/a.css"
        );
    }

    #[test]
    fn test_request_builders() {
        let request = Request::navigate("https://cloudstore.uz/").with_method("post");
        assert!(request.is_navigation());
        assert_eq!(request.method, "POST");
        assert_eq!(RequestMode::from_mode("cors"), RequestMode::Other);
    }

    struct Stream {
        readable: bool,
    }

    impl Native for Stream {
        fn duplicate(&self) -> Option<Handle> {
            self.readable.then(|| Handle::new(Stream { readable: true }))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_tee_duplicates_native_handle() {
        let handle = Handle::new(Stream { readable: true });
        let response = Response {
            handle: Some(handle.clone()),
            ..Response::new(200, "")
        };

        let copy = response.tee().unwrap();
        assert_eq!(copy.status, 200);
        assert!(copy.handle.as_ref().unwrap().downcast_ref::<Stream>().is_some());
        assert_ne!(copy.handle, Some(handle));
    }

    #[test]
    fn test_tee_fails_on_consumed_body() {
        let response = Response {
            handle: Some(Handle::new(Stream { readable: false })),
            ..Response::new(200, "")
        };
        assert!(matches!(response.tee(), Err(SwError::Cache(_))));

        let plain = Response::new(200, "css");
        assert_eq!(plain.tee().unwrap(), plain);
    }

    #[test]
    fn test_null_body_statuses() {
        assert!(Response::new(204, "").is_null_body_status());
        assert!(Response::new(304, "").is_null_body_status());
        assert!(!Response::new(200, "").is_null_body_status());
    }
}
