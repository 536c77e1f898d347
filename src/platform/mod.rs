//! Browser Platform
//!
//! Every browser capability the components touch is a trait here. The wasm
//! bindings in `cloudstore-ui` implement them over `web-sys`; tests use the
//! in-crate fakes. Nothing in this module knows about a particular page.

mod error;
pub mod events;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{PlatformError, PlatformResult};
pub use events::{Click, EventBus, KeyPress, Link, Listener, Modifiers, PageEvent, Propagation, TouchPoint};

use futures_util::future::LocalBoxFuture;
use std::any::Any;
use std::rc::Rc;

/// A live element in the page
pub trait Element {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    /// Replace the whole class attribute
    fn set_class_name(&self, class_name: &str);

    /// Set an inline style property; an empty value removes it
    fn set_style(&self, property: &str, value: &str);

    fn set_text(&self, text: &str);
    fn set_inner_html(&self, html: &str);
    fn attribute(&self, name: &str) -> Option<String>;

    /// Current value for form inputs, empty for everything else
    fn value(&self) -> String;

    fn focus(&self);

    /// Detach the element from the document
    fn remove(&self);

    /// Drop any click handler installed by markup or script
    fn clear_onclick(&self);

    /// Whether an image has finished loading (always true for non-images)
    fn is_complete(&self) -> bool;

    /// Run `callback` once when the element fires `load`
    fn on_load(&self, callback: Box<dyn FnOnce()>);

    fn as_any(&self) -> &dyn Any;
}

/// Description of an element to create
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSpec {
    pub tag: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub text: Option<String>,
    pub inner_html: Option<String>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.inner_html = Some(html.to_string());
        self
    }
}

/// Document access
pub trait Dom {
    /// First element matching a CSS selector
    fn query(&self, selector: &str) -> Option<Rc<dyn Element>>;

    /// All elements matching a CSS selector, in document order
    fn query_all(&self, selector: &str) -> Vec<Rc<dyn Element>>;

    fn body(&self) -> Rc<dyn Element>;

    /// Create an element and append it to `<body>`
    fn append_to_body(&self, spec: &ElementSpec) -> PlatformResult<Rc<dyn Element>>;
}

/// Window, location and navigator access
pub trait Window {
    /// Navigate the current tab
    fn navigate(&self, href: &str);
    fn reload(&self);
    fn scroll_y(&self) -> f64;
    /// Blocking confirmation dialog
    fn confirm(&self, message: &str) -> bool;
    /// `scheme://host[:port]` of the current page
    fn origin(&self) -> String;
    fn user_agent(&self) -> String;
    /// Raw `document.cookie`
    fn cookie(&self) -> String;
    fn matches_media(&self, query: &str) -> bool;
    /// iOS Safari's `navigator.standalone`
    fn is_ios_standalone(&self) -> bool;
}

/// Client-local persistent key/value storage
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Handle for a repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Timers, animation frames, the clock and the local task queue
pub trait Scheduler {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>);
    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId;
    fn clear_interval(&self, id: TimerId);
    fn next_frame(&self, callback: Box<dyn FnOnce()>);
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;
    /// Run a future on the current thread without awaiting it
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// One observed element crossing the visibility threshold
pub struct Intersection {
    pub target: Rc<dyn Element>,
    pub is_intersecting: bool,
}

/// Viewport intersection tracking
pub trait VisibilityObserver {
    fn observe(&self, element: &Rc<dyn Element>);
    fn unobserve(&self, element: &Rc<dyn Element>);
}

/// The capabilities every page component needs
#[derive(Clone)]
pub struct Browser {
    pub dom: Rc<dyn Dom>,
    pub window: Rc<dyn Window>,
    pub storage: Rc<dyn Storage>,
    pub scheduler: Rc<dyn Scheduler>,
}

impl Browser {
    pub fn new(
        dom: Rc<dyn Dom>,
        window: Rc<dyn Window>,
        storage: Rc<dyn Storage>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            dom,
            window,
            storage,
            scheduler,
        }
    }

    /// Set a style on the first match of `selector`, if present
    pub fn style(&self, selector: &str, property: &str, value: &str) -> bool {
        match self.dom.query(selector) {
            Some(el) => {
                el.set_style(property, value);
                true
            }
            None => false,
        }
    }
}
