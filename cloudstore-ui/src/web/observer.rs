//! IntersectionObserver behind `VisibilityObserver`

use std::cell::RefCell;
use std::rc::Rc;

use cloudstore::chrome::{REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};
use cloudstore::platform::{Element, Intersection, VisibilityObserver};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::WebElement;

/// Observer that is created first and connected once its handler exists
#[derive(Default)]
pub struct WebObserver {
    inner: RefCell<Option<IntersectionObserver>>,
}

impl WebObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the native observer and route its entries to `handler`
    pub fn connect(&self, handler: impl Fn(Vec<Intersection>) + 'static) -> Result<(), JsValue> {
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _observer: JsValue| {
            let batch: Vec<Intersection> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| {
                    let target: Rc<dyn Element> = Rc::new(WebElement::new(entry.target()));
                    Intersection {
                        target,
                        is_intersecting: entry.is_intersecting(),
                    }
                })
                .collect();
            handler(batch);
        }) as Box<dyn FnMut(js_sys::Array, JsValue)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        options.set_root_margin(REVEAL_ROOT_MARGIN);

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        callback.forget();

        *self.inner.borrow_mut() = Some(observer);
        Ok(())
    }
}

impl VisibilityObserver for WebObserver {
    fn observe(&self, element: &Rc<dyn Element>) {
        if let (Some(observer), Some(el)) = (self.inner.borrow().as_ref(), WebElement::unwrap_ref(element)) {
            observer.observe(el);
        }
    }

    fn unobserve(&self, element: &Rc<dyn Element>) {
        if let (Some(observer), Some(el)) = (self.inner.borrow().as_ref(), WebElement::unwrap_ref(element)) {
            observer.unobserve(el);
        }
    }
}
