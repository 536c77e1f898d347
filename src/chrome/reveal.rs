//! Scroll Effects
//!
//! One-shot reveal animation for cards entering the viewport, and the
//! `loaded` class for images once they have decoded.

use std::rc::Rc;

use crate::platform::{Dom, Intersection, Listener, PageEvent, Propagation, VisibilityObserver};

pub const CARD_SELECTOR: &str = ".book-card, .amz-book-card, .card";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

const REVEALED_CLASS: &str = "card-animate";
const LOADED_CLASS: &str = "loaded";

pub struct RevealOnScroll {
    dom: Rc<dyn Dom>,
    observer: Rc<dyn VisibilityObserver>,
}

impl RevealOnScroll {
    pub fn new(dom: Rc<dyn Dom>, observer: Rc<dyn VisibilityObserver>) -> Self {
        Self { dom, observer }
    }

    /// Start watching every card on the page
    pub fn observe_cards(&self) -> usize {
        let cards = self.dom.query_all(CARD_SELECTOR);
        for card in &cards {
            self.observer.observe(card);
        }
        cards.len()
    }

    /// Observer callback
    pub fn on_intersections(&self, entries: &[Intersection]) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            entry.target.add_class(REVEALED_CLASS);
            self.observer.unobserve(&entry.target);
        }
    }
}

impl Listener for RevealOnScroll {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        if let PageEvent::DomContentLoaded = event {
            let count = self.observe_cards();
            tracing::debug!(count, "Observing cards");
        }
        Propagation::Continue
    }
}

pub struct LazyImages {
    dom: Rc<dyn Dom>,
}

impl LazyImages {
    pub fn new(dom: Rc<dyn Dom>) -> Self {
        Self { dom }
    }

    pub fn mark_images(&self) {
        for img in self.dom.query_all("img") {
            if img.is_complete() {
                img.add_class(LOADED_CLASS);
            } else {
                let target = Rc::clone(&img);
                img.on_load(Box::new(move || target.add_class(LOADED_CLASS)));
            }
        }
    }
}

impl Listener for LazyImages {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        if let PageEvent::DomContentLoaded = event {
            self.mark_images();
        }
        Propagation::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::{self, FakeObserver};
    use crate::platform::Element;

    #[test]
    fn test_cards_reveal_once() {
        let (browser, handles) = fake::browser();
        let first = handles.dom.insert(CARD_SELECTOR, "div");
        let second = handles.dom.insert(CARD_SELECTOR, "div");
        let observer = Rc::new(FakeObserver::default());
        let reveal = RevealOnScroll::new(browser.dom.clone(), observer.clone());

        reveal.on_event(&PageEvent::DomContentLoaded);
        assert_eq!(observer.observed.get(), 2);

        reveal.on_intersections(&[
            Intersection { target: first.clone(), is_intersecting: true },
            Intersection { target: second.clone(), is_intersecting: false },
        ]);

        assert!(first.has_class("card-animate"));
        assert!(!second.has_class("card-animate"));
        assert_eq!(observer.unobserved.get(), 1);
    }

    #[test]
    fn test_images_marked_loaded() {
        let (browser, handles) = fake::browser();
        let ready = handles.dom.insert("img", "img");
        let pending = handles.dom.insert("img", "img");
        pending.set_complete(false);
        let images = LazyImages::new(browser.dom.clone());

        images.on_event(&PageEvent::DomContentLoaded);
        assert!(ready.has_class("loaded"));
        assert!(!pending.has_class("loaded"));

        pending.fire_load();
        assert!(pending.has_class("loaded"));
    }
}
