//! Page Events
//!
//! Browser events as plain data, and the bus that fans them out to the
//! components in registration order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::pwa::InstallPrompt;

/// Keyboard/mouse modifier state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl on Linux/Windows, Cmd on macOS
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// First touch point of a touch event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchPoint {
    pub screen_x: f64,
    pub client_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyPress {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// The anchor nearest to a click target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    /// Resolved absolute URL; `None` when the anchor has no `href`
    pub href: Option<String>,
    pub target: String,
    pub download: bool,
}

impl Link {
    pub fn to(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Click {
    pub link: Option<Link>,
    pub modifiers: Modifiers,
}

/// Events the page components react to
#[derive(Clone)]
pub enum PageEvent {
    DomContentLoaded,
    Load,
    PageShow { persisted: bool },
    PopState,
    TouchStart(TouchPoint),
    TouchMove(TouchPoint),
    TouchEnd(TouchPoint),
    KeyDown(KeyPress),
    Click(Click),
    BeforeInstallPrompt(Rc<dyn InstallPrompt>),
    AppInstalled,
}

impl PageEvent {
    /// DOM event type name
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::DomContentLoaded => "DOMContentLoaded",
            PageEvent::Load => "load",
            PageEvent::PageShow { .. } => "pageshow",
            PageEvent::PopState => "popstate",
            PageEvent::TouchStart(_) => "touchstart",
            PageEvent::TouchMove(_) => "touchmove",
            PageEvent::TouchEnd(_) => "touchend",
            PageEvent::KeyDown(_) => "keydown",
            PageEvent::Click(_) => "click",
            PageEvent::BeforeInstallPrompt(_) => "beforeinstallprompt",
            PageEvent::AppInstalled => "appinstalled",
        }
    }
}

impl fmt::Debug for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageEvent::PageShow { persisted } => {
                f.debug_struct("PageShow").field("persisted", persisted).finish()
            }
            PageEvent::TouchStart(p) => f.debug_tuple("TouchStart").field(p).finish(),
            PageEvent::TouchMove(p) => f.debug_tuple("TouchMove").field(p).finish(),
            PageEvent::TouchEnd(p) => f.debug_tuple("TouchEnd").field(p).finish(),
            PageEvent::KeyDown(k) => f.debug_tuple("KeyDown").field(k).finish(),
            PageEvent::Click(c) => f.debug_tuple("Click").field(c).finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// What the binding should do with the native event after dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    PreventDefault,
}

/// A component that reacts to page events
pub trait Listener {
    fn on_event(&self, event: &PageEvent) -> Propagation;
}

/// Ordered fan-out of page events
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<Rc<dyn Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Rc<dyn Listener>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Deliver `event` to every listener; any listener may veto the default action
    pub fn dispatch(&self, event: &PageEvent) -> Propagation {
        // Snapshot so listeners may subscribe more handlers while running
        let listeners: Vec<Rc<dyn Listener>> = self.listeners.borrow().clone();

        let mut outcome = Propagation::Continue;
        for listener in listeners {
            if listener.on_event(event) == Propagation::PreventDefault {
                outcome = Propagation::PreventDefault;
            }
        }

        tracing::trace!(event = event.name(), ?outcome, "Dispatched page event");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        veto: bool,
    }

    impl Listener for Recorder {
        fn on_event(&self, _event: &PageEvent) -> Propagation {
            self.log.borrow_mut().push(self.name);
            if self.veto {
                Propagation::PreventDefault
            } else {
                Propagation::Continue
            }
        }
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let bus = EventBus::new();
        for name in ["first", "second", "third"] {
            bus.subscribe(Rc::new(Recorder { name, log: Rc::clone(&log), veto: false }));
        }

        let outcome = bus.dispatch(&PageEvent::Load);

        assert_eq!(outcome, Propagation::Continue);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_any_listener_can_prevent_default() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let bus = EventBus::new();
        bus.subscribe(Rc::new(Recorder { name: "veto", log: Rc::clone(&log), veto: true }));
        bus.subscribe(Rc::new(Recorder { name: "after", log: Rc::clone(&log), veto: false }));

        let outcome = bus.dispatch(&PageEvent::KeyDown(KeyPress::new("k")));

        assert_eq!(outcome, Propagation::PreventDefault);
        // Later listeners still run
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers { ctrl: true, ..Default::default() }.command());
        assert!(Modifiers { meta: true, ..Default::default() }.command());
        assert!(!Modifiers { shift: true, ..Default::default() }.command());
    }

    #[test]
    fn test_event_debug_names() {
        assert_eq!(format!("{:?}", PageEvent::Load), "load");
        assert_eq!(
            format!("{:?}", PageEvent::PageShow { persisted: true }),
            "PageShow { persisted: true }"
        );
    }
}
