//! Touch Gestures
//!
//! Edge swipe to open/close the sidebar, and pull-to-refresh at the top of
//! the page. Each gesture's state lives from touchstart to touchend only.

use std::cell::Cell;
use std::rc::Rc;

use super::sidebar::Sidebar;
use crate::config::GestureConfig;
use crate::platform::{Browser, Listener, PageEvent, Propagation};

/// Horizontal swipe between the start and end of a touch
pub struct SwipeGesture {
    sidebar: Rc<Sidebar>,
    threshold: f64,
    edge: f64,
    start_x: Cell<f64>,
}

/// What a completed swipe asks of the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    Open,
    Close,
    None,
}

impl SwipeGesture {
    pub fn new(sidebar: Rc<Sidebar>, config: &GestureConfig) -> Self {
        Self {
            sidebar,
            threshold: config.swipe_threshold,
            edge: config.swipe_edge,
            start_x: Cell::new(0.0),
        }
    }

    /// Decide the action for a swipe from `start_x` to `end_x`
    pub fn classify(&self, start_x: f64, end_x: f64, sidebar_open: bool) -> SwipeAction {
        let distance = end_x - start_x;
        if distance >= self.threshold && start_x < self.edge {
            SwipeAction::Open
        } else if distance <= -self.threshold && sidebar_open {
            SwipeAction::Close
        } else {
            SwipeAction::None
        }
    }
}

impl Listener for SwipeGesture {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        match event {
            PageEvent::TouchStart(touch) => self.start_x.set(touch.screen_x),
            PageEvent::TouchEnd(touch) => {
                let action = self.classify(self.start_x.get(), touch.screen_x, self.sidebar.is_open());
                match action {
                    SwipeAction::Open => self.sidebar.open(),
                    SwipeAction::Close => self.sidebar.close(),
                    SwipeAction::None => {}
                }
                self.start_x.set(0.0);
            }
            _ => {}
        }
        Propagation::Continue
    }
}

#[derive(Debug, Clone, Copy)]
struct Pull {
    start_y: f64,
    move_y: f64,
}

/// Drag down from the top of the page to reload
pub struct PullToRefresh {
    browser: Browser,
    config: GestureConfig,
    pull: Cell<Option<Pull>>,
}

impl PullToRefresh {
    pub fn new(browser: Browser, config: &GestureConfig) -> Self {
        Self {
            browser,
            config: config.clone(),
            pull: Cell::new(None),
        }
    }

    /// Body offset in pixels for a pull of `distance`, if it should move at all
    pub fn offset_for(&self, distance: f64) -> Option<f64> {
        if distance > self.config.pull_offset_start {
            Some((distance * self.config.pull_resistance).min(self.config.pull_max_offset))
        } else {
            None
        }
    }

    fn at_top(&self) -> bool {
        self.browser.window.scroll_y() == 0.0
    }

    fn set_body_offset(&self, transform: &str) {
        self.browser.dom.body().set_style("transform", transform);
    }
}

impl Listener for PullToRefresh {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        match event {
            PageEvent::TouchStart(touch) => {
                if self.at_top() {
                    self.pull.set(Some(Pull {
                        start_y: touch.client_y,
                        move_y: touch.client_y,
                    }));
                }
            }
            PageEvent::TouchMove(touch) => {
                if let Some(mut pull) = self.pull.get() {
                    pull.move_y = touch.client_y;
                    self.pull.set(Some(pull));

                    if self.at_top() {
                        if let Some(offset) = self.offset_for(pull.move_y - pull.start_y) {
                            self.set_body_offset(&format!("translateY({}px)", offset));
                        }
                    }
                }
            }
            PageEvent::TouchEnd(_) => {
                if let Some(pull) = self.pull.take() {
                    let distance = pull.move_y - pull.start_y;
                    if distance > self.config.pull_reload && self.at_top() {
                        tracing::debug!(distance, "Pull to refresh");
                        self.browser.window.reload();
                    }
                    self.set_body_offset("");
                }
            }
            _ => {}
        }
        Propagation::Continue
    }
}
