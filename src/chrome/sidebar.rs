//! Sidebar
//!
//! Off-canvas navigation toggled by the menu button, swipes and Escape.

use std::rc::Rc;

use crate::platform::Dom;

pub const SIDEBAR: &str = "#sidebar";
pub const SIDEBAR_OVERLAY: &str = "#sidebarOverlay";

const OPEN_CLASS: &str = "open";
const OVERLAY_CLASS: &str = "show";

pub struct Sidebar {
    dom: Rc<dyn Dom>,
}

impl Sidebar {
    pub fn new(dom: Rc<dyn Dom>) -> Self {
        Self { dom }
    }

    /// Show the sidebar and lock page scroll
    pub fn open(&self) {
        if let Some(sidebar) = self.dom.query(SIDEBAR) {
            sidebar.add_class(OPEN_CLASS);
        }
        if let Some(overlay) = self.dom.query(SIDEBAR_OVERLAY) {
            overlay.add_class(OVERLAY_CLASS);
        }
        self.dom.body().set_style("overflow", "hidden");
    }

    /// Hide the sidebar and unlock page scroll
    pub fn close(&self) {
        if let Some(sidebar) = self.dom.query(SIDEBAR) {
            sidebar.remove_class(OPEN_CLASS);
        }
        if let Some(overlay) = self.dom.query(SIDEBAR_OVERLAY) {
            overlay.remove_class(OVERLAY_CLASS);
        }
        self.dom.body().set_style("overflow", "");
    }

    pub fn is_open(&self) -> bool {
        self.dom
            .query(SIDEBAR)
            .map(|sidebar| sidebar.has_class(OPEN_CLASS))
            .unwrap_or(false)
    }
}
