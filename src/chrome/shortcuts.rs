//! Keyboard Shortcuts

use std::rc::Rc;

use super::search::GlobalSearch;
use super::sidebar::Sidebar;
use crate::platform::{Listener, PageEvent, Propagation};

/// `Escape` closes the sidebar, Ctrl/Cmd+K jumps to search
pub struct KeyboardShortcuts {
    sidebar: Rc<Sidebar>,
    search: Rc<GlobalSearch>,
}

impl KeyboardShortcuts {
    pub fn new(sidebar: Rc<Sidebar>, search: Rc<GlobalSearch>) -> Self {
        Self { sidebar, search }
    }
}

impl Listener for KeyboardShortcuts {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        let PageEvent::KeyDown(press) = event else {
            return Propagation::Continue;
        };

        if press.key == "Escape" {
            self.sidebar.close();
            Propagation::Continue
        } else if press.modifiers.command() && press.key.eq_ignore_ascii_case("k") {
            self.search.focus();
            Propagation::PreventDefault
        } else {
            Propagation::Continue
        }
    }
}
