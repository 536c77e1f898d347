//! UI Chrome
//!
//! Everything on every page outside the content area: sidebar, search,
//! toasts, the unread badge, gestures, shortcuts and scroll effects.

mod gestures;
mod registration;
mod reveal;
mod search;
mod shortcuts;
mod sidebar;
mod toast;
mod unread;

pub use gestures::{PullToRefresh, SwipeAction, SwipeGesture};
pub use registration::{register_service_worker, WorkerRegistrar};
pub use reveal::{LazyImages, RevealOnScroll, CARD_SELECTOR, REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};
pub use search::{GlobalSearch, SEARCH_INPUT};
pub use shortcuts::KeyboardShortcuts;
pub use sidebar::{Sidebar, SIDEBAR, SIDEBAR_OVERLAY};
pub use toast::Toaster;
pub use unread::{badge_label, UnreadBadge, UNREAD_BADGE};

#[cfg(test)]
pub(crate) use registration::tests::FakeRegistrar;

use crate::platform::Dom;

pub const DARK_MODE_CLASS: &str = "dark-mode";

/// The site ships dark only
pub fn apply_dark_mode(dom: &dyn Dom) {
    dom.body().add_class(DARK_MODE_CLASS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake;

    #[test]
    fn test_apply_dark_mode() {
        let (browser, handles) = fake::browser();
        apply_dark_mode(browser.dom.as_ref());
        apply_dark_mode(browser.dom.as_ref());
        assert_eq!(handles.dom.body_element().class_name(), "dark-mode");
    }
}
