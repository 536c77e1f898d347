//! Toast Notifications
//!
//! Short-lived message bubble. Only one toast exists at a time: showing a new
//! one removes whatever is on screen.

use crate::platform::{Browser, ElementSpec};

const TOAST_CLASS: &str = "toast";
const SHOW_CLASS: &str = "show";

/// Delay before the fade-in class is added
const FADE_IN_DELAY_MS: u32 = 10;
/// Fade-out transition length
const FADE_OUT_MS: u32 = 300;

pub struct Toaster {
    browser: Browser,
    default_duration_ms: u32,
}

impl Toaster {
    pub fn new(browser: Browser, default_duration_ms: u32) -> Self {
        Self {
            browser,
            default_duration_ms,
        }
    }

    /// Show `message` for `duration_ms` (default when `None`)
    pub fn show(&self, message: &str, duration_ms: Option<u32>) {
        let duration = duration_ms.unwrap_or(self.default_duration_ms);
        let dom = &self.browser.dom;

        for existing in dom.query_all(&format!(".{}", TOAST_CLASS)) {
            existing.remove();
        }

        let toast = match dom.append_to_body(&ElementSpec::new("div").class(TOAST_CLASS).text(message)) {
            Ok(toast) => toast,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create toast");
                return;
            }
        };

        let scheduler = &self.browser.scheduler;

        let fade_in = toast.clone();
        scheduler.set_timeout(FADE_IN_DELAY_MS, Box::new(move || fade_in.add_class(SHOW_CLASS)));

        let fade_out = toast;
        let later = scheduler.clone();
        scheduler.set_timeout(
            duration,
            Box::new(move || {
                fade_out.remove_class(SHOW_CLASS);
                later.set_timeout(FADE_OUT_MS, Box::new(move || fade_out.remove()));
            }),
        );
    }
}
