//! Page Transitions
//!
//! Fades the content region out when the user follows an internal link and
//! back in when the next page (or a back/forward cache restore) is shown.

use std::rc::Rc;

use url::Url;

use crate::loading_bar::PROGRESS_SELECTOR;
use crate::platform::{Browser, Click, Element, ElementSpec, Listener, PageEvent, Propagation};

pub const CONTENT_SELECTOR: &str = ".main-content, main, .content, .app-container";

const OVERLAY_CLASS: &str = "page-transition-overlay";
const SPINNER_CLASS: &str = "page-spinner";
const VISIBLE: &str = "visible";
const ACTIVE: &str = "active";

/// Delay between the exit animation starting and the navigation
pub const EXIT_DELAY_MS: u32 = 300;

/// Schemes that never leave through a page transition
const SKIPPED_SCHEMES: [&str; 3] = ["javascript:", "mailto:", "tel:"];

pub struct PageTransitions {
    browser: Browser,
    overlay: Option<Rc<dyn Element>>,
    spinner: Option<Rc<dyn Element>>,
}

impl PageTransitions {
    /// Append the overlay and spinner to the page
    pub fn new(browser: Browser) -> Self {
        let overlay = Self::create(&browser, ElementSpec::new("div").class(OVERLAY_CLASS));
        let spinner = Self::create(
            &browser,
            ElementSpec::new("div")
                .class(SPINNER_CLASS)
                .html(r#"<div class="spinner"></div>"#),
        );
        Self {
            browser,
            overlay,
            spinner,
        }
    }

    fn create(browser: &Browser, spec: ElementSpec) -> Option<Rc<dyn Element>> {
        match browser.dom.append_to_body(&spec) {
            Ok(el) => Some(el),
            Err(e) => {
                tracing::warn!(error = %e, class = ?spec.class_name, "Failed to create transition element");
                None
            }
        }
    }

    fn content(&self) -> Option<Rc<dyn Element>> {
        self.browser.dom.query(CONTENT_SELECTOR)
    }

    fn hide_spinner(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.remove_class(VISIBLE);
        }
        if let Some(overlay) = &self.overlay {
            overlay.remove_class(ACTIVE);
        }
    }

    /// Destination of a click this controller should animate, if any
    pub fn should_intercept(&self, click: &Click) -> Option<String> {
        let link = click.link.as_ref()?;
        let href = link.href.as_deref()?;

        if link.target == "_blank"
            || href.contains('#')
            || SKIPPED_SCHEMES.iter().any(|scheme| href.contains(scheme))
            || link.download
            || click.modifiers.command()
            || click.modifiers.shift
        {
            return None;
        }

        let url = Url::parse(href).ok()?;
        if url.origin().ascii_serialization() != self.browser.window.origin() {
            return None;
        }
        Some(href.to_string())
    }

    /// Fade the content out and start the loader; `navigate_to` is followed
    /// once the animation has run
    pub fn animate_exit(&self, navigate_to: Option<String>) {
        self.browser.style(PROGRESS_SELECTOR, "width", "30%");

        if let Some(spinner) = &self.spinner {
            spinner.add_class(VISIBLE);
        }

        if let Some(content) = self.content() {
            content.set_style(
                "transition",
                "opacity 0.3s ease, transform 0.3s ease, filter 0.3s ease",
            );
            content.set_style("opacity", "0.3");
            content.set_style("transform", "translateY(-10px) scale(0.99)");
            content.set_style("filter", "blur(3px)");
        }

        if let Some(href) = navigate_to {
            let window = Rc::clone(&self.browser.window);
            self.browser
                .scheduler
                .set_timeout(EXIT_DELAY_MS, Box::new(move || window.navigate(&href)));
        }
    }

    /// Slide the content in on the next animation frame
    pub fn animate_enter(&self) {
        let Some(content) = self.content() else { return };
        content.set_style("opacity", "0");
        content.set_style("transform", "translateY(30px)");

        self.browser.scheduler.next_frame(Box::new(move || {
            content.set_style("transition", "opacity 0.5s ease, transform 0.5s ease");
            content.set_style("opacity", "1");
            content.set_style("transform", "translateY(0)");
        }));
    }

    fn on_load(&self) {
        self.hide_spinner();
        if let Some(content) = self.content() {
            content.set_style("opacity", "");
            content.set_style("transform", "");
            content.set_style("filter", "");
        }
    }

    /// Restored from the back/forward cache with the exit animation frozen
    fn on_restore(&self) {
        self.hide_spinner();
        if let Some(content) = self.content() {
            content.set_style("opacity", "1");
            content.set_style("transform", "translateY(0)");
            content.set_style("filter", "none");
        }
        self.browser.style(PROGRESS_SELECTOR, "width", "0%");
    }
}

impl Listener for PageTransitions {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        match event {
            PageEvent::Click(click) => {
                if let Some(href) = self.should_intercept(click) {
                    tracing::debug!(%href, "Animating page exit");
                    self.animate_exit(Some(href));
                    return Propagation::PreventDefault;
                }
            }
            PageEvent::PopState => self.animate_exit(None),
            PageEvent::Load => self.on_load(),
            PageEvent::PageShow { persisted: true } => self.on_restore(),
            _ => {}
        }
        Propagation::Continue
    }
}
