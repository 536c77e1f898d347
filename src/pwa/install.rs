//! Install Controller

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use super::guide::{GuidePresenter, InstallGuide};
use super::{InstallOutcome, InstallPrompt};
use crate::platform::{Browser, Listener, PageEvent, Propagation};

pub const INSTALL_BANNER: &str = "#installBanner";
pub const SIDEBAR_INSTALL_BUTTON: &str = "#sidebarInstallBtn";
pub const HERO_INSTALL_BUTTON: &str = "#heroInstallBtn";

pub const APP_INSTALLED_KEY: &str = "appInstalled";
pub const BANNER_CLOSED_KEY: &str = "installBannerClosed";

const IOS_PATTERN: &str = "iPhone|iPad|iPod";
const STANDALONE_QUERY: &str = "(display-mode: standalone)";
const INSTALLED_BACKGROUND: &str = "linear-gradient(135deg, #22c55e, #16a34a)";
const INSTALLED_LABEL: &str = r#"<i class="fas fa-check-circle"></i> O'rnatilgan"#;
const HERO_MARK_DELAY_MS: u32 = 100;

pub struct InstallController {
    browser: Browser,
    presenter: Rc<dyn GuidePresenter>,
    guide: InstallGuide,
    deferred: RefCell<Option<Rc<dyn InstallPrompt>>>,
    snooze_days: u32,
}

impl InstallController {
    pub fn new(browser: Browser, presenter: Rc<dyn GuidePresenter>, snooze_days: u32) -> Self {
        Self {
            browser,
            presenter,
            guide: InstallGuide::default(),
            deferred: RefCell::new(None),
            snooze_days,
        }
    }

    /// Boot-time checks: iOS install buttons and the installed indicator
    pub fn init(&self) {
        let window = &self.browser.window;

        if is_ios(&window.user_agent()) && !window.is_ios_standalone() {
            self.browser.style(SIDEBAR_INSTALL_BUTTON, "display", "flex");
            self.browser.style(HERO_INSTALL_BUTTON, "display", "inline-flex");
        }

        if self.is_installed() {
            let browser = self.browser.clone();
            self.browser.scheduler.set_timeout(
                HERO_MARK_DELAY_MS,
                Box::new(move || mark_hero_installed(&browser)),
            );
        }
    }

    pub fn is_installed(&self) -> bool {
        self.browser.storage.get(APP_INSTALLED_KEY).as_deref() == Some("true")
            || self.browser.window.matches_media(STANDALONE_QUERY)
    }

    pub fn has_prompt(&self) -> bool {
        self.deferred.borrow().is_some()
    }

    /// Keep the deferred prompt and reveal the install UI
    pub fn capture_prompt(&self, prompt: Rc<dyn InstallPrompt>) {
        *self.deferred.borrow_mut() = Some(prompt);

        if self.banner_snoozed() {
            tracing::debug!("Install banner snoozed");
        } else {
            self.browser.style(INSTALL_BANNER, "display", "flex");
        }
        self.browser.style(SIDEBAR_INSTALL_BUTTON, "display", "flex");
        self.browser.style(HERO_INSTALL_BUTTON, "display", "inline-flex");
    }

    /// Whether the banner was closed within the snooze window
    pub fn banner_snoozed(&self) -> bool {
        let Some(closed_at) = self
            .browser
            .storage
            .get(BANNER_CLOSED_KEY)
            .and_then(|v| v.trim().parse::<i64>().ok())
        else {
            return false;
        };
        let window = Duration::days(i64::from(self.snooze_days)).num_milliseconds();
        // Future or out-of-range timestamps never snooze
        match self.browser.scheduler.now_ms().checked_sub(closed_at) {
            Some(elapsed) => (0..window).contains(&elapsed),
            None => false,
        }
    }

    /// Prompt with the deferred event, or show the iOS guide without one
    pub async fn install_app(&self) {
        let prompt = self.deferred.borrow_mut().take();
        let Some(prompt) = prompt else {
            self.show_ios_install_modal();
            return;
        };

        match prompt.prompt().await {
            Ok(InstallOutcome::Accepted) => {
                tracing::info!("Install prompt accepted");
                self.hide_install_buttons();
            }
            Ok(InstallOutcome::Dismissed) => tracing::info!("Install prompt dismissed"),
            Err(e) => tracing::warn!(error = %e, "Install prompt failed"),
        }
    }

    pub fn show_ios_install_modal(&self) {
        if self.browser.window.is_ios_standalone() || self.presenter.is_shown() {
            return;
        }
        if let Err(e) = self.presenter.show(&self.guide) {
            tracing::warn!(error = %e, "Failed to show install guide");
        }
    }

    pub fn hide_install_buttons(&self) {
        self.browser.style(INSTALL_BANNER, "display", "none");
        self.browser.style(SIDEBAR_INSTALL_BUTTON, "display", "none");
        mark_hero_installed(&self.browser);
        self.browser.storage.set(APP_INSTALLED_KEY, "true");
    }

    pub fn close_install_banner(&self) {
        if self.browser.style(INSTALL_BANNER, "display", "none") {
            let now = self.browser.scheduler.now_ms();
            self.browser.storage.set(BANNER_CLOSED_KEY, &now.to_string());
        }
    }
}

impl Listener for InstallController {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        match event {
            PageEvent::BeforeInstallPrompt(prompt) => {
                self.capture_prompt(Rc::clone(prompt));
                Propagation::PreventDefault
            }
            PageEvent::AppInstalled => {
                self.hide_install_buttons();
                Propagation::Continue
            }
            _ => Propagation::Continue,
        }
    }
}

fn ios_regex() -> Option<&'static Regex> {
    static IOS: OnceLock<Option<Regex>> = OnceLock::new();
    IOS.get_or_init(|| Regex::new(IOS_PATTERN).ok()).as_ref()
}

fn is_ios(user_agent: &str) -> bool {
    ios_regex().is_some_and(|re| re.is_match(user_agent))
}

/// Turn the hero install button into an "installed" indicator
fn mark_hero_installed(browser: &Browser) {
    let Some(hero) = browser.dom.query(HERO_INSTALL_BUTTON) else {
        return;
    };
    hero.clear_onclick();
    hero.set_style("background", INSTALLED_BACKGROUND);
    hero.set_style("cursor", "default");
    hero.set_inner_html(INSTALLED_LABEL);
}
