//! Progressive Web App Install
//!
//! Captures the browser's deferred install prompt, offers it through the
//! banner and install buttons, and falls back to a manual guide on iOS.

mod guide;
mod install;

pub use guide::{GuidePresenter, GuideStep, InstallGuide, MarkupGuidePresenter, GUIDE_MODAL_ID};
pub use install::{
    InstallController, APP_INSTALLED_KEY, BANNER_CLOSED_KEY, HERO_INSTALL_BUTTON, INSTALL_BANNER,
    SIDEBAR_INSTALL_BUTTON,
};

use async_trait::async_trait;

use crate::platform::PlatformResult;

/// The user's answer to the native install prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    /// Parse `userChoice.outcome`
    pub fn from_choice(outcome: &str) -> Self {
        if outcome == "accepted" {
            InstallOutcome::Accepted
        } else {
            InstallOutcome::Dismissed
        }
    }
}

/// A deferred `beforeinstallprompt` event; prompting consumes it
#[async_trait(?Send)]
pub trait InstallPrompt {
    async fn prompt(&self) -> PlatformResult<InstallOutcome>;
}
