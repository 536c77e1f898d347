//! iOS Install Guide
//!
//! Safari on iOS has no install prompt, so the user gets a three-step guide
//! to "Add to Home Screen" instead.

use std::rc::Rc;

use crate::platform::{Dom, ElementSpec, PlatformResult};

pub const GUIDE_MODAL_ID: &str = "iosInstallModal";

#[derive(Debug, Clone, PartialEq)]
pub struct GuideStep {
    pub badge: &'static str,
    pub title: &'static str,
    pub hint: &'static str,
}

/// Content of the install guide modal
#[derive(Debug, Clone, PartialEq)]
pub struct InstallGuide {
    pub icon: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub steps: [GuideStep; 3],
    pub dismiss_label: &'static str,
}

impl Default for InstallGuide {
    fn default() -> Self {
        Self {
            icon: "/static/icons/icon-96x96.png",
            title: "Cloudstore ilovasini o'rnatish",
            subtitle: "Tezkor kirish uchun bosh ekranga qo'shing",
            steps: [
                GuideStep {
                    badge: "1",
                    title: "Safari pastida",
                    hint: "Share tugmasini bosing",
                },
                GuideStep {
                    badge: "2",
                    title: "Pastga suring",
                    hint: "Add to Home Screen",
                },
                GuideStep {
                    badge: "✓",
                    title: "Add tugmasini bosing",
                    hint: "Ilova bosh ekranda paydo bo'ladi",
                },
            ],
            dismiss_label: "Tushunarli",
        }
    }
}

impl InstallGuide {
    /// Static markup for the modal; the backdrop and button remove it
    pub fn to_markup(&self) -> String {
        let steps: String = self
            .steps
            .iter()
            .map(|step| {
                format!(
                    r#"<div class="ios-install-step"><div class="ios-install-badge">{}</div><div><p class="ios-install-step-title">{}</p><p class="ios-install-step-hint">{}</p></div></div>"#,
                    step.badge, step.title, step.hint
                )
            })
            .collect();

        format!(
            concat!(
                r#"<div class="ios-install-backdrop" onclick="this.parentElement.remove()">"#,
                r#"<div class="ios-install-dialog" onclick="event.stopPropagation()">"#,
                r#"<div class="ios-install-header"><img src="{icon}" alt=""><h3>{title}</h3><p>{subtitle}</p></div>"#,
                r#"<div class="ios-install-steps">{steps}</div>"#,
                r#"<button class="ios-install-close" onclick="this.closest('#{id}').remove()">{dismiss}</button>"#,
                r#"</div></div>"#
            ),
            icon = self.icon,
            title = self.title,
            subtitle = self.subtitle,
            steps = steps,
            id = GUIDE_MODAL_ID,
            dismiss = self.dismiss_label,
        )
    }
}

/// Renders the install guide; at most one is on screen
pub trait GuidePresenter {
    fn is_shown(&self) -> bool;

    fn show(&self, guide: &InstallGuide) -> PlatformResult<()>;
}

/// Presenter that appends the static markup to `<body>`
pub struct MarkupGuidePresenter {
    dom: Rc<dyn Dom>,
}

impl MarkupGuidePresenter {
    pub fn new(dom: Rc<dyn Dom>) -> Self {
        Self { dom }
    }
}

impl GuidePresenter for MarkupGuidePresenter {
    fn is_shown(&self) -> bool {
        self.dom.query(&format!("#{}", GUIDE_MODAL_ID)).is_some()
    }

    fn show(&self, guide: &InstallGuide) -> PlatformResult<()> {
        let spec = ElementSpec::new("div").id(GUIDE_MODAL_ID).html(&guide.to_markup());
        self.dom.append_to_body(&spec)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake;

    #[test]
    fn test_markup_contains_steps_and_dismissal() {
        let markup = InstallGuide::default().to_markup();

        assert!(markup.contains("Share tugmasini bosing"));
        assert!(markup.contains("Add to Home Screen"));
        assert!(markup.contains("Tushunarli"));
        assert!(markup.contains("this.closest('#iosInstallModal').remove()"));
        assert_eq!(markup.matches("ios-install-step\"").count(), 3);
    }

    #[test]
    fn test_markup_presenter_appends_modal() {
        let (browser, handles) = fake::browser();
        let presenter = MarkupGuidePresenter::new(browser.dom.clone());

        assert!(!presenter.is_shown());
        presenter.show(&InstallGuide::default()).unwrap();
        assert!(presenter.is_shown());
        assert_eq!(handles.dom.created("#iosInstallModal").len(), 1);
    }
}
