//! iOS install guide modal

use cloudstore::pwa::{GuidePresenter, InstallGuide, GUIDE_MODAL_ID};
use cloudstore::{PlatformError, PlatformResult};
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::Document;

use crate::web::js_error;

/// Three-step "Add to Home Screen" guide
#[component]
pub fn InstallGuideModal(guide: InstallGuide, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let steps = guide.steps.to_vec();

    view! {
        <div class="ios-install-backdrop" on:click=move |_| on_close.call(())>
            <div class="ios-install-dialog" on:click=|ev| ev.stop_propagation()>
                <div class="ios-install-header">
                    <img class="ios-install-icon" src=guide.icon alt="Cloudstore"/>
                    <h3>{guide.title}</h3>
                    <p>{guide.subtitle}</p>
                </div>

                <div class="ios-install-steps">
                    {steps
                        .into_iter()
                        .map(|step| view! {
                            <div class="ios-install-step">
                                <span class="ios-install-badge">{step.badge}</span>
                                <div>
                                    <p class="ios-install-step-title">{step.title}</p>
                                    <p class="ios-install-step-hint">{step.hint}</p>
                                </div>
                            </div>
                        })
                        .collect_view()}
                </div>

                <button class="ios-install-close" on:click=move |_| on_close.call(())>
                    {guide.dismiss_label}
                </button>
            </div>
        </div>
    }
}

/// Mounts [`InstallGuideModal`] into a fresh container on `<body>`
pub struct LeptosGuidePresenter {
    document: Document,
}

impl LeptosGuidePresenter {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl GuidePresenter for LeptosGuidePresenter {
    fn is_shown(&self) -> bool {
        self.document.get_element_by_id(GUIDE_MODAL_ID).is_some()
    }

    fn show(&self, guide: &InstallGuide) -> PlatformResult<()> {
        let body = self.document.body().ok_or(PlatformError::Unsupported("document.body"))?;
        let container = self.document.create_element("div").map_err(js_error)?;
        container.set_id(GUIDE_MODAL_ID);
        container.set_class_name("ios-install-modal");
        body.append_child(&container).map_err(js_error)?;

        let guide = guide.clone();
        let host = container.clone();
        mount_to(container.unchecked_into(), move || {
            view! { <InstallGuideModal guide=guide on_close=move |_: ()| host.remove()/> }
        });
        Ok(())
    }
}
