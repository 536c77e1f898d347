//! Leptos components

mod install_modal;

pub use install_modal::{InstallGuideModal, LeptosGuidePresenter};
