//! Page Assembly
//!
//! Builds every component for one page and subscribes it to the event bus in
//! the order the page scripts load: chrome, loading bar, transitions, install
//! flow, food diary.

use std::rc::Rc;

use crate::api::HttpClient;
use crate::chrome::{
    apply_dark_mode, register_service_worker, GlobalSearch, KeyboardShortcuts, LazyImages, PullToRefresh,
    RevealOnScroll, Sidebar, SwipeGesture, Toaster, UnreadBadge, WorkerRegistrar,
};
use crate::config::{ClientConfig, Config};
use crate::food_diary::FoodDiary;
use crate::loading_bar::{LoadingBar, RandomSource};
use crate::platform::{Browser, EventBus, PageEvent, Propagation, TimerId, VisibilityObserver};
use crate::pwa::{GuidePresenter, InstallController};
use crate::transitions::PageTransitions;

/// Browser capabilities beyond the basic [`Browser`] bundle
pub struct Services {
    pub browser: Browser,
    pub http: Rc<dyn HttpClient>,
    pub observer: Rc<dyn VisibilityObserver>,
    pub registrar: Rc<dyn WorkerRegistrar>,
    pub presenter: Rc<dyn GuidePresenter>,
    pub random: RandomSource,
}

/// Every component of a booted page
pub struct App {
    pub browser: Browser,
    pub bus: EventBus,
    pub sidebar: Rc<Sidebar>,
    pub search: Rc<GlobalSearch>,
    pub toaster: Rc<Toaster>,
    pub unread: Rc<UnreadBadge>,
    pub reveal: Rc<RevealOnScroll>,
    pub loading_bar: Option<Rc<LoadingBar>>,
    pub transitions: Rc<PageTransitions>,
    pub install: Rc<InstallController>,
    pub food_diary: Rc<FoodDiary>,
    pub unread_timer: Option<TimerId>,
}

impl App {
    /// Build and start every component
    pub fn boot(config: &Config, services: Services) -> Rc<Self> {
        let Services {
            browser,
            http,
            observer,
            registrar,
            presenter,
            random,
        } = services;
        let client: &ClientConfig = &config.client;
        let bus = EventBus::new();

        apply_dark_mode(browser.dom.as_ref());

        let sidebar = Rc::new(Sidebar::new(Rc::clone(&browser.dom)));
        let search = Rc::new(GlobalSearch::new(browser.clone(), &client.search_url));
        let toaster = Rc::new(Toaster::new(browser.clone(), client.toast_duration_ms));

        let unread = Rc::new(UnreadBadge::new(
            Rc::clone(&browser.dom),
            Rc::clone(&http),
            &client.online_status_url,
        ));
        let unread_timer = if unread.is_present() {
            unread.start_polling(Rc::clone(&browser.scheduler), client.unread_poll_secs)
        } else {
            None
        };

        bus.subscribe(Rc::new(SwipeGesture::new(Rc::clone(&sidebar), &client.gestures)));
        bus.subscribe(Rc::new(KeyboardShortcuts::new(Rc::clone(&sidebar), Rc::clone(&search))));
        bus.subscribe(Rc::new(PullToRefresh::new(browser.clone(), &client.gestures)));

        let sw = &config.service_worker;
        let (script_url, scope) = (sw.script_url.clone(), sw.scope.clone());
        browser.scheduler.spawn(Box::pin(async move {
            register_service_worker(registrar.as_ref(), &script_url, &scope).await;
        }));

        let reveal = Rc::new(RevealOnScroll::new(Rc::clone(&browser.dom), observer));
        bus.subscribe(reveal.clone());
        bus.subscribe(Rc::new(LazyImages::new(Rc::clone(&browser.dom))));

        let loading_bar = LoadingBar::start(&browser, random);
        if let Some(bar) = &loading_bar {
            bus.subscribe(bar.clone());
        }

        let transitions = Rc::new(PageTransitions::new(browser.clone()));
        bus.subscribe(transitions.clone());

        let install = Rc::new(InstallController::new(
            browser.clone(),
            presenter,
            client.banner_snooze_days,
        ));
        install.init();
        bus.subscribe(install.clone());

        let food_diary = Rc::new(FoodDiary::new(
            browser.clone(),
            http,
            &client.delete_intake_url,
            &client.csrf_cookie,
        ));
        bus.subscribe(food_diary.clone());

        tracing::info!(listeners = bus.len(), "Page booted");

        Rc::new(Self {
            browser,
            bus,
            sidebar,
            search,
            toaster,
            unread,
            reveal,
            loading_bar,
            transitions,
            install,
            food_diary,
            unread_timer,
        })
    }

    pub fn dispatch(&self, event: &PageEvent) -> Propagation {
        self.bus.dispatch(event)
    }

    pub fn check_unread_messages(&self) {
        let unread = Rc::clone(&self.unread);
        self.browser
            .scheduler
            .spawn(Box::pin(async move { unread.check().await }));
    }

    pub fn install_app(&self) {
        let install = Rc::clone(&self.install);
        self.browser
            .scheduler
            .spawn(Box::pin(async move { install.install_app().await }));
    }

    pub fn delete_intake(&self, id: u64) {
        let diary = Rc::clone(&self.food_diary);
        self.browser.scheduler.spawn(Box::pin(async move {
            diary.delete_intake(id).await;
        }));
    }
}
