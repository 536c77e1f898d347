//! Page Loading Bar
//!
//! A thin progress bar that creeps forward while the page loads. The growth
//! is simulated: it never passes 90% until the window `load` event.

use std::cell::Cell;
use std::rc::Rc;

use crate::platform::{Browser, Click, Element, Listener, PageEvent, Propagation, Scheduler, TimerId};

pub const PROGRESS_SELECTOR: &str = "#page-loader .progress";

const TICK_MS: u32 = 100;
const STEP: f64 = 10.0;
const CAP: f64 = 90.0;
const CLICK_PROGRESS: f64 = 30.0;
const FADE_DELAY_MS: u32 = 200;
const RESET_DELAY_MS: u32 = 300;

/// Uniform random number in `[0, 1)`
pub type RandomSource = Rc<dyn Fn() -> f64>;

pub struct LoadingBar {
    progress: Rc<dyn Element>,
    scheduler: Rc<dyn Scheduler>,
    width: Cell<f64>,
    ticker: Cell<Option<TimerId>>,
}

impl LoadingBar {
    /// Start the bar, or `None` when the page has no loader markup
    pub fn start(browser: &Browser, random: RandomSource) -> Option<Rc<Self>> {
        let progress = browser.dom.query(PROGRESS_SELECTOR)?;

        let bar = Rc::new(Self {
            progress,
            scheduler: Rc::clone(&browser.scheduler),
            width: Cell::new(0.0),
            ticker: Cell::new(None),
        });

        let weak = Rc::downgrade(&bar);
        let id = browser.scheduler.set_interval(
            TICK_MS,
            Box::new(move || {
                if let Some(bar) = weak.upgrade() {
                    bar.tick(random());
                }
            }),
        );
        bar.ticker.set(Some(id));
        Some(bar)
    }

    pub fn width(&self) -> f64 {
        self.width.get()
    }

    fn tick(&self, sample: f64) {
        let width = self.width.get();
        if width < CAP {
            let width = width + sample * STEP;
            self.width.set(width);
            self.show(width.min(CAP));
        }
    }

    fn show(&self, percent: f64) {
        self.progress.set_style("width", &format!("{}%", percent));
    }

    /// Page fully loaded: fill, fade out, then reset for the next navigation
    pub fn finish(&self) {
        if let Some(id) = self.ticker.take() {
            self.scheduler.clear_interval(id);
        }
        self.show(100.0);

        let progress = Rc::clone(&self.progress);
        let scheduler = Rc::clone(&self.scheduler);
        self.scheduler.set_timeout(
            FADE_DELAY_MS,
            Box::new(move || {
                progress.set_style("opacity", "0");
                scheduler.set_timeout(
                    RESET_DELAY_MS,
                    Box::new(move || {
                        progress.set_style("width", "0%");
                        progress.set_style("opacity", "1");
                    }),
                );
            }),
        );
    }

    /// Link clicks that start a same-tab navigation jump the bar forward
    pub fn on_click(&self, click: &Click) {
        let Some(link) = &click.link else { return };
        let Some(href) = &link.href else { return };

        if href.contains('#') || !link.target.is_empty() || click.modifiers.command() {
            return;
        }
        self.width.set(CLICK_PROGRESS);
        self.show(CLICK_PROGRESS);
    }
}

impl Listener for LoadingBar {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        match event {
            PageEvent::Load => self.finish(),
            PageEvent::Click(click) => self.on_click(click),
            _ => {}
        }
        Propagation::Continue
    }
}
