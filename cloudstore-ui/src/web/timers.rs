//! Timers and the local task queue

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use cloudstore::platform::{Scheduler, TimerId};
use futures_util::future::LocalBoxFuture;
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct WebScheduler {
    window: web_sys::Window,
    next_id: Cell<u64>,
    intervals: RefCell<HashMap<TimerId, Interval>>,
}

impl WebScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            next_id: Cell::new(1),
            intervals: RefCell::new(HashMap::new()),
        }
    }
}

impl Scheduler for WebScheduler {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, move || callback()).forget();
    }

    fn set_interval(&self, period_ms: u32, mut callback: Box<dyn FnMut()>) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let interval = Interval::new(period_ms, move || callback());
        self.intervals.borrow_mut().insert(id, interval);
        id
    }

    fn clear_interval(&self, id: TimerId) {
        // Dropping an Interval cancels it
        self.intervals.borrow_mut().remove(&id);
    }

    fn next_frame(&self, callback: Box<dyn FnOnce()>) {
        let frame = Closure::once_into_js(move || callback());
        let _ = self.window.request_animation_frame(frame.unchecked_ref());
    }

    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
