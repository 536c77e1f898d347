//! In-memory browser used by the unit tests
//!
//! Elements are registered under the exact selector the component queries;
//! elements created through `append_to_body` are also found by `#id`, `.class`
//! or tag name. Time only moves when a test calls `advance`.

use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use futures_util::task::noop_waker_ref;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::task::{Context, Poll};

use super::*;
use crate::api::{ApiError, ApiResult, HttpClient};

pub(crate) struct FakeElement {
    pub tag: String,
    pub id: RefCell<Option<String>>,
    class_name: RefCell<String>,
    styles: RefCell<HashMap<String, String>>,
    text: RefCell<String>,
    html: RefCell<String>,
    attrs: RefCell<HashMap<String, String>>,
    value: RefCell<String>,
    removed: Cell<bool>,
    focused: Cell<bool>,
    complete: Cell<bool>,
    onclick_cleared: Cell<bool>,
    load_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: RefCell::new(None),
            class_name: RefCell::new(String::new()),
            styles: RefCell::new(HashMap::new()),
            text: RefCell::new(String::new()),
            html: RefCell::new(String::new()),
            attrs: RefCell::new(HashMap::new()),
            value: RefCell::new(String::new()),
            removed: Cell::new(false),
            focused: Cell::new(false),
            complete: Cell::new(true),
            onclick_cleared: Cell::new(false),
            load_callbacks: RefCell::new(Vec::new()),
        }
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn html(&self) -> String {
        self.html.borrow().clone()
    }

    pub fn class_name(&self) -> String {
        self.class_name.borrow().clone()
    }

    pub fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.attrs.borrow_mut().insert(name.to_string(), value.to_string());
    }

    pub fn set_complete(&self, complete: bool) {
        self.complete.set(complete);
    }

    pub fn is_removed(&self) -> bool {
        self.removed.get()
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn onclick_cleared(&self) -> bool {
        self.onclick_cleared.get()
    }

    /// Fire the element's `load` event
    pub fn fire_load(&self) {
        let callbacks: Vec<_> = self.load_callbacks.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.id.borrow().as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.has_class(class)
        } else {
            self.tag == selector
        }
    }
}

impl Element for FakeElement {
    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            let mut name = self.class_name.borrow_mut();
            if !name.is_empty() {
                name.push(' ');
            }
            name.push_str(class);
        }
    }

    fn remove_class(&self, class: &str) {
        let remaining: Vec<String> = self
            .class_name
            .borrow()
            .split_whitespace()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        *self.class_name.borrow_mut() = remaining.join(" ");
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_name.borrow().split_whitespace().any(|c| c == class)
    }

    fn set_class_name(&self, class_name: &str) {
        *self.class_name.borrow_mut() = class_name.to_string();
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut styles = self.styles.borrow_mut();
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn set_inner_html(&self, html: &str) {
        *self.html.borrow_mut() = html.to_string();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attrs.borrow().get(name).cloned()
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn focus(&self) {
        self.focused.set(true);
    }

    fn remove(&self) {
        self.removed.set(true);
    }

    fn clear_onclick(&self) {
        self.onclick_cleared.set(true);
    }

    fn is_complete(&self) -> bool {
        self.complete.get()
    }

    fn on_load(&self, callback: Box<dyn FnOnce()>) {
        self.load_callbacks.borrow_mut().push(callback);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) struct FakeDom {
    registered: RefCell<Vec<(String, Rc<FakeElement>)>>,
    created: RefCell<Vec<Rc<FakeElement>>>,
    body: Rc<FakeElement>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self {
            registered: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
            body: Rc::new(FakeElement::new("body")),
        }
    }

    /// Register an element under the selector a component looks it up by
    pub fn insert(&self, selector: &str, tag: &str) -> Rc<FakeElement> {
        let el = Rc::new(FakeElement::new(tag));
        if let Some(id) = selector.strip_prefix('#') {
            if !id.contains(' ') {
                *el.id.borrow_mut() = Some(id.to_string());
            }
        }
        self.registered
            .borrow_mut()
            .push((selector.to_string(), Rc::clone(&el)));
        el
    }

    pub fn body_element(&self) -> Rc<FakeElement> {
        Rc::clone(&self.body)
    }

    /// Elements created by components and still attached
    pub fn created(&self, selector: &str) -> Vec<Rc<FakeElement>> {
        self.created
            .borrow()
            .iter()
            .filter(|el| !el.is_removed() && el.matches(selector))
            .cloned()
            .collect()
    }

    fn find_all(&self, selector: &str) -> Vec<Rc<FakeElement>> {
        let mut found: Vec<Rc<FakeElement>> = self
            .registered
            .borrow()
            .iter()
            .filter(|(sel, el)| sel == selector && !el.is_removed())
            .map(|(_, el)| Rc::clone(el))
            .collect();
        found.extend(self.created(selector));
        found
    }
}

impl Dom for FakeDom {
    fn query(&self, selector: &str) -> Option<Rc<dyn Element>> {
        self.find_all(selector)
            .into_iter()
            .next()
            .map(|el| el as Rc<dyn Element>)
    }

    fn query_all(&self, selector: &str) -> Vec<Rc<dyn Element>> {
        self.find_all(selector)
            .into_iter()
            .map(|el| el as Rc<dyn Element>)
            .collect()
    }

    fn body(&self) -> Rc<dyn Element> {
        Rc::clone(&self.body) as Rc<dyn Element>
    }

    fn append_to_body(&self, spec: &ElementSpec) -> PlatformResult<Rc<dyn Element>> {
        let el = Rc::new(FakeElement::new(&spec.tag));
        *el.id.borrow_mut() = spec.id.clone();
        if let Some(class_name) = &spec.class_name {
            el.set_class_name(class_name);
        }
        if let Some(text) = &spec.text {
            el.set_text(text);
        }
        if let Some(html) = &spec.inner_html {
            el.set_inner_html(html);
        }
        self.created.borrow_mut().push(Rc::clone(&el));
        Ok(el as Rc<dyn Element>)
    }
}

pub(crate) struct FakeWindow {
    pub navigations: RefCell<Vec<String>>,
    pub reloads: Cell<u32>,
    pub scroll_y: Cell<f64>,
    pub confirm_answer: Cell<bool>,
    pub confirmations: RefCell<Vec<String>>,
    pub origin: RefCell<String>,
    pub user_agent: RefCell<String>,
    pub cookie: RefCell<String>,
    pub standalone_media: Cell<bool>,
    pub ios_standalone: Cell<bool>,
}

impl FakeWindow {
    pub fn new() -> Self {
        Self {
            navigations: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
            scroll_y: Cell::new(0.0),
            confirm_answer: Cell::new(true),
            confirmations: RefCell::new(Vec::new()),
            origin: RefCell::new("https://cloudstore.uz".to_string()),
            user_agent: RefCell::new(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36"
                    .to_string(),
            ),
            cookie: RefCell::new(String::new()),
            standalone_media: Cell::new(false),
            ios_standalone: Cell::new(false),
        }
    }
}

impl Window for FakeWindow {
    fn navigate(&self, href: &str) {
        self.navigations.borrow_mut().push(href.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirmations.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }

    fn origin(&self) -> String {
        self.origin.borrow().clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.borrow().clone()
    }

    fn cookie(&self) -> String {
        self.cookie.borrow().clone()
    }

    fn matches_media(&self, query: &str) -> bool {
        query == "(display-mode: standalone)" && self.standalone_media.get()
    }

    fn is_ios_standalone(&self) -> bool {
        self.ios_standalone.get()
    }
}

#[derive(Default)]
pub(crate) struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

enum Job {
    Once(Box<dyn FnOnce()>),
    Repeat(Box<dyn FnMut()>, u32),
}

struct Scheduled {
    due: i64,
    seq: u64,
    id: u64,
    job: Job,
}

/// Virtual clock; callbacks run only inside `advance`
pub(crate) struct ManualScheduler {
    now: Cell<i64>,
    seq: Cell<u64>,
    queue: RefCell<Vec<Scheduled>>,
    cancelled: RefCell<HashSet<u64>>,
    pending: RefCell<VecDeque<LocalBoxFuture<'static, ()>>>,
}

impl ManualScheduler {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Cell::new(start_ms),
            seq: Cell::new(0),
            queue: RefCell::new(Vec::new()),
            cancelled: RefCell::new(HashSet::new()),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    fn next_seq(&self) -> u64 {
        let seq = self.seq.get() + 1;
        self.seq.set(seq);
        seq
    }

    fn push(&self, due: i64, id: u64, job: Job) {
        let seq = self.next_seq();
        self.queue.borrow_mut().push(Scheduled { due, seq, id, job });
    }

    /// Number of timers still queued
    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward, firing every timer that falls due
    pub fn advance(&self, ms: i64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let queue = self.queue.borrow();
                queue
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due <= target)
                    .min_by_key(|(_, s)| (s.due, s.seq))
                    .map(|(i, _)| i)
            };
            let Some(index) = next else { break };
            let scheduled = self.queue.borrow_mut().remove(index);
            self.now.set(scheduled.due);

            match scheduled.job {
                Job::Once(callback) => callback(),
                Job::Repeat(mut callback, period) => {
                    if self.cancelled.borrow().contains(&scheduled.id) {
                        continue;
                    }
                    callback();
                    if !self.cancelled.borrow().contains(&scheduled.id) {
                        self.push(
                            scheduled.due + i64::from(period),
                            scheduled.id,
                            Job::Repeat(callback, period),
                        );
                    }
                }
            }
            self.run_tasks();
        }
        self.now.set(target);
        self.run_tasks();
    }

    /// Poll spawned tasks until none can make progress
    pub fn run_tasks(&self) {
        let mut cx = Context::from_waker(noop_waker_ref());
        loop {
            let tasks: Vec<_> = self.pending.borrow_mut().drain(..).collect();
            if tasks.is_empty() {
                return;
            }
            let mut still_pending = Vec::new();
            let mut progressed = false;
            for mut task in tasks {
                match task.as_mut().poll(&mut cx) {
                    Poll::Ready(()) => progressed = true,
                    Poll::Pending => still_pending.push(task),
                }
            }
            let spawned_more = !self.pending.borrow().is_empty();
            self.pending.borrow_mut().extend(still_pending);
            if !progressed && !spawned_more {
                return;
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        let id = self.next_seq();
        self.push(self.now.get() + i64::from(delay_ms), id, Job::Once(callback));
    }

    fn set_interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerId {
        let id = self.next_seq();
        self.push(
            self.now.get() + i64::from(period_ms),
            id,
            Job::Repeat(callback, period_ms),
        );
        TimerId(id)
    }

    fn clear_interval(&self, id: TimerId) {
        self.cancelled.borrow_mut().insert(id.0);
        self.queue.borrow_mut().retain(|s| s.id != id.0);
    }

    fn next_frame(&self, callback: Box<dyn FnOnce()>) {
        self.set_timeout(16, callback);
    }

    fn now_ms(&self) -> i64 {
        self.now.get()
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.pending.borrow_mut().push_back(task);
        self.run_tasks();
    }
}

#[derive(Default)]
pub(crate) struct FakeObserver {
    pub observed: Cell<usize>,
    pub unobserved: Cell<usize>,
}

impl VisibilityObserver for FakeObserver {
    fn observe(&self, _element: &Rc<dyn Element>) {
        self.observed.set(self.observed.get() + 1);
    }

    fn unobserve(&self, _element: &Rc<dyn Element>) {
        self.unobserved.set(self.unobserved.get() + 1);
    }
}

/// Canned HTTP responses keyed by URL
#[derive(Default)]
pub(crate) struct FakeHttp {
    responses: RefCell<HashMap<String, ApiResult<String>>>,
    pub requests: RefCell<Vec<(String, String, Vec<(String, String)>)>>,
}

impl FakeHttp {
    pub fn respond(&self, url: &str, body: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), Ok(body.to_string()));
    }

    pub fn fail(&self, url: &str) {
        self.responses.borrow_mut().insert(
            url.to_string(),
            Err(ApiError::Network("connection refused".to_string())),
        );
    }

    fn answer(&self, method: &str, url: &str, headers: &[(String, String)]) -> ApiResult<String> {
        self.requests
            .borrow_mut()
            .push((method.to_string(), url.to_string(), headers.to_vec()));
        self.responses
            .borrow()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Network(format!("no route to {}", url))))
    }
}

#[async_trait(?Send)]
impl HttpClient for FakeHttp {
    async fn get(&self, url: &str) -> ApiResult<String> {
        self.answer("GET", url, &[])
    }

    async fn post(&self, url: &str, headers: &[(String, String)]) -> ApiResult<String> {
        self.answer("POST", url, headers)
    }
}

/// Concrete handles behind a fake `Browser`
pub(crate) struct Handles {
    pub dom: Rc<FakeDom>,
    pub window: Rc<FakeWindow>,
    pub storage: Rc<MemoryStorage>,
    pub scheduler: Rc<ManualScheduler>,
}

/// Fresh fake browser with the clock at 2024-01-15T10:30:00Z
pub(crate) fn browser() -> (Browser, Handles) {
    let dom = Rc::new(FakeDom::new());
    let window = Rc::new(FakeWindow::new());
    let storage = Rc::new(MemoryStorage::default());
    let scheduler = Rc::new(ManualScheduler::new(1_705_314_600_000));

    let browser = Browser::new(
        Rc::clone(&dom) as Rc<dyn Dom>,
        Rc::clone(&window) as Rc<dyn Window>,
        Rc::clone(&storage) as Rc<dyn Storage>,
        Rc::clone(&scheduler) as Rc<dyn Scheduler>,
    );

    (
        browser,
        Handles {
            dom,
            window,
            storage,
            scheduler,
        },
    )
}
