//! Food Diary
//!
//! Delete button for logged meals and the daily calorie ring.

use std::f64::consts::PI;
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::api::{self, HttpClient};
use crate::platform::{Browser, Listener, PageEvent, Propagation};

pub const STATUS_TOAST: &str = "#toast";
pub const CALORIES_RING: &str = "#caloriesRing";

const RING_RADIUS: f64 = 75.0;
const LEADING_NUMBER: &str = r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?";
const RING_DELAY_MS: u32 = 100;
const RELOAD_DELAY_MS: u32 = 500;
const STATUS_TOAST_MS: u32 = 3000;

const CONFIRM_DELETE: &str = "O'chirmoqchimisiz?";
const DELETED: &str = "O'chirildi!";
const DELETE_FAILED: &str = "Xatolik";
const SERVER_ERROR: &str = "Server xatosi";

/// Look up a cookie value in a raw `document.cookie` string
pub fn csrf_token(cookie: &str, name: &str) -> String {
    let prefix = format!("{}=", name);
    cookie
        .split(';')
        .map(str::trim)
        .find(|entry| entry.starts_with(&prefix))
        .and_then(|entry| entry.split('=').nth(1))
        .unwrap_or_default()
        .to_string()
}

/// Numeric prefix of an attribute value, so `"50%"` reads as 50
pub fn leading_number(value: &str) -> Option<f64> {
    static NUMBER: OnceLock<Option<Regex>> = OnceLock::new();
    let re = NUMBER.get_or_init(|| Regex::new(LEADING_NUMBER).ok()).as_ref()?;
    re.find(value.trim_start())?.as_str().parse().ok()
}

/// `stroke-dashoffset` leaving `progress` percent of the ring drawn
pub fn ring_offset(progress: f64) -> f64 {
    let circumference = 2.0 * PI * RING_RADIUS;
    circumference - (progress / 100.0) * circumference
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Error,
}

impl ToastVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastVariant::Success => "success",
            ToastVariant::Error => "error",
        }
    }
}

/// How a delete request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation
    Cancelled,
    Deleted,
    /// The server refused, with the message shown to the user
    Rejected(String),
    /// Transport or parse failure
    Failed,
}

pub struct FoodDiary {
    browser: Browser,
    http: Rc<dyn HttpClient>,
    delete_url: String,
    csrf_cookie: String,
}

impl FoodDiary {
    pub fn new(browser: Browser, http: Rc<dyn HttpClient>, delete_url: &str, csrf_cookie: &str) -> Self {
        Self {
            browser,
            http,
            delete_url: delete_url.to_string(),
            csrf_cookie: csrf_cookie.to_string(),
        }
    }

    /// Confirm, delete the record and report the result
    pub async fn delete_intake(&self, id: u64) -> DeleteOutcome {
        if !self.browser.window.confirm(CONFIRM_DELETE) {
            return DeleteOutcome::Cancelled;
        }

        let token = csrf_token(&self.browser.window.cookie(), &self.csrf_cookie);
        let outcome = match api::delete_food_intake(self.http.as_ref(), &self.delete_url, id, &token).await {
            Ok(response) if response.success => DeleteOutcome::Deleted,
            Ok(response) => DeleteOutcome::Rejected(
                response
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| DELETE_FAILED.to_string()),
            ),
            Err(e) => {
                tracing::warn!(id, error = %e, "Food intake delete failed");
                DeleteOutcome::Failed
            }
        };

        match &outcome {
            DeleteOutcome::Deleted => {
                tracing::info!(id, "Food intake deleted");
                self.show_status(DELETED, ToastVariant::Success);
                let window = Rc::clone(&self.browser.window);
                self.browser
                    .scheduler
                    .set_timeout(RELOAD_DELAY_MS, Box::new(move || window.reload()));
            }
            DeleteOutcome::Rejected(message) => self.show_status(message, ToastVariant::Error),
            DeleteOutcome::Failed => self.show_status(SERVER_ERROR, ToastVariant::Error),
            DeleteOutcome::Cancelled => {}
        }
        outcome
    }

    /// Reuse the page's status toast
    pub fn show_status(&self, message: &str, variant: ToastVariant) {
        let Some(toast) = self.browser.dom.query(STATUS_TOAST) else {
            return;
        };
        toast.set_text(message);
        toast.set_class_name(&format!("toast {} show", variant.as_str()));
        self.browser
            .scheduler
            .set_timeout(STATUS_TOAST_MS, Box::new(move || toast.remove_class("show")));
    }

    /// Draw the calorie ring up to its `data-progress` percentage
    pub fn animate_calories_ring(&self) {
        let Some(ring) = self.browser.dom.query(CALORIES_RING) else {
            return;
        };
        let progress = ring
            .attribute("data-progress")
            .and_then(|p| leading_number(&p))
            .filter(|p| p.is_finite())
            .unwrap_or(0.0);
        let offset = ring_offset(progress);

        self.browser.scheduler.set_timeout(
            RING_DELAY_MS,
            Box::new(move || ring.set_style("stroke-dashoffset", &offset.to_string())),
        );
    }
}

impl Listener for FoodDiary {
    fn on_event(&self, event: &PageEvent) -> Propagation {
        if let PageEvent::DomContentLoaded = event {
            self.animate_calories_ring();
        }
        Propagation::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::{self, FakeHttp};

    const DELETE_URL: &str = "/api/food-intake/{id}/delete/";

    fn setup() -> (FoodDiary, Rc<FakeHttp>, Rc<fake::FakeElement>, fake::Handles) {
        let (browser, handles) = fake::browser();
        let toast = handles.dom.insert(STATUS_TOAST, "div");
        *handles.window.cookie.borrow_mut() = "sessionid=xyz; csrftoken=tok123".to_string();
        let http = Rc::new(FakeHttp::default());
        let diary = FoodDiary::new(browser, http.clone(), DELETE_URL, "csrftoken");
        (diary, http, toast, handles)
    }

    #[test]
    fn test_csrf_token() {
        assert_eq!(csrf_token("csrftoken=abc", "csrftoken"), "abc");
        assert_eq!(csrf_token("a=1; csrftoken=abc; b=2", "csrftoken"), "abc");
        assert_eq!(csrf_token("a=1; b=2", "csrftoken"), "");
        assert_eq!(csrf_token("", "csrftoken"), "");
        assert_eq!(csrf_token("xcsrftoken=nope", "csrftoken"), "");
    }

    #[test]
    fn test_ring_offset() {
        let circumference = 2.0 * PI * 75.0;
        assert!((ring_offset(0.0) - circumference).abs() < 1e-9);
        assert!((ring_offset(50.0) - circumference / 2.0).abs() < 1e-9);
        assert!(ring_offset(100.0).abs() < 1e-9);
        // Over-eating draws past a full ring
        assert!(ring_offset(150.0) < 0.0);
    }

    #[tokio::test]
    async fn test_delete_success_reloads() {
        let (diary, http, toast, handles) = setup();
        http.respond("/api/food-intake/42/delete/", r#"{"success": true}"#);

        let outcome = diary.delete_intake(42).await;

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(toast.text(), "O'chirildi!");
        assert_eq!(toast.class_name(), "toast success show");
        assert_eq!(http.requests.borrow()[0].2[0].1, "tok123");

        handles.scheduler.advance(499);
        assert_eq!(handles.window.reloads.get(), 0);
        handles.scheduler.advance(1);
        assert_eq!(handles.window.reloads.get(), 1);
    }

    #[tokio::test]
    async fn test_delete_rejected_shows_server_message() {
        let (diary, http, toast, handles) = setup();
        http.respond(
            "/api/food-intake/7/delete/",
            r#"{"success": false, "error": "Topilmadi"}"#,
        );

        let outcome = diary.delete_intake(7).await;

        assert_eq!(outcome, DeleteOutcome::Rejected("Topilmadi".to_string()));
        assert_eq!(toast.text(), "Topilmadi");
        assert_eq!(toast.class_name(), "toast error show");
        handles.scheduler.advance(3000);
        assert_eq!(toast.class_name(), "toast error");
        assert_eq!(handles.window.reloads.get(), 0);
    }

    #[tokio::test]
    async fn test_delete_rejected_without_message() {
        let (diary, http, toast, _handles) = setup();
        http.respond("/api/food-intake/7/delete/", r#"{"success": false}"#);

        diary.delete_intake(7).await;
        assert_eq!(toast.text(), "Xatolik");
    }

    #[tokio::test]
    async fn test_delete_transport_failure() {
        let (diary, http, toast, _handles) = setup();
        http.fail("/api/food-intake/7/delete/");

        assert_eq!(diary.delete_intake(7).await, DeleteOutcome::Failed);
        assert_eq!(toast.text(), "Server xatosi");
    }

    #[tokio::test]
    async fn test_declined_confirm_sends_nothing() {
        let (diary, http, toast, handles) = setup();
        handles.window.confirm_answer.set(false);

        assert_eq!(diary.delete_intake(7).await, DeleteOutcome::Cancelled);
        assert!(http.requests.borrow().is_empty());
        assert_eq!(toast.text(), "");
        assert_eq!(*handles.window.confirmations.borrow(), vec!["O'chirmoqchimisiz?".to_string()]);
    }

    #[test]
    fn test_ring_animates_after_delay() {
        let (diary, _http, _toast, handles) = setup();
        let ring = handles.dom.insert(CALORIES_RING, "circle");
        ring.set_attr("data-progress", "100");

        diary.on_event(&PageEvent::DomContentLoaded);
        assert_eq!(ring.style("stroke-dashoffset"), None);

        handles.scheduler.advance(100);
        let offset: f64 = ring.style("stroke-dashoffset").unwrap().parse().unwrap();
        assert!(offset.abs() < 1e-9);
    }

    #[test]
    fn test_ring_unparsable_progress_is_zero() {
        let (diary, _http, _toast, handles) = setup();
        let ring = handles.dom.insert(CALORIES_RING, "circle");
        ring.set_attr("data-progress", "n/a");

        diary.animate_calories_ring();
        handles.scheduler.advance(100);

        let offset: f64 = ring.style("stroke-dashoffset").unwrap().parse().unwrap();
        assert!((offset - 2.0 * PI * 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("50%"), Some(50.0));
        assert_eq!(leading_number("  45.5 kcal"), Some(45.5));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("-12e1x"), Some(-120.0));
        assert_eq!(leading_number("1e"), Some(1.0));
        assert_eq!(leading_number("n/a"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_ring_reads_progress_with_unit() {
        let (diary, _http, _toast, handles) = setup();
        let ring = handles.dom.insert(CALORIES_RING, "circle");
        ring.set_attr("data-progress", "50%");

        diary.animate_calories_ring();
        handles.scheduler.advance(100);

        let offset: f64 = ring.style("stroke-dashoffset").unwrap().parse().unwrap();
        assert!((offset - PI * 75.0).abs() < 1e-9);
    }
}
