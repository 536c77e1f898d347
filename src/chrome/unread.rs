//! Unread Messages Badge
//!
//! Polls the online-status endpoint and mirrors the unread count into the
//! sidebar badge. Failures keep whatever the badge showed before.

use std::rc::Rc;

use crate::api::{self, HttpClient};
use crate::platform::{Dom, Scheduler, TimerId};

pub const UNREAD_BADGE: &str = "#sidebarUnreadBadge";

/// Counts above this show as "99+"
const MAX_DISPLAYED: i64 = 99;

pub struct UnreadBadge {
    dom: Rc<dyn Dom>,
    http: Rc<dyn HttpClient>,
    url: String,
}

/// Badge text for a count, or `None` when the badge should be hidden
pub fn badge_label(count: i64) -> Option<String> {
    if count <= 0 {
        None
    } else if count > MAX_DISPLAYED {
        Some(format!("{}+", MAX_DISPLAYED))
    } else {
        Some(count.to_string())
    }
}

impl UnreadBadge {
    pub fn new(dom: Rc<dyn Dom>, http: Rc<dyn HttpClient>, url: &str) -> Self {
        Self {
            dom,
            http,
            url: url.to_string(),
        }
    }

    /// The badge is only rendered for signed-in users
    pub fn is_present(&self) -> bool {
        self.dom.query(UNREAD_BADGE).is_some()
    }

    /// Fetch the unread count once and update the badge
    pub async fn check(&self) {
        match api::fetch_online_status(self.http.as_ref(), &self.url).await {
            Ok(status) => self.apply(status.unread_count),
            Err(e) => tracing::info!(error = %e, "Unread check error"),
        }
    }

    pub fn apply(&self, count: i64) {
        let Some(badge) = self.dom.query(UNREAD_BADGE) else {
            return;
        };
        match badge_label(count) {
            Some(label) => {
                badge.set_text(&label);
                badge.set_style("display", "inline-block");
            }
            None => badge.set_style("display", "none"),
        }
    }

    /// Check now and then every `period_secs` seconds
    pub fn start_polling(self: &Rc<Self>, scheduler: Rc<dyn Scheduler>, period_secs: u32) -> Option<TimerId> {
        let badge = Rc::clone(self);
        scheduler.spawn(Box::pin(async move { badge.check().await }));

        if period_secs == 0 {
            return None;
        }

        let badge = Rc::clone(self);
        let spawner = Rc::clone(&scheduler);
        let id = scheduler.set_interval(
            period_secs.saturating_mul(1000),
            Box::new(move || {
                let badge = Rc::clone(&badge);
                spawner.spawn(Box::pin(async move { badge.check().await }));
            }),
        );
        tracing::debug!(period_secs, "Unread polling started");
        Some(id)
    }
}
