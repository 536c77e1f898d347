//! Global Search
//!
//! The header search box redirects to the book search page on Enter.

use crate::platform::Browser;

pub const SEARCH_INPUT: &str = "#globalSearch";

pub struct GlobalSearch {
    browser: Browser,
    search_url: String,
}

impl GlobalSearch {
    pub fn new(browser: Browser, search_url: &str) -> Self {
        Self {
            browser,
            search_url: search_url.to_string(),
        }
    }

    /// Results URL for a query, or `None` when the query is blank
    pub fn results_url(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(format!("{}?q={}", self.search_url, urlencoding::encode(query)))
    }

    /// Key handler for the search input
    pub fn handle_key(&self, key: &str) {
        if key != "Enter" {
            return;
        }
        let Some(input) = self.browser.dom.query(SEARCH_INPUT) else {
            return;
        };
        if let Some(url) = self.results_url(&input.value()) {
            tracing::debug!(%url, "Global search");
            self.browser.window.navigate(&url);
        }
    }

    pub fn focus(&self) {
        if let Some(input) = self.browser.dom.query(SEARCH_INPUT) {
            input.focus();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake;

    #[test]
    fn test_enter_navigates_with_encoded_query() {
        let (browser, handles) = fake::browser();
        let input = handles.dom.insert(SEARCH_INPUT, "input");
        input.set_value("  O'tkan kunlar & Abdulla Qodiriy ");
        let search = GlobalSearch::new(browser, "/kitoblar/");

        search.handle_key("Enter");

        assert_eq!(
            *handles.window.navigations.borrow(),
            vec!["/kitoblar/?q=O%27tkan%20kunlar%20%26%20Abdulla%20Qodiriy".to_string()]
        );
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let (browser, handles) = fake::browser();
        let input = handles.dom.insert(SEARCH_INPUT, "input");
        input.set_value("   ");
        let search = GlobalSearch::new(browser, "/kitoblar/");

        search.handle_key("Enter");
        assert!(handles.window.navigations.borrow().is_empty());
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let (browser, handles) = fake::browser();
        let input = handles.dom.insert(SEARCH_INPUT, "input");
        input.set_value("python");
        let search = GlobalSearch::new(browser, "/kitoblar/");

        search.handle_key("a");
        search.handle_key("Tab");
        assert!(handles.window.navigations.borrow().is_empty());
    }
}
