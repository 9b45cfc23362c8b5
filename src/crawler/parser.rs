//! Parsed page abstraction
//!
//! Extractors only ever ask a page two questions: "what is the text of every
//! element matching this selector" and "what is this attribute on every
//! element matching this selector". [`Document`] captures exactly that, so
//! extraction logic can be exercised against small fixtures.

use scraper::{Html, Selector};

/// Narrow view of a parsed page
pub trait Document {
    /// Text of every element matching `selector`, in document order
    ///
    /// Each text node is trimmed before the pieces are joined.
    fn select_text(&self, selector: &str) -> Vec<String>;

    /// Value of `attr` on every element matching `selector`, in document order
    fn select_attr(&self, selector: &str, attr: &str) -> Vec<Option<String>>;
}

/// A [`Document`] backed by a full HTML parse
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a page body
    ///
    /// HTML parsing is lenient; malformed markup still yields a document.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }
}

impl Document for HtmlDocument {
    fn select_text(&self, selector: &str) -> Vec<String> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .map(|element| element.text().map(str::trim).collect::<String>())
            .collect()
    }

    fn select_attr(&self, selector: &str, attr: &str) -> Vec<Option<String>> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .map(|element| element.value().attr(attr).map(str::to_string))
            .collect()
    }
}

/// Parses a selector, logging instead of failing on bad input
///
/// Configured selectors are validated at load time, so this only trips on
/// selectors supplied directly by library callers.
fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Invalid selector '{}': {}", selector, e);
            None
        }
    }
}
