use chrono::NaiveDate;

use crate::Category;

/// One presidential action discovered on a listing page.
///
/// `url` is the identity key within a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    /// Raw date text as published; empty when the page had none.
    pub publication_date: String,
    pub url: String,
    /// Order or proclamation number extracted from the title.
    pub identifier: Option<String>,
    pub category: Category,
}

const TEXT_DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%b. %d, %Y", "%m/%d/%Y"];

impl Item {
    /// Best-effort structured date. Accepts `YYYY-MM-DD` (with an optional
    /// trailing time part, as found in `<time datetime>`) and month-name forms
    /// such as `January 20, 2025`.
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_publication_date(&self.publication_date)
    }
}

fn parse_publication_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(date) = raw
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    {
        return Some(date);
    }
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
