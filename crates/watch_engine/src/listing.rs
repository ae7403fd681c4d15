//! Listing page scraping.
//!
//! Everything tied to the current page layout lives here: card selectors,
//! date lookup and link resolution. `parse_listing` is pure so a layout change
//! can be handled and tested against saved HTML without touching
//! reconciliation or persistence.

use std::collections::HashSet;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use url::Url;
use watch_core::{classify, Category, Item};
use watch_logging::{watch_debug, watch_info, watch_warn};

use crate::{decode_html, FailureKind, FetchError, Fetcher};

pub const DEFAULT_SOURCE_URL: &str = "https://www.whitehouse.gov/";

const CARD_SELECTORS: &[&str] = &["article, .card, .post", ".view-content .views-row", "article, div"];
const DATE_FALLBACK_SELECTOR: &str = ".posted-on, .meta, .date, .entry__meta";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingRules {
    pub max_items: usize,
    /// Drop entries whose title names an action type but carries no number.
    pub require_identifier: bool,
}

impl Default for ListingRules {
    fn default() -> Self {
        Self {
            max_items: 20,
            require_identifier: true,
        }
    }
}

/// Parses a listing page into newest-first items tagged with `category`.
///
/// A page without recognizable entries yields an empty list.
pub fn parse_listing(html: &str, page_url: &Url, category: Category, rules: &ListingRules) -> Vec<Item> {
    let document = Html::parse_document(html);
    let (Some(link_sel), Some(time_sel), Some(date_sel)) = (
        Selector::parse("a[href]").ok(),
        Selector::parse("time").ok(),
        Selector::parse(DATE_FALLBACK_SELECTOR).ok(),
    ) else {
        watch_warn!("Listing selectors failed to compile");
        return Vec::new();
    };

    let cards: Vec<ElementRef> = CARD_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .map(|sel| document.select(&sel).collect::<Vec<_>>())
        .find(|cards| !cards.is_empty())
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for card in cards {
        if items.len() >= rules.max_items {
            break;
        }
        let Some(anchor) = card.select(&link_sel).next() else {
            continue;
        };
        let title = collapse_whitespace(anchor.text());
        let Some(url) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_url(href, page_url))
        else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        let Some(found) = classify(&title) else {
            skipped += 1;
            continue;
        };
        if rules.require_identifier && found.identifier.is_none() {
            skipped += 1;
            continue;
        }

        let url = url.to_string();
        if !seen.insert(url.clone()) {
            continue;
        }

        items.push(Item {
            title,
            publication_date: card_date(card, &time_sel, &date_sel),
            url,
            identifier: found.identifier,
            category,
        });
    }

    watch_debug!(
        "Parsed {} {} entries from {} ({} non-action entries skipped)",
        items.len(),
        category,
        page_url,
        skipped
    );
    items
}

fn card_date(card: ElementRef, time_sel: &Selector, date_sel: &Selector) -> String {
    if let Some(time) = card.select(time_sel).next() {
        let date = time
            .value()
            .attr("datetime")
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| collapse_whitespace(time.text()));
        if !date.is_empty() {
            return date;
        }
    }
    card.select(date_sel)
        .next()
        .map(|el| collapse_whitespace(el.text()))
        .unwrap_or_default()
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_url(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
        return None;
    }
    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(_) => base.join(trimmed).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Fetches and parses category listing pages.
#[derive(Clone)]
pub struct SourceLister {
    fetcher: Arc<dyn Fetcher>,
    base_url: Url,
    require_identifier: bool,
}

impl SourceLister {
    pub fn new(fetcher: Arc<dyn Fetcher>, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            fetcher,
            base_url,
            require_identifier: true,
        }
    }

    pub fn with_require_identifier(mut self, require: bool) -> Self {
        self.require_identifier = require;
        self
    }

    pub fn listing_url(&self, category: Category) -> Result<Url, FetchError> {
        self.base_url
            .join(category.listing_path())
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// Newest-first items for `category`, at most `max_items` of them.
    pub async fn list(&self, category: Category, max_items: usize) -> Result<Vec<Item>, FetchError> {
        let listing_url = self.listing_url(category)?;
        watch_info!("Fetching {} listing from {}", category, listing_url);

        let output = self.fetcher.fetch(listing_url.as_str()).await?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        if decoded.had_replacements {
            watch_warn!(
                "{} listing at {} had malformed {} bytes; parsing with replacement characters",
                category,
                output.metadata.final_url,
                decoded.encoding_label
            );
        }
        let page_url = Url::parse(&output.metadata.final_url).unwrap_or(listing_url);

        let rules = ListingRules {
            max_items,
            require_identifier: self.require_identifier,
        };
        Ok(parse_listing(&decoded.html, &page_url, category, &rules))
    }
}
