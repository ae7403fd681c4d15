use std::sync::Once;

use pretty_assertions::assert_eq;
use watch_core::{reconcile, Category, FirstRunPolicy, Item, WatermarkState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

fn item(name: &str) -> Item {
    Item {
        title: format!("Executive Order {name}"),
        publication_date: String::new(),
        url: format!("https://example.gov/eo/{name}"),
        identifier: None,
        category: Category::ExecutiveOrder,
    }
}

fn listing(names: &[&str]) -> Vec<Item> {
    names.iter().map(|name| item(name)).collect()
}

fn urls(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.url.as_str()).collect()
}

#[test]
fn stops_at_watermark_and_orders_oldest_first() {
    init_logging();
    let listing = listing(&["A", "B", "C", "D"]);
    let result = reconcile(&listing, Some("https://example.gov/eo/C"), FirstRunPolicy::NotifyAll);

    assert_eq!(
        urls(&result.new_items),
        vec!["https://example.gov/eo/B", "https://example.gov/eo/A"]
    );
    assert_eq!(result.updated_watermark.as_deref(), Some("https://example.gov/eo/A"));
    assert!(result.watermark_found);
}

#[test]
fn watermark_outside_window_treats_everything_as_new() {
    init_logging();
    let listing = listing(&["A", "B", "C"]);
    let result = reconcile(&listing, Some("https://example.gov/eo/Z"), FirstRunPolicy::NotifyAll);

    assert_eq!(
        urls(&result.new_items),
        vec![
            "https://example.gov/eo/C",
            "https://example.gov/eo/B",
            "https://example.gov/eo/A"
        ]
    );
    assert_eq!(result.updated_watermark.as_deref(), Some("https://example.gov/eo/A"));
    assert!(!result.watermark_found);
}

#[test]
fn empty_listing_keeps_watermark() {
    init_logging();
    let result = reconcile(&[], Some("https://example.gov/eo/C"), FirstRunPolicy::NotifyAll);
    assert!(result.new_items.is_empty());
    assert_eq!(result.updated_watermark.as_deref(), Some("https://example.gov/eo/C"));
    assert!(!result.watermark_changed(Some("https://example.gov/eo/C")));

    let result = reconcile(&[], None, FirstRunPolicy::NotifyAll);
    assert!(result.new_items.is_empty());
    assert_eq!(result.updated_watermark, None);
}

#[test]
fn second_pass_with_advanced_watermark_is_empty() {
    init_logging();
    let listing = listing(&["A", "B", "C"]);
    let first = reconcile(&listing, Some("https://example.gov/eo/C"), FirstRunPolicy::NotifyAll);
    assert_eq!(first.new_items.len(), 2);

    let second = reconcile(
        &listing,
        first.updated_watermark.as_deref(),
        FirstRunPolicy::NotifyAll,
    );
    assert!(second.new_items.is_empty());
    assert_eq!(second.updated_watermark, first.updated_watermark);
    assert!(!second.watermark_changed(first.updated_watermark.as_deref()));
}

#[test]
fn newest_item_as_watermark_yields_nothing() {
    init_logging();
    let listing = listing(&["A", "B"]);
    let result = reconcile(&listing, Some("https://example.gov/eo/A"), FirstRunPolicy::NotifyAll);
    assert!(result.new_items.is_empty());
    assert!(result.watermark_found);
    assert_eq!(result.updated_watermark.as_deref(), Some("https://example.gov/eo/A"));
}

#[test]
fn first_run_notify_all_reports_whole_listing() {
    init_logging();
    let listing = listing(&["A", "B", "C"]);
    let result = reconcile(&listing, None, FirstRunPolicy::NotifyAll);
    assert_eq!(result.new_items.len(), 3);
    assert_eq!(result.new_items[0].url, "https://example.gov/eo/C");
    assert_eq!(result.updated_watermark.as_deref(), Some("https://example.gov/eo/A"));
}

#[test]
fn first_run_baseline_records_watermark_silently() {
    init_logging();
    let listing = listing(&["A", "B", "C"]);
    let result = reconcile(&listing, None, FirstRunPolicy::Baseline);
    assert!(result.new_items.is_empty());
    assert_eq!(result.updated_watermark.as_deref(), Some("https://example.gov/eo/A"));
    assert!(result.watermark_changed(None));
}

#[test]
fn advancing_one_category_leaves_the_other_alone() {
    init_logging();
    let mut state = WatermarkState::new();
    state.set(Category::Proclamation, "https://example.gov/proc/9");

    let listing = listing(&["A", "B"]);
    let result = reconcile(
        &listing,
        state.get(Category::ExecutiveOrder),
        FirstRunPolicy::NotifyAll,
    );
    if let Some(url) = result.updated_watermark {
        state.set(Category::ExecutiveOrder, url);
    }

    assert_eq!(state.get(Category::ExecutiveOrder), Some("https://example.gov/eo/A"));
    assert_eq!(state.get(Category::Proclamation), Some("https://example.gov/proc/9"));

    let text = state.to_pretty_json().unwrap();
    let restored = WatermarkState::from_json(&text).unwrap();
    assert_eq!(restored, state);
}
