use crate::Item;

pub const PLACEHOLDER: &str = "n/a";

/// Plain-text alert for one item. Field order is fixed.
///
/// Recognized dates are printed as `YYYY-MM-DD`; anything else is shown as
/// published.
pub fn format_alert(item: &Item) -> String {
    let published = match item.published_on() {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None if item.publication_date.trim().is_empty() => PLACEHOLDER.to_string(),
        None => item.publication_date.trim().to_string(),
    };
    let number = item.identifier.as_deref().unwrap_or(PLACEHOLDER);

    [
        format!("New {} detected", item.category.label()),
        format!("- Type: {}", item.category.label()),
        format!("- Title: {}", item.title),
        format!("- Published: {published}"),
        format!("- Number: {number}"),
        format!("- Link: {}", item.url),
    ]
    .join("\n")
}
