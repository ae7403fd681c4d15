use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Category;

const LEGACY_KEY: &str = "last_seen_url";

/// Per-category watermarks as persisted between runs.
///
/// Keys that do not name a known category are kept so a load/save cycle never
/// drops them. The single-key `last_seen_url` layout from before proclamations
/// were tracked is read as the executive order watermark until that category
/// is next written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatermarkState {
    entries: BTreeMap<String, String>,
}

impl WatermarkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        let entry = match self.entries.get(category.key()) {
            Some(url) => Some(url),
            None if category == Category::ExecutiveOrder => self.entries.get(LEGACY_KEY),
            None => None,
        };
        entry.map(String::as_str).filter(|url| !url.is_empty())
    }

    pub fn set(&mut self, category: Category, url: impl Into<String>) {
        if category == Category::ExecutiveOrder {
            self.entries.remove(LEGACY_KEY);
        }
        self.entries.insert(category.key().to_string(), url.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Parses the state file body. Any structural mismatch is an error.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Two-space indented JSON with non-ASCII characters left unescaped.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_survive_round_trip() {
        let state =
            WatermarkState::from_json(r#"{"memoranda": "https://x/m", "proclamation": "https://x/p"}"#)
                .unwrap();
        assert_eq!(state.get(Category::Proclamation), Some("https://x/p"));
        assert_eq!(state.get(Category::ExecutiveOrder), None);
        let text = state.to_pretty_json().unwrap();
        assert!(text.contains("\"memoranda\": \"https://x/m\""));
    }

    #[test]
    fn legacy_key_stands_in_for_executive_orders() {
        let mut state = WatermarkState::from_json(r#"{"last_seen_url": "https://x/eo/1"}"#).unwrap();
        assert_eq!(state.get(Category::ExecutiveOrder), Some("https://x/eo/1"));
        assert_eq!(state.get(Category::Proclamation), None);

        state.set(Category::ExecutiveOrder, "https://x/eo/2");
        assert_eq!(state.get(Category::ExecutiveOrder), Some("https://x/eo/2"));
        assert!(!state.to_pretty_json().unwrap().contains(LEGACY_KEY));
    }

    #[test]
    fn current_key_wins_over_legacy_key() {
        let state = WatermarkState::from_json(
            r#"{"executive_order": "https://x/eo/9", "last_seen_url": "https://x/eo/1"}"#,
        )
        .unwrap();
        assert_eq!(state.get(Category::ExecutiveOrder), Some("https://x/eo/9"));
    }

    #[test]
    fn non_ascii_is_written_unescaped() {
        let mut state = WatermarkState::new();
        state.set(Category::ExecutiveOrder, "https://example.gov/órdenes/");
        let text = state.to_pretty_json().unwrap();
        assert!(text.contains("órdenes"));
        assert!(text.starts_with("{\n  \"executive_order\""));
    }

    #[test]
    fn non_string_values_are_rejected() {
        assert!(WatermarkState::from_json(r#"{"proclamation": 5}"#).is_err());
        assert!(WatermarkState::from_json("[]").is_err());
    }
}
