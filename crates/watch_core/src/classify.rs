use std::sync::OnceLock;

use regex::Regex;

use crate::Category;

/// Result of matching a title against the action-type pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Action type named in the title. May differ from the page it was listed on.
    pub kind: Category,
    pub identifier: Option<String>,
}

static ACTION_RE: OnceLock<Regex> = OnceLock::new();

fn action_re() -> &'static Regex {
    ACTION_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:(?P<eo>executive\s+order|eo)|(?P<proc>proclamation))\b(?:\s*(?:no\.?|number|#))?\s*(?P<num>\d[\d-]*)?",
        )
        .unwrap()
    })
}

/// Matches `title` against the action-type pattern.
///
/// When the title names several actions, the first one carrying a number wins.
pub fn classify(title: &str) -> Option<Classification> {
    let mut first = None;
    for caps in action_re().captures_iter(title) {
        let kind = if caps.name("eo").is_some() {
            Category::ExecutiveOrder
        } else {
            Category::Proclamation
        };
        let identifier = caps
            .name("num")
            .map(|m| m.as_str().trim_end_matches('-').to_string())
            .filter(|n| !n.is_empty());
        let found = Classification { kind, identifier };
        if found.identifier.is_some() {
            return Some(found);
        }
        first.get_or_insert(found);
    }
    first
}
