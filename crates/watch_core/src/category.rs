use std::fmt;
use std::str::FromStr;

/// Tracked presidential action types. Each one is listed on its own page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    ExecutiveOrder,
    Proclamation,
}

impl Category {
    /// Fixed processing order for a run.
    pub const ALL: [Category; 2] = [Category::ExecutiveOrder, Category::Proclamation];

    /// Key used in the persisted state file.
    pub fn key(self) -> &'static str {
        match self {
            Category::ExecutiveOrder => "executive_order",
            Category::Proclamation => "proclamation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::ExecutiveOrder => "Executive Order",
            Category::Proclamation => "Proclamation",
        }
    }

    /// Listing page path, relative to the source base URL.
    pub fn listing_path(self) -> &'static str {
        match self {
            Category::ExecutiveOrder => "presidential-actions/executive-orders/",
            Category::Proclamation => "presidential-actions/proclamations/",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "executive_order" | "executive_orders" | "eo" => Ok(Category::ExecutiveOrder),
            "proclamation" | "proclamations" => Ok(Category::Proclamation),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}
