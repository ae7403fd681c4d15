use crate::Item;

/// What to do when a category has no watermark yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstRunPolicy {
    /// Treat the whole listing as new and notify for every item.
    #[default]
    NotifyAll,
    /// Notify nothing; record the newest item as the starting watermark.
    Baseline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// New items, oldest first.
    pub new_items: Vec<Item>,
    pub updated_watermark: Option<String>,
    /// False when a prior watermark existed but was not in the listing.
    pub watermark_found: bool,
}

impl Reconciliation {
    pub fn watermark_changed(&self, prior: Option<&str>) -> bool {
        self.updated_watermark.as_deref() != prior
    }
}

/// Diffs a newest-first `listing` against `watermark`.
///
/// Collection stops at the watermark item (excluded) or at the end of the
/// listing. The result is reversed so callers process items chronologically.
pub fn reconcile(listing: &[Item], watermark: Option<&str>, policy: FirstRunPolicy) -> Reconciliation {
    let prior = watermark.map(str::to_string);
    let Some(newest) = listing.first() else {
        return Reconciliation {
            new_items: Vec::new(),
            updated_watermark: prior,
            watermark_found: watermark.is_none(),
        };
    };

    let Some(watermark) = watermark else {
        let new_items = match policy {
            FirstRunPolicy::NotifyAll => listing.iter().rev().cloned().collect(),
            FirstRunPolicy::Baseline => Vec::new(),
        };
        return Reconciliation {
            new_items,
            updated_watermark: Some(newest.url.clone()),
            watermark_found: true,
        };
    };

    let mut new_items: Vec<Item> = listing
        .iter()
        .take_while(|item| item.url != watermark)
        .cloned()
        .collect();
    let watermark_found = new_items.len() < listing.len();

    if new_items.is_empty() {
        return Reconciliation {
            new_items,
            updated_watermark: prior,
            watermark_found,
        };
    }

    new_items.reverse();
    Reconciliation {
        new_items,
        updated_watermark: Some(newest.url.clone()),
        watermark_found,
    }
}
