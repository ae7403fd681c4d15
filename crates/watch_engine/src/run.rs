use std::time::Instant;

use watch_core::{format_alert, reconcile, Category, FirstRunPolicy};
use watch_logging::{watch_error, watch_info, watch_warn};

use crate::listing::SourceLister;
use crate::notify::Notifier;
use crate::persist::PersistError;
use crate::state_store::StateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub categories: Vec<Category>,
    pub max_items: usize,
    pub first_run: FirstRunPolicy,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            categories: Category::ALL.to_vec(),
            max_items: 20,
            first_run: FirstRunPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// The listing page parsed to zero entries.
    NoItems,
    NoNewItems,
    Notified { count: usize, failed_deliveries: usize },
    /// Fetching or decoding the listing failed; the watermark was left alone.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub outcomes: Vec<(Category, CategoryOutcome)>,
    pub state_updated: bool,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| matches!(outcome, CategoryOutcome::Failed(_)))
    }

    pub fn outcome(&self, category: Category) -> Option<&CategoryOutcome> {
        self.outcomes
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, outcome)| outcome)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Alerts already went out; `report` describes them even though the
    /// watermarks could not be written.
    #[error("failed to persist state: {source}")]
    Persist {
        #[source]
        source: PersistError,
        report: RunReport,
    },
}

impl RunError {
    pub fn report(&self) -> &RunReport {
        match self {
            RunError::Persist { report, .. } => report,
        }
    }
}

/// One polling pass: list, reconcile, notify, then persist once.
pub struct Watcher {
    lister: SourceLister,
    notifier: Notifier,
    store: StateStore,
    settings: RunSettings,
}

impl Watcher {
    pub fn new(lister: SourceLister, notifier: Notifier, store: StateStore, settings: RunSettings) -> Self {
        Self {
            lister,
            notifier,
            store,
            settings,
        }
    }

    pub async fn run_once(&self) -> Result<RunReport, RunError> {
        let started = Instant::now();
        let mut state = self.store.load();
        let mut report = RunReport::default();
        let mut changed = false;
        let mut sent = 0usize;

        for &category in &self.settings.categories {
            let listing = match self.lister.list(category, self.settings.max_items).await {
                Ok(listing) => listing,
                Err(err) => {
                    watch_error!("{} listing failed: {}", category, err);
                    report
                        .outcomes
                        .push((category, CategoryOutcome::Failed(err.to_string())));
                    continue;
                }
            };

            if listing.is_empty() {
                watch_warn!("{} listing had no recognizable entries", category);
                report.outcomes.push((category, CategoryOutcome::NoItems));
                continue;
            }

            let prior = state.get(category);
            let result = reconcile(&listing, prior, self.settings.first_run);
            if prior.is_some() && !result.watermark_found && listing.len() >= self.settings.max_items {
                watch_warn!(
                    "{} watermark not found within {} newest entries; older entries may have been missed",
                    category,
                    listing.len()
                );
            }

            let outcome = if result.new_items.is_empty() {
                CategoryOutcome::NoNewItems
            } else {
                watch_info!("{}: {} new item(s)", category, result.new_items.len());
                let mut failed_deliveries = 0;
                for item in &result.new_items {
                    if sent > 0 {
                        self.notifier.pause().await;
                    }
                    failed_deliveries += self.notifier.notify(&format_alert(item)).await;
                    sent += 1;
                }
                CategoryOutcome::Notified {
                    count: result.new_items.len(),
                    failed_deliveries,
                }
            };

            if result.watermark_changed(prior) {
                if let Some(url) = result.updated_watermark {
                    state.set(category, url);
                    changed = true;
                }
            }
            report.outcomes.push((category, outcome));
        }

        if changed {
            if let Err(source) = self.store.save(&state) {
                watch_error!("Run finished after {} alert(s) but state was not saved: {}", sent, source);
                return Err(RunError::Persist { source, report });
            }
            report.state_updated = true;
        }

        watch_info!(
            "Run finished in {:?}: {} alert(s), state {}",
            started.elapsed(),
            sent,
            if report.state_updated { "updated" } else { "unchanged" }
        );
        Ok(report)
    }
}
