//! Watcher core: pure domain types, classification and watermark reconciliation.
mod alert;
mod category;
mod classify;
mod item;
mod reconcile;
mod state;

pub use alert::{format_alert, PLACEHOLDER};
pub use category::{Category, ParseCategoryError};
pub use classify::{classify, Classification};
pub use item::Item;
pub use reconcile::{reconcile, FirstRunPolicy, Reconciliation};
pub use state::WatermarkState;
