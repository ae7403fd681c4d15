//! Watcher engine: fetching, listing parsing, state persistence and notification.
mod decode;
mod fetch;
mod listing;
mod notify;
mod persist;
mod run;
mod state_store;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use fetch::{build_client, FetchSettings, Fetcher, ReqwestFetcher};
pub use listing::{parse_listing, ListingRules, SourceLister, DEFAULT_SOURCE_URL};
pub use notify::{
    ConsoleSink, DeliveryError, NotificationSink, Notifier, WebhookSink, DEFAULT_NOTIFY_PAUSE,
    WEBHOOK_TIMEOUT,
};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError, StagedWrite};
pub use run::{CategoryOutcome, RunError, RunReport, RunSettings, Watcher};
pub use state_store::StateStore;
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
