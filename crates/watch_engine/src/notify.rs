use std::io::{self, Write};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use url::Url;
use watch_logging::{watch_debug, watch_warn};

use crate::fetch::map_reqwest_error;

pub const DEFAULT_NOTIFY_PAUSE: Duration = Duration::from_secs(1);
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("console write failed: {0}")]
    Io(#[from] io::Error),
    #[error("webhook returned status {0}")]
    Status(u16),
    #[error("webhook request failed: {0}")]
    Request(String),
}

/// One destination for alert text.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError>;
}

/// Prints each alert to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait::async_trait]
impl NotificationSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{message}")?;
        out.flush()?;
        Ok(())
    }
}

/// POSTs `{"content": <alert>}` to a chat-style webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl WebhookSink {
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self {
            client,
            endpoint,
            timeout: WEBHOOK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, message: &str) -> Result<(), DeliveryError> {
        let body = serde_json::json!({ "content": message }).to_string();
        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| DeliveryError::Request(map_reqwest_error(err).to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Fans alerts out to every sink. Delivery failures are logged, never returned.
pub struct Notifier {
    sinks: Vec<Box<dyn NotificationSink>>,
    pause: Duration,
}

impl Notifier {
    pub fn new(pause: Duration) -> Self {
        Self {
            sinks: Vec::new(),
            pause,
        }
    }

    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Returns the number of sinks that failed to take the message.
    pub async fn notify(&self, message: &str) -> usize {
        let mut failed = 0;
        for sink in &self.sinks {
            match sink.deliver(message).await {
                Ok(()) => watch_debug!("Delivered alert via {}", sink.name()),
                Err(err) => {
                    failed += 1;
                    watch_warn!("Delivery via {} failed: {}", sink.name(), err);
                }
            }
        }
        failed
    }

    /// Fixed delay between successive alerts.
    pub async fn pause(&self) {
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
    }
}
