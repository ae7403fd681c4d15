use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use url::Url;
use watch_core::{Category, FirstRunPolicy};
use watch_engine::{FetchSettings, RunSettings, DEFAULT_SOURCE_URL};

use crate::logging::LogDestination;

const DEFAULT_STATE_FILE: &str = "eo_state.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FirstRunArg {
    /// Alert on every item of a category seen for the first time.
    NotifyAll,
    /// Record the newest item silently and alert only on later ones.
    Baseline,
}

impl From<FirstRunArg> for FirstRunPolicy {
    fn from(arg: FirstRunArg) -> Self {
        match arg {
            FirstRunArg::NotifyAll => FirstRunPolicy::NotifyAll,
            FirstRunArg::Baseline => FirstRunPolicy::Baseline,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "action-watch",
    about = "Poll the White House listings for new executive orders and proclamations",
    version
)]
pub struct Cli {
    /// Webhook endpoint for alerts; empty disables delivery
    #[arg(long, env = "WEBHOOK_URL", default_value = "")]
    pub webhook_url: String,

    /// State file (default: ~/eo_state.json)
    #[arg(long, env = "STATE_PATH")]
    pub state_path: Option<PathBuf>,

    /// Maximum entries read per category per run
    #[arg(long, env = "MAX_ITEMS", default_value_t = 20, value_parser = parse_at_least_one::<usize>)]
    pub max_items: usize,

    /// Cross-reference with the Federal Register (accepted, not yet acted on)
    #[arg(
        long,
        env = "FR_CHECK",
        default_value = "1",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub fr_check: bool,

    /// What to do for a category that has no watermark yet
    #[arg(long, env = "FIRST_RUN", value_enum, default_value_t = FirstRunArg::NotifyAll)]
    pub first_run: FirstRunArg,

    /// Pause between successive alerts, in milliseconds
    #[arg(long, env = "NOTIFY_PAUSE_MS", default_value_t = 1000)]
    pub notify_pause_ms: u64,

    /// Base URL the listing paths are resolved against
    #[arg(long = "source-url", env = "SOURCE_BASE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: Url,

    /// Restrict the run to these categories (comma separated)
    #[arg(long = "category", env = "CATEGORIES", value_delimiter = ',')]
    pub categories: Vec<Category>,

    /// Keep entries that name an action type but carry no number
    #[arg(long)]
    pub allow_unnumbered: bool,

    /// Per-request HTTP timeout, in seconds
    #[arg(
        long,
        env = "HTTP_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = parse_at_least_one::<u64>
    )]
    pub timeout_secs: u64,

    /// Also append logs to this file
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_at_least_one<T>(raw: &str) -> Result<T, String>
where
    T: FromStr + PartialOrd + From<u8>,
    T::Err: fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(n) if n < T::from(1) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_path.clone().unwrap_or_else(|| {
            home::home_dir()
                .map(|home| home.join(DEFAULT_STATE_FILE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
        })
    }

    pub fn webhook(&self) -> anyhow::Result<Option<Url>> {
        let raw = self.webhook_url.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let url = Url::parse(raw).with_context(|| format!("invalid WEBHOOK_URL {raw:?}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("WEBHOOK_URL must be http or https, got {}", url.scheme());
        }
        Ok(Some(url))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.timeout_secs),
            ..FetchSettings::default()
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        let mut categories = Vec::new();
        for category in &self.categories {
            if !categories.contains(category) {
                categories.push(*category);
            }
        }
        if categories.is_empty() {
            categories = Category::ALL.to_vec();
        }
        categories.sort();

        RunSettings {
            categories,
            max_items: self.max_items,
            first_run: self.first_run.into(),
        }
    }

    pub fn notify_pause(&self) -> Duration {
        Duration::from_millis(self.notify_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["action-watch"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments parse")
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = parse(&[
            "--max-items",
            "5",
            "--fr-check",
            "0",
            "--first-run",
            "baseline",
            "--category",
            "proclamation,executive_order,proclamation",
            "--state-path",
            "/tmp/state.json",
            "--source-url",
            "http://127.0.0.1:8080/",
        ]);
        assert!(!cli.fr_check);
        assert_eq!(cli.state_path(), PathBuf::from("/tmp/state.json"));

        let settings = cli.run_settings();
        assert_eq!(settings.max_items, 5);
        assert_eq!(settings.first_run, FirstRunPolicy::Baseline);
        assert_eq!(
            settings.categories,
            vec![Category::ExecutiveOrder, Category::Proclamation]
        );
        assert_eq!(cli.source_url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn zero_max_items_is_rejected() {
        let argv = ["action-watch", "--max-items", "0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let argv = ["action-watch", "--timeout-secs", "0"];
        assert!(Cli::try_parse_from(argv).is_err());

        let cli = parse(&["--timeout-secs", "5"]);
        assert_eq!(cli.fetch_settings().request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_webhook_disables_delivery() {
        let cli = parse(&["--webhook-url", "  "]);
        assert_eq!(cli.webhook().unwrap(), None);

        let cli = parse(&["--webhook-url", "ftp://example.com/hook"]);
        assert!(cli.webhook().is_err());

        let cli = parse(&["--webhook-url", "https://hooks.example.com/x"]);
        assert_eq!(
            cli.webhook().unwrap().map(String::from),
            Some("https://hooks.example.com/x".to_string())
        );
    }
}
