mod config;
mod logging;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use watch_engine::{
    CategoryOutcome, ConsoleSink, Notifier, ReqwestFetcher, RunReport, SourceLister, StateStore,
    Watcher, WebhookSink,
};
use watch_logging::{watch_debug, watch_info};

use crate::config::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination(), cli.log_level());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let watcher = build_watcher(&cli)?;

    let report = match runtime.block_on(watcher.run_once()) {
        Ok(report) => report,
        Err(err) => {
            print_report(err.report());
            return Err(err.into());
        }
    };

    print_report(&report);
    if report.has_failures() {
        bail!("one or more category listings could not be fetched");
    }
    Ok(())
}

fn build_watcher(cli: &Cli) -> anyhow::Result<Watcher> {
    if cli.fr_check {
        watch_debug!("Federal Register cross-check requested; no cross-reference is performed");
    }

    let fetcher = ReqwestFetcher::new(cli.fetch_settings()).context("failed to build HTTP client")?;
    let mut notifier = Notifier::new(cli.notify_pause()).with_sink(ConsoleSink);
    if let Some(endpoint) = cli.webhook()? {
        watch_info!("Webhook delivery enabled for host {:?}", endpoint.host_str());
        notifier = notifier.with_sink(WebhookSink::new(fetcher.client().clone(), endpoint));
    }

    let lister = SourceLister::new(Arc::new(fetcher), cli.source_url.clone())
        .with_require_identifier(!cli.allow_unnumbered);
    let store = StateStore::new(cli.state_path());
    Ok(Watcher::new(lister, notifier, store, cli.run_settings()))
}

fn print_report(report: &RunReport) {
    for (category, outcome) in &report.outcomes {
        match outcome {
            CategoryOutcome::NoItems => {
                println!("[info] {category}: no items found (page layout may have changed)")
            }
            CategoryOutcome::NoNewItems => println!("[ok] {category}: no new items"),
            CategoryOutcome::Notified {
                count,
                failed_deliveries,
            } => {
                if *failed_deliveries > 0 {
                    println!(
                        "[new] {category}: {count} new item(s), {failed_deliveries} delivery failure(s)"
                    );
                } else {
                    println!("[new] {category}: {count} new item(s)");
                }
            }
            CategoryOutcome::Failed(message) => println!("[error] {category}: {message}"),
        }
    }
    if report.state_updated {
        println!("[done] state updated");
    }
}
