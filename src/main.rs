//! `feed_scrapers` binary: run one adapter and print its output as JSON.
//!
//! Logs go to stderr so stdout carries only the JSON document.

use clap::Parser;
use feed_scrapers::{HttpFetcher, ScrapeConfig, TrendsQuery, XHuntTrends, XinhuaDetails};
use std::error::Error;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = ScrapeConfig::load(args.config.as_deref())?;
    let fetcher = HttpFetcher::new(&config)?;

    let json = match args.command {
        Command::Trends { group, hours, tag } => {
            let query = TrendsQuery { group, hours, tag };
            let payload = XHuntTrends::new(fetcher, &config).invoke(&query).await;
            info!(items = payload.items.len(), title = %payload.title, "Built XHunt feed");
            to_json(&payload, args.pretty)?
        }
        Command::Details { listing_url } => {
            let records = XinhuaDetails::new(fetcher, &config)
                .collect(&listing_url)
                .await;
            info!(records = records.len(), "Collected Xinhua detail pages");
            to_json(&records, args.pretty)?
        }
    };
    println!("{json}");

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
