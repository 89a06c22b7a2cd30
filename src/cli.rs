//! Command-line interface definitions.
//!
//! The binary is a thin shell over the library adapters, handy for checking
//! what a scrape currently produces. Options can also come from environment
//! variables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the feed scrapers.
///
/// # Examples
///
/// ```sh
/// # XHunt global AI leaderboard for the last 24 hours
/// feed_scrapers trends
///
/// # Chinese group, web3 tag, 6 hours, pretty JSON
/// feed_scrapers --pretty trends --group cn --tag web3 --hours 6
///
/// # Xinhua detail pages linked from a listing
/// feed_scrapers --config scrapers.yaml details https://www.news.cn/world/index.htm
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "FEED_SCRAPERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Scrape the XHunt tweet leaderboard into a feed payload
    Trends {
        #[arg(long, default_value = "global")]
        group: String,
        #[arg(long, default_value = "24")]
        hours: String,
        #[arg(long, default_value = "ai")]
        tag: String,
    },
    /// Scrape the detail pages linked from a Xinhua listing page
    Details {
        /// Listing page URL
        listing_url: String,
    },
}
