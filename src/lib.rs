//! # Feed Scrapers
//!
//! HTML-scraping adapters for an RSS aggregator. Each adapter fetches a
//! third-party page, pulls a list of items out of it with structural
//! selectors that tolerate markup drift, and returns normalized records for
//! the feed serializer downstream.
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`fetch::FetchPage`] issues one GET with the shared
//!    header set and timeout
//! 2. **Locating**: [`extract::locate_items`] finds the item list, if any
//! 3. **Extracting**: per item, [`extract::FieldChain`]s try selectors in
//!    order and fall back to defaults
//! 4. **Assembling**: the adapter builds [`models::FeedItem`]s and wraps
//!    them in a [`models::FeedPayload`], or a degraded payload on failure
//!
//! ```ignore
//! let config = ScrapeConfig::default();
//! let adapter = XHuntTrends::new(HttpFetcher::new(&config)?, &config);
//! let payload = adapter.invoke(&TrendsQuery::default()).await;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod scrapers;
pub mod utils;

pub use config::ScrapeConfig;
pub use fetch::{FetchPage, HttpFetcher};
pub use models::{DetailRecord, FeedItem, FeedPayload};
pub use scrapers::xhunt::{TrendsQuery, XHuntTrends};
pub use scrapers::xinhuanet::XinhuaDetails;
