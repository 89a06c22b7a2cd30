//! Xinhua listing/detail scraper.
//!
//! Two-phase, like the other link-following scrapers:
//!
//! 1. **Indexing**: fetch a listing page and collect its post anchors
//!    (anchor text as title, `href` resolved against the listing URL)
//! 2. **Fetching**: fetch each post's detail page, one at a time, and keep
//!    the outer HTML of the detail container as the description
//!
//! Detail fetches are spaced by the configured minimum request interval.

use crate::config::ScrapeConfig;
use crate::error::{AdapterError, ExtractionError, FetchError};
use crate::extract::{selector, strip_text};
use crate::fetch::{FetchPage, Pacer};
use crate::models::DetailRecord;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// A post anchor discovered on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLink {
    pub title: String,
    pub link: String,
}

/// Collect post anchors from a listing page. Anchors without a usable
/// `href` are skipped.
pub fn parse_links(
    listing_html: &str,
    listing_url: &Url,
    link_selector: &str,
) -> Result<Vec<PostLink>, ExtractionError> {
    let anchors = selector(link_selector)?;
    let document = Html::parse_document(listing_html);

    let mut posts = Vec::new();
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        match listing_url.join(href) {
            Ok(resolved) => posts.push(PostLink {
                title: strip_text(anchor),
                link: resolved.to_string(),
            }),
            Err(e) => debug!(%href, error = %e, "Skipping unresolvable post link"),
        }
    }
    Ok(posts)
}

/// Outer HTML of the first element matching `detail_selector`.
pub fn parse_detail(
    detail_html: &str,
    detail_selector: &str,
) -> Result<Option<String>, ExtractionError> {
    let container = selector(detail_selector)?;
    let document = Html::parse_document(detail_html);
    Ok(document.select(&container).next().map(|e| e.html()))
}

/// The Xinhua adapter.
#[derive(Debug)]
pub struct XinhuaDetails<F> {
    fetcher: F,
    link_selector: String,
    detail_selector: String,
    min_interval: Duration,
}

impl<F: FetchPage> XinhuaDetails<F> {
    /// Create the adapter with the configured selectors and request spacing.
    pub fn new(fetcher: F, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            link_selector: config.xinhua.link_selector.clone(),
            detail_selector: config.xinhua.detail_selector.clone(),
            min_interval: config.min_request_interval,
        }
    }

    /// One record per post linked from `listing_url`. A failed listing fetch
    /// yields no records; a failed detail fetch drops only that post.
    #[instrument(level = "info", skip(self))]
    pub async fn collect(&self, listing_url: &str) -> Vec<DetailRecord> {
        let mut pacer = Pacer::new(self.min_interval);
        let posts = match self.index(listing_url, &mut pacer).await {
            Ok(posts) => posts,
            Err(e) => {
                error!(error = %e, "Xinhua listing scrape failed");
                return Vec::new();
            }
        };
        info!(count = posts.len(), "Indexed Xinhua posts");
        self.fetch_posts(posts, &mut pacer).await
    }

    /// Fetch detail pages for `posts` serially, pacing every request.
    pub async fn fetch_posts(&self, posts: Vec<PostLink>, pacer: &mut Pacer) -> Vec<DetailRecord> {
        let total = posts.len();
        let mut records = Vec::with_capacity(total);
        for post in posts {
            pacer.wait().await;
            let link = post.link.clone();
            match self.fetch_post(post).await {
                Ok(record) => {
                    if record.description.is_none() {
                        warn!(url = %link, "Detail container missing");
                    }
                    records.push(record);
                }
                Err(e) => error!(error = %e, url = %link, "Xinhua detail fetch failed"),
            }
        }
        info!(
            count = records.len(),
            dropped = total - records.len(),
            "Fetched Xinhua detail pages"
        );
        records
    }

    async fn index(&self, listing_url: &str, pacer: &mut Pacer) -> Result<Vec<PostLink>, AdapterError> {
        let base = Url::parse(listing_url).map_err(|source| FetchError::InvalidUrl {
            url: listing_url.to_string(),
            source,
        })?;
        pacer.wait().await;
        let html = self.fetcher.fetch(base.as_str()).await?;
        Ok(parse_links(&html, &base, &self.link_selector)?)
    }

    #[instrument(level = "debug", skip_all, fields(url = %post.link))]
    async fn fetch_post(&self, post: PostLink) -> Result<DetailRecord, AdapterError> {
        let html = self.fetcher.fetch(&post.link).await?;
        let description = parse_detail(&html, &self.detail_selector)?;
        debug!(found = description.is_some(), "Parsed detail page");
        Ok(DetailRecord {
            title: post.title,
            link: post.link,
            description,
        })
    }
}
