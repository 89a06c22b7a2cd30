//! XHunt trending-tweets scraper.
//!
//! Scrapes the tweet leaderboard at [XHunt](https://trends.xhunt.ai) and turns
//! each list entry into a [`FeedItem`].
//!
//! # URL Pattern
//!
//! `{base}/zh/tweets?group={group}&hours={hours}&tag={tag}`
//!
//! # Markup
//!
//! The page is a Tailwind-styled `ul[role="list"]`, one `li` per tweet. None
//! of the class names are stable, so each field is read through a
//! [`FieldChain`] and defaults when the markup has moved on.

use crate::config::ScrapeConfig;
use crate::error::{AdapterError, ExtractionError, FetchError};
use crate::extract::{FieldChain, Match, Strategy, first_href, locate_items, selector, strip_text};
use crate::fetch::FetchPage;
use crate::models::{ExtractedFields, FeedItem, FeedPayload};
use crate::utils::{now_iso8601, truncate_chars, truncate_for_log};
use quick_xml::escape::partial_escape;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Author string stamped on every payload.
pub const FEED_AUTHOR: &str = "xhunt";

/// Characters of tweet content kept in an item title.
const TITLE_CONTENT_CHARS: usize = 80;

/// Which leaderboard to scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsQuery {
    /// `global` or a regional group such as `cn`.
    pub group: String,
    /// Look-back window in hours.
    pub hours: String,
    pub tag: String,
}

impl Default for TrendsQuery {
    fn default() -> Self {
        Self {
            group: "global".to_string(),
            hours: "24".to_string(),
            tag: "ai".to_string(),
        }
    }
}

impl TrendsQuery {
    fn group_display(&self) -> &'static str {
        if self.group == "global" {
            "Global"
        } else {
            "Chinese"
        }
    }

    fn tag_display(&self) -> String {
        if self.tag.is_empty() {
            "Trends".to_string()
        } else {
            self.tag.to_uppercase()
        }
    }
}

/// Engagement counters shown under each tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Views,
    Likes,
    Retweets,
}

impl Metric {
    const ALL: [Metric; 3] = [Metric::Views, Metric::Likes, Metric::Retweets];

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Metric::Views => &["Views", "浏览"],
            Metric::Likes => &["Likes", "点赞"],
            Metric::Retweets => &["Retweets", "转发"],
        }
    }

    /// Classify a `title` attribute. Checked in views, likes, retweets order.
    pub fn classify(label: &str) -> Option<Metric> {
        Metric::ALL
            .into_iter()
            .find(|m| m.keywords().iter().any(|k| label.contains(k)))
    }
}

/// Compiled selectors for one tweet list.
#[derive(Debug)]
pub struct TweetRules {
    container: Selector,
    item: Selector,
    anchors: Selector,
    metrics: Selector,
    rank: FieldChain,
    author: FieldChain,
    handle: FieldChain,
    content: FieldChain,
    heat: FieldChain,
}

impl TweetRules {
    /// Compile the selectors for the XHunt tweet list.
    ///
    /// # Returns
    ///
    /// The compiled rules, or an [`ExtractionError::Selector`] if any
    /// selector fails to parse. Callers treat that as a page-level failure.
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            container: selector(r#"ul[role="list"]"#)?,
            item: selector("li")?,
            anchors: selector("a[href]")?,
            metrics: selector("span[title]")?,
            rank: FieldChain::new(vec![
                Strategy::new("span[aria-label*='Rank']", Match::Any)?,
                Strategy::new("span", Match::ClassAny(&["rounded", "bg-gradient"]))?,
            ]),
            author: FieldChain::new(vec![Strategy::new(
                "p",
                Match::ClassAll(&["font-semibold"]),
            )?])
            .or_default("Unknown"),
            handle: FieldChain::new(vec![Strategy::new(
                "p",
                Match::ClassAll(&["text-xs", "truncate"]),
            )?]),
            content: FieldChain::new(vec![Strategy::new(
                "p",
                Match::ClassAll(&["mt-0.5", "truncate"]),
            )?]),
            heat: FieldChain::new(vec![
                Strategy::new(
                    "span",
                    Match::AttrAny {
                        attr: "title",
                        needles: &["热度", "heat"],
                        fold_case: true,
                    },
                )?
                .then("span")?,
            ]),
        })
    }

    /// Tweet nodes on a parsed page, in document order.
    pub fn items<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        locate_items(document, &self.container, &self.item)
    }

    /// Read every field of one tweet node. `fallback_link` is used when the
    /// node has no usable anchor.
    pub fn extract(&self, node: ElementRef<'_>, fallback_link: &str) -> ExtractedFields {
        let mut fields = ExtractedFields {
            rank: self.rank.resolve(node),
            author: self.author.resolve(node),
            handle: self.handle.resolve(node),
            content: self.content.resolve(node),
            heat: self.heat.resolve(node),
            link: first_href(node, &self.anchors).unwrap_or_else(|| fallback_link.to_string()),
            ..ExtractedFields::default()
        };

        for span in node.select(&self.metrics) {
            let Some(metric) = span.value().attr("title").and_then(Metric::classify) else {
                continue;
            };
            let slot = match metric {
                Metric::Views => &mut fields.views,
                Metric::Likes => &mut fields.likes,
                Metric::Retweets => &mut fields.retweets,
            };
            if slot.is_empty() {
                *slot = strip_text(span);
            }
        }

        fields
    }
}

/// `[rank] author handle: content`, content cut to 80 characters.
pub fn item_title(fields: &ExtractedFields) -> String {
    format!(
        "[{}] {} {}: {}",
        fields.rank,
        fields.author,
        fields.handle,
        truncate_chars(&fields.content, TITLE_CONTENT_CHARS)
    )
}

/// HTML fragment made of whichever content, metrics and heat paragraphs have
/// something to say.
pub fn item_description(fields: &ExtractedFields) -> String {
    let mut parts = Vec::new();
    if !fields.content.is_empty() {
        parts.push(format!("<p>{}</p>", partial_escape(fields.content.as_str())));
    }
    if !(fields.views.is_empty() && fields.likes.is_empty() && fields.retweets.is_empty()) {
        parts.push(format!(
            "<p>Views: {} | Likes: {} | Retweets: {}</p>",
            partial_escape(fields.views.as_str()),
            partial_escape(fields.likes.as_str()),
            partial_escape(fields.retweets.as_str())
        ));
    }
    if !fields.heat.is_empty() {
        parts.push(format!("<p>Heat Score: {}</p>", partial_escape(fields.heat.as_str())));
    }

    if parts.is_empty() {
        fields.content.clone()
    } else {
        parts.concat()
    }
}

/// Turn extracted fields into a feed item.
pub fn assemble(fields: ExtractedFields) -> Result<FeedItem, ExtractionError> {
    let title = item_title(&fields);
    if title.is_empty() {
        return Err(ExtractionError::EmptyTitle);
    }
    Ok(FeedItem {
        description: item_description(&fields),
        author: format!("{} {}", fields.author, fields.handle)
            .trim()
            .to_string(),
        title,
        link: fields.link,
        pub_date: now_iso8601(),
    })
}

/// Parse a fetched leaderboard into feed items. Items that fail to assemble
/// are dropped and counted.
#[instrument(level = "info", skip_all, fields(bytes = body.len()))]
pub fn parse_page(body: &str, fallback_link: &str) -> Result<Vec<FeedItem>, ExtractionError> {
    let rules = TweetRules::new()?;
    let document = Html::parse_document(body);
    let nodes = rules.items(&document);
    if nodes.is_empty() {
        warn!("No tweet list found on page");
    }

    let mut items = Vec::with_capacity(nodes.len());
    let mut dropped = 0usize;
    for (index, node) in nodes.into_iter().enumerate() {
        match assemble(rules.extract(node, fallback_link)) {
            Ok(item) => {
                debug!(index, title = %item.title, "Parsed tweet");
                items.push(item);
            }
            Err(e) => {
                dropped += 1;
                warn!(
                    index,
                    error = %e,
                    html = %truncate_for_log(&node.html(), 300),
                    "Dropping tweet"
                );
            }
        }
    }

    info!(count = items.len(), dropped, "Parsed XHunt tweets");
    Ok(items)
}

/// Leaderboard URL for `query` under `base`.
pub fn trends_url(base: &str, query: &TrendsQuery) -> Result<Url, FetchError> {
    let raw = format!("{}/zh/tweets", base.trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|source| FetchError::InvalidUrl { url: raw, source })?;
    url.query_pairs_mut()
        .append_pair("group", &query.group)
        .append_pair("hours", &query.hours)
        .append_pair("tag", &query.tag);
    Ok(url)
}

/// The XHunt adapter. Never fails: fetch and page errors come back as a
/// degraded [`FeedPayload`].
#[derive(Debug)]
pub struct XHuntTrends<F> {
    fetcher: F,
    base_url: String,
}

impl<F: FetchPage> XHuntTrends<F> {
    /// Create the adapter.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page source, usually an [`HttpFetcher`](crate::fetch::HttpFetcher)
    /// * `config` - Supplies the base URL, also used as the link of items
    ///   without an anchor
    pub fn new(fetcher: F, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            base_url: config.xhunt_base_url.clone(),
        }
    }

    /// Scrape one leaderboard into a feed payload.
    ///
    /// # Returns
    ///
    /// The payload with one item per tweet, in page order. On any fetch or
    /// page-level parse failure, an error payload titled
    /// `XHunt Trends - Error` whose description carries the cause and whose
    /// items are empty.
    #[instrument(level = "info", skip(self), fields(group = %query.group, hours = %query.hours, tag = %query.tag))]
    pub async fn invoke(&self, query: &TrendsQuery) -> FeedPayload {
        let (link, outcome) = match trends_url(&self.base_url, query) {
            Ok(url) => {
                let link = url.to_string();
                let outcome = self.fetch_items(&link).await;
                (link, outcome)
            }
            Err(e) => (
                format!("{}/zh/tweets", self.base_url),
                Err(AdapterError::from(e)),
            ),
        };

        match outcome {
            Ok(items) => FeedPayload {
                title: format!(
                    "XHunt {} {} Trends - {}h",
                    query.group_display(),
                    query.tag_display(),
                    query.hours
                ),
                link,
                description: format!(
                    "XHunt AI trending tweets - Group: {}, Tag: {}, Hours: {}",
                    query.group, query.tag, query.hours
                ),
                author: FEED_AUTHOR.to_string(),
                items,
            },
            Err(e) => {
                error!(error = %e, url = %link, "XHunt scrape failed; returning error payload");
                FeedPayload {
                    title: "XHunt Trends - Error".to_string(),
                    link,
                    description: format!("Failed to fetch data: {e}"),
                    author: FEED_AUTHOR.to_string(),
                    items: Vec::new(),
                }
            }
        }
    }

    async fn fetch_items(&self, url: &str) -> Result<Vec<FeedItem>, AdapterError> {
        let body = self.fetcher.fetch(url).await?;
        Ok(parse_page(&body, &self.base_url)?)
    }
}
