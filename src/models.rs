//! Data models handed to the downstream feed serializer.
//!
//! - [`FeedPayload`]: one feed, as produced by a single adapter invocation
//! - [`FeedItem`]: one entry of that feed
//! - [`DetailRecord`]: one detail page scraped by the Xinhua adapter
//! - [`ExtractedFields`]: transient per-item values read from the markup
//!
//! `FeedItem` serializes its publish date as `pubDate`, matching the JSON
//! shape the feed layer expects.

use serde::{Deserialize, Serialize};

/// A normalized feed, ready for RSS/Atom serialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedPayload {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: String,
    /// Entries in the document order of the source list.
    pub items: Vec<FeedItem>,
}

/// A single feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// HTML fragment.
    pub description: String,
    pub author: String,
    /// ISO-8601 timestamp taken when the item was assembled.
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

/// A detail page referenced from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetailRecord {
    pub title: String,
    pub link: String,
    /// Outer HTML of the detail container, `None` when the page has none.
    pub description: Option<String>,
}

/// Raw per-item values before assembly. Unresolved fields hold their
/// defaults rather than being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub rank: String,
    pub author: String,
    pub handle: String,
    pub content: String,
    pub views: String,
    pub likes: String,
    pub retweets: String,
    pub heat: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_item_uses_pubdate_key() {
        let item = FeedItem {
            title: "[1] Alice @alice: hi".to_string(),
            link: "/t/1".to_string(),
            description: "<p>hi</p>".to_string(),
            author: "Alice @alice".to_string(),
            pub_date: "2025-05-06T20:30:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["pubDate"], "2025-05-06T20:30:00+00:00");
        assert!(json.get("pub_date").is_none());
    }

    #[test]
    fn test_payload_shape() {
        let payload = FeedPayload {
            title: "XHunt Global AI Trends - 24h".to_string(),
            link: "https://trends.xhunt.ai/zh/tweets".to_string(),
            description: "desc".to_string(),
            author: "xhunt".to_string(),
            items: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["title", "link", "description", "author", "items"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(json["items"], serde_json::json!([]));
    }

    #[test]
    fn test_payload_deserialization() {
        let json = r#"{
            "title": "t",
            "link": "l",
            "description": "d",
            "author": "a",
            "items": [{"title": "it", "link": "il", "description": "id", "author": "ia", "pubDate": "now"}]
        }"#;
        let payload: FeedPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].pub_date, "now");
    }

    #[test]
    fn test_detail_record_without_container_serializes_null() {
        let record = DetailRecord {
            title: "t".to_string(),
            link: "https://example.com/a".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["description"].is_null());
    }
}
