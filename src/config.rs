//! Scraper configuration.
//!
//! Everything here is resolved once, before any adapter runs. The hosting
//! aggregator may hand us a YAML file; any field it leaves out falls back to
//! the embedded defaults below.
//!
//! ```yaml
//! headers:
//!   User-Agent: "my-aggregator/1.0"
//! timeout_secs: 20
//! min_request_interval_ms: 1500
//! xhunt_base_url: "https://trends.xhunt.ai"
//! xinhua:
//!   link_selector: "ul.dataList a[href]"
//!   detail_selector: "div#detail"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Request headers sent with every fetch.
///
/// Keys are kept in a sorted map so the outgoing header order is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet(BTreeMap<String, String>);

impl Default for HeaderSet {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
        map.insert("Accept".to_string(), DEFAULT_ACCEPT.to_string());
        map.insert(
            "Accept-Language".to_string(),
            DEFAULT_ACCEPT_LANGUAGE.to_string(),
        );
        HeaderSet(map)
    }
}

impl HeaderSet {
    /// Overlay `overrides` onto this set. Header names compare
    /// case-insensitively, so `user-agent` replaces `User-Agent`.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in overrides {
            let name = name.into();
            self.0.retain(|k, _| !k.eq_ignore_ascii_case(&name));
            self.0.insert(name, value.into());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Selectors used by the Xinhua detail adapter.
///
/// The default `link_selector` targets the `ul.dataList` post list used on
/// Xinhua channel pages. Listings laid out differently need their own
/// selector, otherwise nothing (or navigation chrome) is picked up.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct XinhuaConfig {
    /// Anchors on the listing page that point at detail pages.
    pub link_selector: String,
    /// Container on each detail page whose HTML becomes the description.
    pub detail_selector: String,
}

impl Default for XinhuaConfig {
    fn default() -> Self {
        Self {
            link_selector: "ul.dataList a[href]".to_string(),
            detail_selector: "div#detail".to_string(),
        }
    }
}

/// On-disk shape of the configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    headers: BTreeMap<String, String>,
    timeout_secs: Option<u64>,
    min_request_interval_ms: Option<u64>,
    xhunt_base_url: Option<String>,
    xinhua: XinhuaConfig,
}

/// Resolved configuration shared by the fetcher and both adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub headers: HeaderSet,
    pub timeout: Duration,
    /// Minimum pause between consecutive detail-page fetches.
    pub min_request_interval: Duration,
    pub xhunt_base_url: String,
    pub xinhua: XinhuaConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            headers: HeaderSet::default(),
            timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_secs(1),
            xhunt_base_url: "https://trends.xhunt.ai".to_string(),
            xinhua: XinhuaConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// Parse a YAML document, overlaying it onto the defaults.
    pub fn from_yaml(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = if yaml.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?
        };

        let defaults = ScrapeConfig::default();
        let timeout = match raw.timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };

        Ok(ScrapeConfig {
            headers: defaults.headers.with_overrides(raw.headers),
            timeout,
            min_request_interval: raw
                .min_request_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_request_interval),
            xhunt_base_url: raw
                .xhunt_base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.xhunt_base_url),
            xinhua: raw.xinhua,
        })
    }

    /// Load from `path` if given, otherwise return the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, and
    /// [`ConfigError::Parse`] or [`ConfigError::ZeroTimeout`] if its contents
    /// are rejected.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("No config file given; using embedded defaults");
            return Ok(ScrapeConfig::default());
        };
        let path_str = path.display().to_string();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path_str.clone(),
            source,
        })?;
        let config = Self::from_yaml(&yaml, &path_str)?;
        info!(path = %path_str, timeout = ?config.timeout, "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_mimic_a_browser() {
        let headers = HeaderSet::default();
        assert!(headers.get("user-agent").unwrap().starts_with("Mozilla/5.0"));
        assert_eq!(headers.get("Accept-Language"), Some("en-US,en;q=0.5"));
        assert_eq!(headers.iter().count(), 3);
    }

    #[test]
    fn test_header_override_is_case_insensitive() {
        let headers = HeaderSet::default().with_overrides([("user-agent", "agg/1.0")]);
        assert_eq!(headers.get("User-Agent"), Some("agg/1.0"));
        assert_eq!(headers.iter().count(), 3);
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ScrapeConfig::from_yaml("", "inline").unwrap();
        assert_eq!(config, ScrapeConfig::default());
    }

    #[test]
    fn test_partial_yaml_overlays_defaults() {
        let yaml = r#"
headers:
  Accept-Language: "zh-CN,zh;q=0.9"
timeout_secs: 5
xhunt_base_url: "http://localhost:8080/"
xinhua:
  link_selector: "li a[href]"
"#;
        let config = ScrapeConfig::from_yaml(yaml, "inline").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.min_request_interval, Duration::from_secs(1));
        assert_eq!(config.xhunt_base_url, "http://localhost:8080");
        assert_eq!(config.headers.get("accept-language"), Some("zh-CN,zh;q=0.9"));
        assert!(config.headers.get("User-Agent").is_some());
        assert_eq!(config.xinhua.link_selector, "li a[href]");
        assert_eq!(config.xinhua.detail_selector, "div#detail");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = ScrapeConfig::from_yaml("timeout_secs: 0", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_load_reads_yaml_file() {
        let path = std::env::temp_dir().join(format!(
            "feed_scrapers_config_{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "timeout_secs: 7\nmin_request_interval_ms: 250\n").unwrap();
        let config = ScrapeConfig::load(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.min_request_interval, Duration::from_millis(250));
        assert_eq!(config.headers, HeaderSet::default());
    }

    #[test]
    fn test_default_link_selector_targets_post_list() {
        assert_eq!(XinhuaConfig::default().link_selector, "ul.dataList a[href]");
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = ScrapeConfig::load(Some(Path::new("/nonexistent/feed_scrapers.yaml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_no_path_gives_defaults() {
        assert_eq!(ScrapeConfig::load(None).unwrap(), ScrapeConfig::default());
    }
}
