//! Page retrieval.
//!
//! Adapters talk to the network only through [`FetchPage`], so the HTTP
//! client can be swapped for canned pages in tests. [`HttpFetcher`] is the
//! real implementation: one GET per call, shared headers, bounded timeout,
//! no retries and no caching.

use crate::config::ScrapeConfig;
use crate::error::FetchError;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument, warn};
use url::Url;

/// Something that can turn a URL into a page body.
pub trait FetchPage {
    /// Fetch `url` and return the body of a 2xx response.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: FetchPage> FetchPage for &T {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// [`FetchPage`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client carrying the configured header set and timeout.
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.headers.iter() {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Enforces a minimum interval between consecutive requests.
///
/// The first call to [`Pacer::wait`] returns immediately.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    /// Create a pacer that keeps at least `interval` between the starts of
    /// consecutive requests. A zero interval never waits.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Wait until the next request may start, then record it as started.
    ///
    /// Call once immediately before each request. Returns at once on the
    /// first call or when the interval has already elapsed.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                debug!(?remaining, "Pacing next request");
                sleep(remaining).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Canned pages for exercising adapters without a network.
#[cfg(test)]
pub(crate) mod stub {
    use super::FetchPage;
    use crate::error::FetchError;
    use reqwest::StatusCode;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Serves registered pages; any other URL answers 502.
    #[derive(Debug, Default)]
    pub struct StubFetcher {
        pages: HashMap<String, String>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl StubFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
        }

        pub fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }
    }

    impl FetchPage for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), Instant::now()));
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::BAD_GATEWAY,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned response and hand back the raw request text.
    async fn serve_once(response: &'static str, delay: Duration) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{addr}/page"), handle)
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_headers() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<p>hello</p>\n",
            Duration::ZERO,
        )
        .await;

        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();
        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, "<p>hello</p>\n");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /page"));
        assert!(request.contains("user-agent: mozilla/5.0"));
        assert!(request.contains("accept-language: en-us,en;q=0.5"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let (url, _server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;

        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        match err {
            FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 503),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let (url, _server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n",
            Duration::from_secs(5),
        )
        .await;

        let config = ScrapeConfig {
            timeout: Duration::from_millis(200),
            ..ScrapeConfig::default()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "{err:?}");
        let cause = std::error::Error::source(&err).expect("timeout keeps its cause");
        assert!(cause.downcast_ref::<reqwest::Error>().is_some_and(|e| e.is_timeout()));
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();
        let err = fetcher.fetch(&format!("http://{addr}/")).await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_malformed_url_is_rejected_before_sending() {
        let fetcher = HttpFetcher::new(&ScrapeConfig::default()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn test_invalid_header_value_is_rejected() {
        let config = ScrapeConfig {
            headers: crate::config::HeaderSet::default()
                .with_overrides([("User-Agent", "bad\nvalue")]),
            ..ScrapeConfig::default()
        };
        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { .. }));
    }

    #[tokio::test]
    async fn test_pacer_spaces_out_calls() {
        let mut pacer = Pacer::new(Duration::from_millis(50));
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
