//! Product page fetching
//!
//! One GET per resolution, with a desktop browser signature so storefronts
//! that turn away bots still serve the page. Any failure means "no content".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Pages are cut off after this many bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Source of raw page text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of `url` on a 2xx response, `None` on anything else.
    async fn fetch_page(&self, url: &str) -> Option<String>;
}

/// Request headers and limits used by [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept: BROWSER_ACCEPT.to_string(),
            accept_language: BROWSER_ACCEPT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(8),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// [`PageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetch `url`, reporting why nothing came back.
    ///
    /// At most `max_body_bytes` of the body are kept; the rest of an
    /// oversized page is not read.
    pub async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Transport(e)
            }
        };

        let mut response = self.client.get(parsed).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            let room = self.max_body_bytes - bytes.len();
            if chunk.len() > room {
                bytes.extend_from_slice(&chunk[..room]);
                debug!(url, limit = self.max_body_bytes, "page truncated");
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        debug!(url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "page fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetcher_creation() {
        assert!(HttpFetcher::new().is_ok());
    }

    #[tokio::test]
    async fn test_invalid_header_rejected() {
        let config = FetchConfig {
            user_agent: "bad\nagent".to_string(),
            ..FetchConfig::default()
        };
        assert!(matches!(
            HttpFetcher::with_config(config),
            Err(FetchError::InvalidHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_sends_browser_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/p/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher
            .fetch_page(&format!("{}/p/1", mock_server.uri()))
            .await;

        assert_eq!(body.as_deref(), Some("<html>ok</html>"));

        let requests = mock_server.received_requests().await.unwrap();
        let headers = &requests[0].headers;
        assert_eq!(headers.get("user-agent").unwrap(), BROWSER_USER_AGENT);
        assert_eq!(headers.get("accept").unwrap(), BROWSER_ACCEPT);
        assert_eq!(headers.get("accept-language").unwrap(), BROWSER_ACCEPT_LANGUAGE);
    }

    #[tokio::test]
    async fn test_oversized_body_is_truncated() {
        let mock_server = MockServer::start().await;

        let page = format!("<meta property=\"og:image\" content=\"/a.jpg\">{}", "x".repeat(10_000));
        Mock::given(method("GET"))
            .and(path("/huge"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_config(FetchConfig {
            max_body_bytes: 64,
            ..FetchConfig::default()
        })
        .unwrap();

        let body = fetcher
            .try_fetch(&format!("{}/huge", mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(body, page[..64]);
        assert!(body.starts_with(r#"<meta property="og:image""#));
    }

    #[tokio::test]
    async fn test_non_success_is_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/blocked"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>captcha</html>"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = format!("{}/blocked", mock_server.uri());

        assert!(matches!(
            fetcher.try_fetch(&url).await,
            Err(FetchError::Status { status: 503, .. })
        ));
        assert_eq!(fetcher.fetch_page(&url).await, None);
    }

    #[tokio::test]
    async fn test_timeout_is_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_config(FetchConfig {
            timeout: Duration::from_millis(200),
            ..FetchConfig::default()
        })
        .unwrap();
        let url = format!("{}/slow", mock_server.uri());

        assert!(matches!(
            fetcher.try_fetch(&url).await,
            Err(FetchError::Timeout { .. })
        ));
        assert_eq!(fetcher.fetch_page(&url).await, None);
    }

    #[tokio::test]
    async fn test_malformed_url_is_no_content() {
        let fetcher = HttpFetcher::new().unwrap();

        assert!(matches!(
            fetcher.try_fetch("not a url").await,
            Err(FetchError::InvalidUrl { .. })
        ));
        assert_eq!(fetcher.fetch_page("ftp://example.com/file").await, None);
    }
}
