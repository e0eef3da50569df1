use async_trait::async_trait;
use blogdraft_http::{HttpClient, HttpError, RequestOpts};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

// Links reach the fetcher already absolute; the base only satisfies the client.
const FALLBACK_BASE: &str = "https://blog.naver.com/";

/// Retrieves one document as HTML text. Implementations must not retry.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, HttpError>;
}

/// Fetcher backed by the shared [`HttpClient`].
pub struct HttpFetcher {
    http: HttpClient,
    headers: HeaderMap,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let http = HttpClient::new(FALLBACK_BASE)?
            .with_timeout(timeout)
            .with_retries(0);
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| HttpError::Build(e.to_string()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,text/plain;q=0.9,*/*;q=0.8"),
        );
        Ok(Self { http, headers })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        self.http
            .get_text(
                url,
                RequestOpts {
                    headers: Some(self.headers.clone()),
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
    }
}
