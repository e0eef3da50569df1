//! Thin client for the blog search collaborator.
//!
//! The collaborator answers `GET <endpoint>?q=..&display=..&start=..&sort=..`
//! with `{ "items": [ { title, description, bloggername, postdate, link } ] }`.
//! A missing or non-array `items` field means zero results, and individual
//! malformed items are skipped.
use blogdraft_common::{DraftError, MissingInput, SearchResultItem};
use blogdraft_http::{HttpClient, RequestOpts};
use serde_json::Value;
use std::borrow::Cow;
use std::time::{Duration, Instant};

pub const DEFAULT_SEARCH_ENDPOINT: &str =
    "https://naver-search-proxy.ehdgus3278.workers.dev/search";

/// Extra attempts after a 429, a 5xx or a transport failure.
pub const DEFAULT_SEARCH_RETRIES: usize = 2;

/// Status shown while a search is in flight.
pub const LOADING_MESSAGE: &str = "로딩 중...";

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub display: u32,
    pub start: u32,
    pub sort: String,
    pub timeout: Duration,
    pub retries: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            display: 10,
            start: 1,
            sort: "sim".to_string(),
            timeout: Duration::from_secs(15),
            retries: DEFAULT_SEARCH_RETRIES,
        }
    }
}

#[derive(Clone)]
pub struct BlogSearchApi {
    http: HttpClient,
    settings: SearchSettings,
}

impl BlogSearchApi {
    pub fn new(settings: SearchSettings) -> Result<Self, DraftError> {
        let http = HttpClient::new(&settings.endpoint)
            .map_err(|e| DraftError::Config(format!("search endpoint: {e}")))?
            .with_timeout(settings.timeout)
            .with_retries(settings.retries);
        Ok(Self { http, settings })
    }

    /// Run one search. An empty keyword never reaches the network.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchResultItem>, DraftError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(DraftError::EmptyInput(MissingInput::Keyword));
        }

        let params: Vec<(&str, Cow<'_, str>)> = vec![
            ("q", keyword.into()),
            ("display", self.settings.display.to_string().into()),
            ("start", self.settings.start.to_string().into()),
            ("sort", self.settings.sort.as_str().into()),
        ];
        let started = Instant::now();
        tracing::info!(target: "web.search", query = %keyword, "search.start");

        let body: Value = self
            .http
            .get_json(
                "",
                RequestOpts {
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| {
                tracing::warn!(
                    target: "web.search",
                    query = %keyword,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "search.error"
                );
                DraftError::Search(e.to_string())
            })?;

        let items = items_from_response(&body);
        tracing::info!(
            target: "web.search",
            query = %keyword,
            total = ?body.get("total"),
            hit_count = items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search.success"
        );
        Ok(items)
    }
}

/// Extract result items, treating anything but an array as "no results".
pub fn items_from_response(body: &Value) -> Vec<SearchResultItem> {
    match body.get("items") {
        Some(Value::Array(raw)) => raw
            .iter()
            .filter_map(|it| serde_json::from_value(it.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Status line for a finished search.
pub fn found_message(count: usize) -> String {
    if count == 0 {
        "검색 결과가 없습니다.".to_string()
    } else {
        format!("{count}건의 결과를 찾았습니다.")
    }
}
