//! Ordered-fallback acquisition of readable article bodies.
//!
//! For each candidate link the acquirer builds an explicit list of
//! [`RetrievalTarget`]s (rendering proxy first, raw link second) and tries
//! them in order. Every failure, whether transport, status or a body at or
//! under `min_body_chars`, is an [`DraftError::AcquisitionMiss`] that is
//! logged and skipped. Nothing propagates out of the loop.
use crate::extract::ExtractRules;
use crate::fetch::DocumentFetcher;
use blogdraft_common::DraftError;
use blogdraft_common::text::char_len;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_PROXY_PREFIX: &str = "https://r.jina.ai/";
pub const DEFAULT_MIN_BODY_CHARS: usize = 200;
pub const DEFAULT_MAX_CANDIDATES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalTarget {
    /// Link rewritten through the rendering proxy.
    Proxy(String),
    /// The scheme-normalised link itself.
    Raw(String),
}

impl RetrievalTarget {
    pub fn url(&self) -> &str {
        match self {
            RetrievalTarget::Proxy(u) | RetrievalTarget::Raw(u) => u,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RetrievalTarget::Proxy(_) => "proxy",
            RetrievalTarget::Raw(_) => "raw",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AcquireSettings {
    /// Prefix placed before the scheme-normalised link. `None` disables the
    /// proxy target.
    pub proxy_prefix: Option<String>,
    pub min_body_chars: usize,
    pub max_candidates: usize,
}

impl Default for AcquireSettings {
    fn default() -> Self {
        Self {
            proxy_prefix: Some(DEFAULT_PROXY_PREFIX.to_string()),
            min_body_chars: DEFAULT_MIN_BODY_CHARS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

pub struct ContentAcquirer {
    fetcher: Arc<dyn DocumentFetcher>,
    rules: ExtractRules,
    settings: AcquireSettings,
}

impl ContentAcquirer {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        rules: ExtractRules,
        settings: AcquireSettings,
    ) -> Self {
        Self {
            fetcher,
            rules,
            settings,
        }
    }

    pub fn settings(&self) -> &AcquireSettings {
        &self.settings
    }

    /// Prioritised targets for one link. A link that cannot be made into an
    /// absolute URL has none.
    pub fn retrieval_targets(&self, link: &str) -> Vec<RetrievalTarget> {
        let Some(normalized) = normalize_scheme(link) else {
            return Vec::new();
        };
        let mut targets = Vec::with_capacity(2);
        if let Some(prefix) = self.settings.proxy_prefix.as_deref().filter(|p| !p.is_empty()) {
            targets.push(RetrievalTarget::Proxy(format!("{prefix}{normalized}")));
        }
        targets.push(RetrievalTarget::Raw(normalized));
        targets
    }

    /// Readable text for `link`, or `None` when every target misses.
    pub async fn acquire(&self, link: &str) -> Option<String> {
        for target in self.retrieval_targets(link) {
            match self.try_target(&target).await {
                Ok(body) => {
                    tracing::debug!(
                        target: "web.acquire",
                        kind = target.kind(),
                        url = %target.url(),
                        body_chars = char_len(&body),
                        "acquire.target.hit"
                    );
                    return Some(body);
                }
                Err(miss) => {
                    tracing::debug!(
                        target: "web.acquire",
                        kind = target.kind(),
                        error = %miss,
                        "acquire.target.miss"
                    );
                }
            }
        }
        tracing::info!(target: "web.acquire", link = %link, "acquire.link.absent");
        None
    }

    /// Acquire bodies for the first `max_candidates` links, one at a time.
    pub async fn acquire_all<'a, I>(&self, links: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut bodies = Vec::new();
        for link in links.into_iter().take(self.settings.max_candidates) {
            if let Some(body) = self.acquire(link).await {
                bodies.push(body);
            }
        }
        tracing::info!(
            target: "web.acquire",
            acquired = bodies.len(),
            "acquire.batch.done"
        );
        bodies
    }

    async fn try_target(&self, target: &RetrievalTarget) -> Result<String, DraftError> {
        let miss = |reason: String| DraftError::AcquisitionMiss {
            target: target.url().to_string(),
            reason,
        };

        let html = self
            .fetcher
            .fetch(target.url())
            .await
            .map_err(|e| miss(e.to_string()))?;
        let text = self.rules.readable_text(&html);
        let len = char_len(&text);
        if len <= self.settings.min_body_chars {
            return Err(miss(format!(
                "readable text too short ({len} <= {} chars)",
                self.settings.min_body_chars
            )));
        }
        Ok(text)
    }
}

/// Give protocol-relative and scheme-less links an `https` scheme. Returns
/// `None` when the result still is not a valid absolute URL.
pub fn normalize_scheme(link: &str) -> Option<String> {
    let link = link.trim();
    let candidate = if link.starts_with("//") {
        format!("https:{link}")
    } else if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{link}")
    };
    Url::parse(&candidate).ok().map(|_| candidate)
}
