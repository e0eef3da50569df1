use anyhow::Result;
use blogdraft_common::observability::{LogConfig, default_data_dir};
use blogdraft_compose::{ComposeSettings, DraftComposer, Lexicon, LengthWindow};
use blogdraft_config::{BlogDraftConfig, LexiconOverrides};
use blogdraft_web::extract::DEFAULT_SELECTORS;
use blogdraft_web::fetch::DEFAULT_USER_AGENT;
use blogdraft_web::{
    AcquireSettings, BlogSearchApi, ContentAcquirer, ExtractRules, HttpFetcher, SearchSettings,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const APP_NAME: &str = "blogdraft";

/// Runtime collaborators built once per invocation.
pub struct Pipeline {
    pub search: BlogSearchApi,
    pub composer: DraftComposer,
}

pub fn build_from_config(cfg: &BlogDraftConfig) -> Result<Pipeline> {
    let search = BlogSearchApi::new(SearchSettings {
        endpoint: cfg.search.endpoint.clone(),
        display: cfg.search.display,
        start: cfg.search.start,
        sort: cfg.search.sort.clone(),
        timeout: Duration::from_secs(cfg.search.timeout_secs),
        retries: cfg.search.retries,
    })?;

    let acquire = &cfg.acquire;
    let rules = match &acquire.selectors {
        Some(selectors) => ExtractRules::new(selectors.as_slice(), acquire.min_chunk_chars)?,
        None => ExtractRules::new(DEFAULT_SELECTORS, acquire.min_chunk_chars)?,
    };
    let fetcher = HttpFetcher::new(
        acquire.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
        Duration::from_secs(acquire.timeout_secs),
    )?;
    let acquirer = ContentAcquirer::new(
        Arc::new(fetcher),
        rules,
        AcquireSettings {
            proxy_prefix: Some(acquire.proxy_prefix.clone()),
            min_body_chars: acquire.min_body_chars,
            max_candidates: acquire.max_candidates,
        },
    );

    let lexicon = lexicon_from(&cfg.lexicon);
    let settings = ComposeSettings {
        window: LengthWindow::new(cfg.compose.min_chars, cfg.compose.max_chars)?,
        hashtag_count: cfg.compose.hashtag_count,
    };
    let composer = DraftComposer::new(&lexicon, settings)?.with_acquirer(Arc::new(acquirer));

    tracing::debug!(
        target: "app",
        lexicon = %lexicon.version,
        endpoint = %cfg.search.endpoint,
        "app.pipeline.ready"
    );
    Ok(Pipeline { search, composer })
}

/// Built-in lexicon with any configured fields replaced.
pub fn lexicon_from(overrides: &LexiconOverrides) -> Lexicon {
    let mut lexicon = Lexicon::default();
    if let Some(version) = &overrides.version {
        lexicon.version = version.clone();
    }
    if let Some(stopwords) = &overrides.stopwords {
        lexicon.stopwords = stopwords.clone();
    }
    if let Some(hashtags) = &overrides.hashtags {
        lexicon.hashtags = hashtags.clone();
    }
    if let Some(filler) = &overrides.filler_sentence {
        lexicon.filler_sentence = filler.clone();
    }
    let categories = &overrides.categories;
    let slots = [
        (&mut lexicon.categories.parking, &categories.parking),
        (&mut lexicon.categories.waiting, &categories.waiting),
        (&mut lexicon.categories.mood, &categories.mood),
        (&mut lexicon.categories.menu, &categories.menu),
        (&mut lexicon.categories.price, &categories.price),
    ];
    for (slot, value) in slots {
        if let Some(pattern) = value {
            *slot = pattern.clone();
        }
    }
    lexicon
}

pub fn log_config(cfg: &BlogDraftConfig) -> Result<LogConfig> {
    Ok(LogConfig {
        app_name: APP_NAME,
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.log_format()?,
        default_filter: cfg.logging.filter.clone(),
    })
}

pub fn store_path(cfg: &BlogDraftConfig) -> PathBuf {
    cfg.storage
        .path
        .clone()
        .unwrap_or_else(|| default_data_dir(APP_NAME).join("store.json"))
}
