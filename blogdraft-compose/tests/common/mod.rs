use std::sync::OnceLock;

use async_trait::async_trait;
use blogdraft_common::observability::{LogConfig, LogFormat};
use blogdraft_http::HttpError;
use blogdraft_web::DocumentFetcher;
use std::collections::HashMap;
use std::sync::Mutex;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "blogdraft-tests",
            log_dir: Some(std::env::temp_dir().join("blogdraft-tests")),
            emit_stderr: true,
            format: if std::env::var("BLOGDRAFT_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        blogdraft_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Fetcher that serves fixed pages and fails for everything else.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| HttpError::Network(format!("connection refused: {url}")))
    }
}
