//! Loader for `blogdraft` configuration with YAML + environment overlays.
//!
//! Sources are merged lowest to highest: built-in defaults, YAML files or
//! inline snippets in the order they were added, then `BLOGDRAFT__`-prefixed
//! environment variables (`BLOGDRAFT__COMPOSE__MIN_CHARS=1500`). String
//! values may reference `${VAR}`; references are expanded recursively up to
//! a fixed depth after merging.
use blogdraft_common::DraftError;
use blogdraft_common::observability::LogFormat;
use blogdraft_web::acquire::{DEFAULT_MAX_CANDIDATES, DEFAULT_MIN_BODY_CHARS, DEFAULT_PROXY_PREFIX};
use blogdraft_web::extract::DEFAULT_MIN_CHUNK_CHARS;
use blogdraft_web::fetch::DEFAULT_FETCH_TIMEOUT;
use blogdraft_web::SearchSettings;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "BLOGDRAFT";
const MAX_SEARCH_RETRIES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogDraftConfig {
    pub search: SearchConfig,
    pub acquire: AcquireConfig,
    pub compose: ComposeConfig,
    pub lexicon: LexiconOverrides,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub display: u32,
    pub start: u32,
    /// `sim` (relevance) or `date`.
    pub sort: String,
    pub timeout_secs: u64,
    /// Extra attempts after a 429, a 5xx or a transport failure.
    pub retries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let defaults = SearchSettings::default();
        Self {
            endpoint: defaults.endpoint,
            display: defaults.display,
            start: defaults.start,
            sort: defaults.sort,
            timeout_secs: defaults.timeout.as_secs(),
            retries: defaults.retries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Empty disables the proxy target.
    pub proxy_prefix: String,
    pub max_candidates: usize,
    pub min_chunk_chars: usize,
    pub min_body_chars: usize,
    /// Ordered article selectors; `None` keeps the built-in list.
    pub selectors: Option<Vec<String>>,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            proxy_prefix: DEFAULT_PROXY_PREFIX.into(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            min_chunk_chars: DEFAULT_MIN_CHUNK_CHARS,
            min_body_chars: DEFAULT_MIN_BODY_CHARS,
            selectors: None,
            timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub min_chars: usize,
    pub max_chars: usize,
    pub hashtag_count: usize,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            min_chars: 1200,
            max_chars: 2000,
            hashtag_count: 15,
        }
    }
}

/// Partial replacement of the built-in lexicon. Absent fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconOverrides {
    pub version: Option<String>,
    pub stopwords: Option<Vec<String>>,
    pub categories: CategoryOverrides,
    pub hashtags: Option<Vec<String>>,
    pub filler_sentence: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryOverrides {
    pub parking: Option<String>,
    pub waiting: Option<String>,
    pub mood: Option<String>,
    pub menu: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `text` or `json`.
    pub format: String,
    pub emit_stderr: bool,
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".into(),
            emit_stderr: false,
            filter: "info".into(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn log_format(&self) -> Result<LogFormat, DraftError> {
        self.format.parse().map_err(DraftError::Config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding saved reviews and the draft note.
    pub path: Option<PathBuf>,
}

impl BlogDraftConfig {
    /// Reject values that would make later stages misbehave.
    pub fn validate(&self) -> Result<(), DraftError> {
        let invalid = |msg: String| Err(DraftError::Config(msg));

        if self.search.endpoint.trim().is_empty() {
            return invalid("search.endpoint must not be empty".into());
        }
        if !(1..=100).contains(&self.search.display) {
            return invalid(format!("search.display must be 1..=100, got {}", self.search.display));
        }
        if self.search.start == 0 {
            return invalid("search.start must be at least 1".into());
        }
        if !matches!(self.search.sort.as_str(), "sim" | "date") {
            return invalid(format!("search.sort must be `sim` or `date`, got {:?}", self.search.sort));
        }
        if self.search.retries > MAX_SEARCH_RETRIES {
            return invalid(format!(
                "search.retries must be at most {MAX_SEARCH_RETRIES}, got {}",
                self.search.retries
            ));
        }
        if self.acquire.max_candidates == 0 {
            return invalid("acquire.max_candidates must be at least 1".into());
        }
        if self.search.timeout_secs == 0 || self.acquire.timeout_secs == 0 {
            return invalid("timeouts must be at least one second".into());
        }
        if self.compose.min_chars > self.compose.max_chars {
            return invalid(format!(
                "compose.min_chars ({}) exceeds compose.max_chars ({})",
                self.compose.min_chars, self.compose.max_chars
            ));
        }
        if self.compose.hashtag_count == 0 {
            return invalid("compose.hashtag_count must be at least 1".into());
        }
        self.logging.log_format()?;
        Ok(())
    }

    /// Effective configuration as YAML, for `blogdraft config show`.
    pub fn to_yaml(&self) -> Result<String, DraftError> {
        serde_yaml::to_string(self).map_err(|e| DraftError::Config(e.to_string()))
    }
}

/// `~/.config/blogdraft/config.yaml` (platform equivalent), if a config
/// directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blogdraft").join("config.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct BlogDraftConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for BlogDraftConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogDraftConfigLoader {
    /// Start from built-in defaults; environment overrides are applied last
    /// in [`load`](Self::load).
    ///
    /// ```
    /// use blogdraft_config::BlogDraftConfigLoader;
    ///
    /// let config = BlogDraftConfigLoader::new()
    ///     .with_yaml_str("compose:\n  min_chars: 900\n")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.compose.min_chars, 900);
    /// assert_eq!(config.compose.max_chars, 2000);
    /// assert_eq!(config.search.sort, "sim");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the `config` crate
    /// infers the format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but silently skipped when the
    /// file is missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use blogdraft_config::BlogDraftConfigLoader;
    ///
    /// let cfg = BlogDraftConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// acquire:
    ///   proxy_prefix: ""
    ///   selectors: ["article", "main"]
    /// lexicon:
    ///   categories:
    ///     parking: "주차|parking"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(cfg.acquire.proxy_prefix.is_empty());
    /// assert_eq!(cfg.acquire.selectors.as_deref().map(|s| s.len()), Some(2));
    /// assert_eq!(cfg.lexicon.categories.parking.as_deref(), Some("주차|parking"));
    /// assert!(cfg.lexicon.categories.mood.is_none());
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge every source, expand `${VAR}` placeholders and validate.
    ///
    /// ```
    /// use blogdraft_config::BlogDraftConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_SEARCH_HOST", "search.internal"); }
    ///
    /// let config = BlogDraftConfigLoader::new()
    ///     .with_yaml_str("search:\n  endpoint: \"https://${DOC_SEARCH_HOST}/search\"\n")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.search.endpoint, "https://search.internal/search");
    ///
    /// unsafe { std::env::remove_var("DOC_SEARCH_HOST"); }
    /// ```
    pub fn load(self) -> Result<BlogDraftConfig, DraftError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| DraftError::Config(e.to_string()))?;

        let mut v: Value = cfg
            .try_deserialize()
            .map_err(|e| DraftError::Config(e.to_string()))?;
        expand_env_in_value(&mut v);

        let typed: BlogDraftConfig =
            serde_json::from_value(v).map_err(|e| DraftError::Config(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use temp_env;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Seoul")), ("GU", Some("Seongdong"))], || {
            let mut v = json!(["hello-$CITY", { "loc": "${CITY}-${GU}" }, 42, true, null]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Seoul", { "loc": "Seoul-Seongdong" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = BlogDraftConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.search.endpoint, blogdraft_web::search::DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(cfg.search.retries, blogdraft_web::search::DEFAULT_SEARCH_RETRIES);
        assert_eq!(cfg.acquire.max_candidates, 4);
        assert_eq!(cfg.acquire.min_body_chars, 200);
        assert_eq!(cfg.acquire.min_chunk_chars, 80);
        assert_eq!(cfg.acquire.timeout_secs, 15);
        assert_eq!(cfg.compose.hashtag_count, 15);
    }

    #[test]
    fn validation_caps_search_retries() {
        let mut cfg = BlogDraftConfig::default();
        cfg.search.retries = MAX_SEARCH_RETRIES + 1;
        assert!(matches!(cfg.validate(), Err(DraftError::Config(msg)) if msg.contains("search.retries")));
    }

    #[test]
    fn validation_rejects_inverted_window() {
        let mut cfg = BlogDraftConfig::default();
        cfg.compose.min_chars = 3000;
        assert!(matches!(cfg.validate(), Err(DraftError::Config(msg)) if msg.contains("min_chars")));
    }

    #[test]
    fn validation_rejects_unknown_sort_and_log_format() {
        let mut cfg = BlogDraftConfig::default();
        cfg.search.sort = "random".into();
        assert!(cfg.validate().is_err());

        let mut cfg = BlogDraftConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn yaml_round_trip_keeps_overrides() {
        let mut cfg = BlogDraftConfig::default();
        cfg.lexicon.hashtags = Some(vec!["성수".into()]);
        let yaml = cfg.to_yaml().unwrap();
        assert!(yaml.contains("hashtags"));
        let back: BlogDraftConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, cfg);
    }
}
