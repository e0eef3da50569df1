//! Readable-text extraction from fetched HTML.
//!
//! Selectors are tried in order; the first one whose matches contain at
//! least one chunk longer than `min_chunk_chars` supplies the text. Shorter
//! matches are treated as navigation or boilerplate. When no selector
//! yields a chunk the whole document's visible text is used instead.
use blogdraft_common::DraftError;
use blogdraft_common::text::{char_len, normalize};
use scraper::{ElementRef, Html, Node, Selector};

/// Containers that commonly hold article bodies, most specific first.
pub const DEFAULT_SELECTORS: &[&str] = &[
    ".se-main-container",
    "#postViewArea",
    ".post_ct",
    "#post-area",
    "article",
    ".entry-content",
    ".post-content",
    "main",
    "#content",
];

pub const DEFAULT_MIN_CHUNK_CHARS: usize = 80;

const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug)]
pub struct ExtractRules {
    selectors: Vec<Selector>,
    min_chunk_chars: usize,
}

impl Default for ExtractRules {
    fn default() -> Self {
        let selectors = DEFAULT_SELECTORS
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect();
        Self {
            selectors,
            min_chunk_chars: DEFAULT_MIN_CHUNK_CHARS,
        }
    }
}

impl ExtractRules {
    /// Compile an ordered selector list. Any unparsable selector is a
    /// configuration error.
    pub fn new<S: AsRef<str>>(selectors: &[S], min_chunk_chars: usize) -> Result<Self, DraftError> {
        let selectors = selectors
            .iter()
            .map(|raw| {
                Selector::parse(raw.as_ref()).map_err(|e| {
                    DraftError::Config(format!("invalid selector {:?}: {e:?}", raw.as_ref()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            selectors,
            min_chunk_chars,
        })
    }

    /// Readable text of `html`, normalised. May be empty.
    pub fn readable_text(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        for selector in &self.selectors {
            let chunks: Vec<String> = document
                .select(selector)
                .map(|el| normalize(&element_text(el)))
                .filter(|chunk| char_len(chunk) > self.min_chunk_chars)
                .collect();
            if !chunks.is_empty() {
                tracing::trace!(
                    target: "web.extract",
                    chunk_count = chunks.len(),
                    "extract.selector.hit"
                );
                return chunks.join(" ");
            }
        }

        normalize(&element_text(document.root_element()))
    }
}

/// Visible text under `root`, with text nodes separated by spaces and
/// script-like subtrees skipped.
fn element_text(root: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| SKIP_TAGS.contains(&el.name()))
        });
        if !hidden {
            parts.push(&**text);
        }
    }
    parts.join(" ")
}
