//! Plain-text normalisation shared by extraction, ranking and composition.

use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static tag pattern"))
}

/// Strip markup tags, decode HTML entities, collapse whitespace and trim.
///
/// Decoding can surface new markup (`&lt;b&gt;` becomes `<b>`), so passes
/// repeat until the text stops changing. Every pass that changes the text
/// also shortens it, which bounds the loop and makes the result idempotent.
///
/// ```
/// use blogdraft_common::text::normalize;
///
/// assert_eq!(normalize("<b>카페</b>&nbsp;&amp;\n 디저트 "), "카페 & 디저트");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut current = single_pass(raw);
    loop {
        let next = single_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn single_pass(raw: &str) -> String {
    let stripped = tag_pattern().replace_all(raw, "");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters, the unit every length threshold is expressed in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
