use blogdraft_common::SearchResultItem;
use blogdraft_common::text::normalize;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Only the leading snippets feed the frequency table.
pub const KEYWORD_ITEM_LIMIT: usize = 10;
pub const TOP_KEYWORDS: usize = 8;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"[a-z0-9가-힣]{2,}").expect("static token pattern"))
}

/// Whether `word` is a whole token the extractor can produce.
pub(crate) fn is_token(word: &str) -> bool {
    token_pattern().find(word).is_some_and(|m| m.as_str() == word)
}

/// Frequency-ranked tokens from snippet titles, descriptions and dates.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: HashSet<String>,
    item_limit: usize,
    top_n: usize,
}

impl KeywordExtractor {
    pub fn new<S: AsRef<str>>(stopwords: &[S]) -> Self {
        Self {
            stopwords: stopwords
                .iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            item_limit: KEYWORD_ITEM_LIMIT,
            top_n: TOP_KEYWORDS,
        }
    }

    /// Up to eight tokens by descending count. Ties keep first-seen order.
    /// Stopwords and the query itself are never returned.
    pub fn extract(&self, items: &[SearchResultItem], keyword: &str) -> Vec<String> {
        let corpus = items
            .iter()
            .take(self.item_limit)
            .map(|item| {
                format!(
                    "{} {} {}",
                    normalize(&item.title),
                    normalize(&item.description),
                    normalize(&item.post_date)
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for token in token_pattern().find_iter(&corpus) {
            let token = token.as_str();
            match slots.get(token) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(token.to_string(), counts.len());
                    counts.push((token.to_string(), 1));
                }
            }
        }

        let query = keyword.trim().to_lowercase();
        counts.retain(|(token, _)| *token != query && !self.stopwords.contains(token));
        // stable: equal counts stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(self.top_n)
            .map(|(token, _)| token)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: &str) -> SearchResultItem {
        SearchResultItem {
            title: title.into(),
            description: description.into(),
            ..SearchResultItem::default()
        }
    }

    #[test]
    fn ranks_by_count_then_first_seen() {
        let items = vec![
            item("<b>성수</b> 베이글 맛집", "베이글 종류가 많고 커피도 좋아요"),
            item("성수 베이글", "주말 웨이팅 커피 커피"),
        ];
        let got = KeywordExtractor::new(&["좋아요"]).extract(&items, "성수");
        assert_eq!(
            got,
            vec!["베이글", "커피", "맛집", "종류가", "많고", "커피도", "주말", "웨이팅"]
        );
    }

    #[test]
    fn query_match_is_exact_after_trim_and_lowercase() {
        let items = vec![item("Seoul Cafe cafe", "CAFE latte")];
        let got = KeywordExtractor::new::<&str>(&[]).extract(&items, "  Cafe ");
        assert_eq!(got, vec!["seoul", "latte"]);
    }

    #[test]
    fn single_characters_and_symbols_are_not_tokens() {
        let items = vec![item("a b 빵 ★ ok", "")];
        assert_eq!(
            KeywordExtractor::new::<&str>(&[]).extract(&items, ""),
            vec!["ok"]
        );
    }

    #[test]
    fn post_dates_are_part_of_the_corpus() {
        let items = vec![SearchResultItem {
            post_date: "20240501".into(),
            ..SearchResultItem::default()
        }];
        assert_eq!(
            KeywordExtractor::new::<&str>(&[]).extract(&items, "x"),
            vec!["20240501"]
        );
    }

    #[test]
    fn only_first_ten_items_are_counted() {
        let mut items: Vec<_> = (0..10).map(|_| item("공통", "")).collect();
        items.push(item("열한번째", ""));
        let got = KeywordExtractor::new::<&str>(&[]).extract(&items, "");
        assert_eq!(got, vec!["공통"]);
    }

    #[test]
    fn empty_items_yield_nothing() {
        assert!(KeywordExtractor::new::<&str>(&[]).extract(&[], "성수").is_empty());
    }
}
