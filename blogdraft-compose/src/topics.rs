use crate::lexicon::Lexicon;
use blogdraft_common::text::normalize;
use blogdraft_common::{DraftError, SearchResultItem};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TOPIC_ITEM_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicCategory {
    Parking,
    Waiting,
    Mood,
    Menu,
    Price,
}

impl TopicCategory {
    /// Also the order in which representatives are chosen.
    pub const ALL: [TopicCategory; 5] = [
        TopicCategory::Parking,
        TopicCategory::Waiting,
        TopicCategory::Mood,
        TopicCategory::Menu,
        TopicCategory::Price,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TopicCategory::Parking => "주차",
            TopicCategory::Waiting => "대기",
            TopicCategory::Mood => "분위기",
            TopicCategory::Menu => "메뉴",
            TopicCategory::Price => "가격",
        }
    }
}

/// Snippet sentences grouped by the categories they mention. Every
/// category is present, possibly with an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicHints {
    buckets: BTreeMap<TopicCategory, Vec<String>>,
}

impl Default for TopicHints {
    fn default() -> Self {
        Self {
            buckets: TopicCategory::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
        }
    }
}

impl TopicHints {
    pub fn bucket(&self, category: TopicCategory) -> &[String] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// One sentence per category, walking categories in [`TopicCategory::ALL`]
    /// order and skipping sentences an earlier category already claimed.
    pub fn representatives(&self) -> BTreeMap<TopicCategory, &str> {
        let mut chosen: BTreeMap<TopicCategory, &str> = BTreeMap::new();
        for category in TopicCategory::ALL {
            let pick = self
                .bucket(category)
                .iter()
                .map(String::as_str)
                .find(|s| !chosen.values().any(|taken| taken == s));
            if let Some(sentence) = pick {
                chosen.insert(category, sentence);
            }
        }
        chosen
    }

    fn push(&mut self, category: TopicCategory, sentence: String) {
        self.buckets.entry(category).or_default().push(sentence);
    }
}

/// Pattern-based multi-label classifier over snippet sentences.
#[derive(Debug, Clone)]
pub struct TopicHintClassifier {
    patterns: Vec<(TopicCategory, Regex)>,
    item_limit: usize,
}

impl TopicHintClassifier {
    pub fn new(lexicon: &Lexicon) -> Result<Self, DraftError> {
        let patterns = TopicCategory::ALL
            .into_iter()
            .map(|category| {
                let raw = lexicon.categories.pattern(category);
                RegexBuilder::new(raw)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (category, re))
                    .map_err(|e| {
                        DraftError::Config(format!("invalid {category:?} pattern {raw:?}: {e}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            item_limit: TOPIC_ITEM_LIMIT,
        })
    }

    pub fn matches(&self, category: TopicCategory, sentence: &str) -> bool {
        self.patterns
            .iter()
            .any(|(c, re)| *c == category && re.is_match(sentence))
    }

    /// Bucket `normalize(title + " " + description)` of the first ten items
    /// into every category whose pattern matches, preserving item order.
    pub fn classify(&self, items: &[SearchResultItem]) -> TopicHints {
        let mut hints = TopicHints::default();
        for item in items.iter().take(self.item_limit) {
            let sentence = normalize(&format!("{} {}", item.title, item.description));
            for (category, re) in &self.patterns {
                if re.is_match(&sentence) {
                    hints.push(*category, sentence.clone());
                }
            }
        }
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> TopicHintClassifier {
        TopicHintClassifier::new(&Lexicon::default()).unwrap()
    }

    fn item(title: &str, description: &str) -> SearchResultItem {
        SearchResultItem {
            title: title.into(),
            description: description.into(),
            ..SearchResultItem::default()
        }
    }

    #[test]
    fn empty_items_give_all_empty_buckets() {
        let hints = classifier().classify(&[]);
        assert!(hints.is_empty());
        for category in TopicCategory::ALL {
            assert!(hints.bucket(category).is_empty());
        }
        assert!(hints.representatives().is_empty());
    }

    #[test]
    fn parking_and_waiting_land_in_their_own_buckets() {
        let items = vec![item("주차가 편해요", ""), item("대기 없이 바로 입장", "")];
        let hints = classifier().classify(&items);
        assert_eq!(hints.bucket(TopicCategory::Parking), ["주차가 편해요"]);
        assert_eq!(hints.bucket(TopicCategory::Waiting), ["대기 없이 바로 입장"]);
        assert!(hints.bucket(TopicCategory::Mood).is_empty());
        assert!(hints.bucket(TopicCategory::Menu).is_empty());
        assert!(hints.bucket(TopicCategory::Price).is_empty());
    }

    #[test]
    fn one_sentence_may_join_several_buckets() {
        let items = vec![item("<b>분위기</b> 좋고", "커피 가격 5,000원 &amp; 주차 가능")];
        let hints = classifier().classify(&items);
        let sentence = "분위기 좋고 커피 가격 5,000원 & 주차 가능";
        for category in [
            TopicCategory::Parking,
            TopicCategory::Mood,
            TopicCategory::Menu,
            TopicCategory::Price,
        ] {
            assert_eq!(hints.bucket(category), [sentence], "{category:?}");
        }
        assert!(hints.bucket(TopicCategory::Waiting).is_empty());
    }

    #[test]
    fn representatives_do_not_repeat_sentences() {
        let items = vec![
            item("주차도 되고 분위기도 좋아요", ""),
            item("조용한 분위기의 카페", ""),
        ];
        let reps = classifier().representatives_for(&items);
        assert_eq!(reps[&TopicCategory::Parking], "주차도 되고 분위기도 좋아요");
        assert_eq!(reps[&TopicCategory::Mood], "조용한 분위기의 카페");
    }

    #[test]
    fn matching_ignores_case() {
        let c = classifier();
        assert!(c.matches(TopicCategory::Parking, "Free PARKING lot"));
        assert!(!c.matches(TopicCategory::Waiting, "Free PARKING lot"));
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let mut lexicon = Lexicon::default();
        lexicon.categories.price = "(unclosed".into();
        assert!(matches!(
            TopicHintClassifier::new(&lexicon),
            Err(DraftError::Config(_))
        ));
    }

    impl TopicHintClassifier {
        fn representatives_for(&self, items: &[SearchResultItem]) -> BTreeMap<TopicCategory, String> {
            self.classify(items)
                .representatives()
                .into_iter()
                .map(|(c, s)| (c, s.to_string()))
                .collect()
        }
    }
}
