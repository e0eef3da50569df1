//! Static, versioned language tables consumed by the analysers.
//!
//! The tables are plain data handed to [`crate::KeywordExtractor`],
//! [`crate::TopicHintClassifier`] and [`crate::LengthFitter`] at
//! construction, so a deployment can swap or localise them through
//! configuration without touching the algorithms.
use crate::topics::TopicCategory;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LEXICON_VERSION: &str = "ko-2024.1";

const DEFAULT_STOPWORDS: &[&str] = &[
    // Korean connectives, intensifiers and blog boilerplate
    "그리고", "하지만", "그래서", "그런데", "정말", "너무", "진짜", "완전", "조금", "많이",
    "있는", "있어요", "있습니다", "없는", "없어요", "했어요", "합니다", "입니다", "있고",
    "이번", "오늘", "요즘", "다녀왔어요", "다녀온", "방문", "후기", "리뷰", "블로그",
    "포스팅", "소개", "추천", "정보",
    // English function words
    "the", "and", "for", "with", "this", "that", "from", "are", "was", "you", "our",
];

const DEFAULT_HASHTAGS: &[&str] = &[
    "맛집추천", "카페추천", "내돈내산", "솔직후기", "방문후기", "데이트코스", "주말나들이",
    "분위기좋은곳", "가볼만한곳", "일상기록", "맛스타그램", "카페스타그램", "재방문의사",
    "오늘의기록", "먹스타그램",
];

const DEFAULT_FILLER: &str = "돌아보니 다시 방문하고 싶을 만큼 만족스러운 시간이었어요.";

/// One regular expression per topic category, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatterns {
    pub parking: String,
    pub waiting: String,
    pub mood: String,
    pub menu: String,
    pub price: String,
}

impl Default for CategoryPatterns {
    fn default() -> Self {
        Self {
            parking: r"주차|발렛|parking|valet".into(),
            waiting: r"대기|웨이팅|줄을?\s?서|기다리|기다림|예약|waiting|queue|reservation".into(),
            mood: r"분위기|인테리어|감성|아늑|조용|뷰가|mood|atmosphere|interior|vibe".into(),
            menu: r"메뉴|맛있|맛집|음식|커피|디저트|시그니처|menu|taste|dessert|coffee".into(),
            price: r"가격|가성비|비싸|저렴|\d+\s?원|price|cheap|expensive".into(),
        }
    }
}

impl CategoryPatterns {
    pub fn pattern(&self, category: TopicCategory) -> &str {
        match category {
            TopicCategory::Parking => &self.parking,
            TopicCategory::Waiting => &self.waiting,
            TopicCategory::Mood => &self.mood,
            TopicCategory::Menu => &self.menu,
            TopicCategory::Price => &self.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub version: String,
    pub stopwords: Vec<String>,
    pub categories: CategoryPatterns,
    /// Tags (without `#`). Paragraph drafts use them as their fixed tag line;
    /// the other modes pad with them.
    pub hashtags: Vec<String>,
    /// Sentence appended by the length fitter when a body is too short.
    pub filler_sentence: String,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            version: DEFAULT_LEXICON_VERSION.to_string(),
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            categories: CategoryPatterns::default(),
            hashtags: DEFAULT_HASHTAGS.iter().map(|s| s.to_string()).collect(),
            filler_sentence: DEFAULT_FILLER.to_string(),
        }
    }
}
