//! Draft orchestration.
//!
//! [`DraftComposer`] owns the analysers and turns search snippets, the
//! user's note and (for body-derived drafts) acquired article bodies into a
//! [`Draft`]. Missing inputs and empty acquisitions are reported through
//! [`ComposeStatus`] rather than as errors.
use crate::fit::{LengthFitter, LengthWindow};
use crate::keywords::KeywordExtractor;
use crate::lexicon::Lexicon;
use crate::summarize::SentenceSummarizer;
use crate::topics::{TopicCategory, TopicHintClassifier, TopicHints};
use blogdraft_common::{DraftError, MissingInput, SearchResultItem};
use blogdraft_web::ContentAcquirer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_HASHTAG_COUNT: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub body: String,
    /// Tags including the leading `#`.
    pub hashtags: Vec<String>,
}

impl Draft {
    pub fn hashtag_line(&self) -> String {
        self.hashtags.join(" ")
    }

    /// Title, body and hashtag line separated by blank lines. Empty parts
    /// are left out.
    pub fn render(&self) -> String {
        let hashtags = self.hashtag_line();
        [self.title.as_str(), self.body.as_str(), hashtags.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "missing", rename_all = "snake_case")]
pub enum ComposeStatus {
    Ready,
    EmptyInput(MissingInput),
    NoContent,
}

impl ComposeStatus {
    pub fn is_ready(self) -> bool {
        self == ComposeStatus::Ready
    }

    /// User-facing status line.
    pub fn message(self) -> String {
        match self {
            ComposeStatus::Ready => "초안이 준비되었습니다.".to_string(),
            ComposeStatus::EmptyInput(missing) => DraftError::EmptyInput(missing).to_string(),
            ComposeStatus::NoContent => DraftError::NoContent.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub status: ComposeStatus,
    pub draft: Draft,
}

impl Composition {
    fn ready(draft: Draft) -> Self {
        Self {
            status: ComposeStatus::Ready,
            draft,
        }
    }

    fn empty(status: ComposeStatus) -> Self {
        Self {
            status,
            draft: Draft::default(),
        }
    }
}

/// Fields typed directly into the simple template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleFields {
    pub title: String,
    pub rating: u8,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeMode {
    Simple(SimpleFields),
    BodyDerived,
    Paragraph,
}

impl ComposeMode {
    pub fn name(&self) -> &'static str {
        match self {
            ComposeMode::Simple(_) => "simple",
            ComposeMode::BodyDerived => "body",
            ComposeMode::Paragraph => "paragraph",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ComposeSettings {
    pub window: LengthWindow,
    pub hashtag_count: usize,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            window: LengthWindow::default(),
            hashtag_count: DEFAULT_HASHTAG_COUNT,
        }
    }
}

pub struct DraftComposer {
    summarizer: SentenceSummarizer,
    keywords: KeywordExtractor,
    topics: TopicHintClassifier,
    fitter: LengthFitter,
    settings: ComposeSettings,
    hashtag_pool: Vec<String>,
    acquirer: Option<Arc<ContentAcquirer>>,
}

impl DraftComposer {
    pub fn new(lexicon: &Lexicon, settings: ComposeSettings) -> Result<Self, DraftError> {
        // re-validate in case the window was built as a literal
        let window = LengthWindow::new(settings.window.min, settings.window.max)?;
        Ok(Self {
            summarizer: SentenceSummarizer::default(),
            keywords: KeywordExtractor::new(&lexicon.stopwords),
            topics: TopicHintClassifier::new(lexicon)?,
            fitter: LengthFitter::new(&lexicon.filler_sentence)?,
            settings: ComposeSettings { window, ..settings },
            hashtag_pool: lexicon
                .hashtags
                .iter()
                .map(|t| tag_text(t))
                .filter(|t| !t.is_empty())
                .collect(),
            acquirer: None,
        })
    }

    /// Body-derived drafts need an acquirer. Without one every
    /// body-derived request ends in [`ComposeStatus::NoContent`].
    pub fn with_acquirer(mut self, acquirer: Arc<ContentAcquirer>) -> Self {
        self.acquirer = Some(acquirer);
        self
    }

    pub fn ranked_keywords(&self, items: &[SearchResultItem], keyword: &str) -> Vec<String> {
        self.keywords.extract(items, keyword)
    }

    pub fn topic_hints(&self, items: &[SearchResultItem]) -> TopicHints {
        self.topics.classify(items)
    }

    pub async fn compose(
        &self,
        items: &[SearchResultItem],
        review_text: &str,
        keyword: &str,
        mode: &ComposeMode,
    ) -> Composition {
        let keyword = keyword.trim();
        let review_text = review_text.trim();

        let composition = match mode {
            ComposeMode::Simple(fields) => self.simple(fields, review_text, keyword),
            ComposeMode::BodyDerived => self.body_derived(items, review_text, keyword).await,
            ComposeMode::Paragraph => self.paragraph(items, review_text, keyword),
        };
        tracing::info!(
            target: "compose",
            mode = mode.name(),
            status = ?composition.status,
            body_chars = composition.draft.body.chars().count(),
            "compose.done"
        );
        composition
    }

    fn simple(&self, fields: &SimpleFields, review_text: &str, keyword: &str) -> Composition {
        if review_text.is_empty() {
            return Composition::empty(ComposeStatus::EmptyInput(MissingInput::ReviewText));
        }

        let title = match fields.title.trim() {
            "" if keyword.is_empty() => "방문 후기".to_string(),
            "" => format!("{keyword} 방문 후기"),
            t => t.to_string(),
        };
        let rating = fields.rating.min(5);
        let stars = format!("{}{}", "★".repeat(rating.into()), "☆".repeat((5 - rating).into()));

        let mut body = format!("별점: {stars} ({rating}/5)\n");
        if !fields.url.trim().is_empty() {
            body.push_str(&format!("링크: {}\n", fields.url.trim()));
        }
        body.push('\n');
        body.push_str(review_text);

        let hashtags = self.hashtags(keyword, &[], 1);
        Composition::ready(Draft {
            title,
            body,
            hashtags,
        })
    }

    async fn body_derived(
        &self,
        items: &[SearchResultItem],
        review_text: &str,
        keyword: &str,
    ) -> Composition {
        if items.is_empty() {
            return Composition::empty(ComposeStatus::EmptyInput(MissingInput::SearchResults));
        }
        if keyword.is_empty() {
            return Composition::empty(ComposeStatus::EmptyInput(MissingInput::Keyword));
        }
        if review_text.is_empty() {
            return Composition::empty(ComposeStatus::EmptyInput(MissingInput::ReviewText));
        }

        let Some(acquirer) = self.acquirer.as_ref() else {
            tracing::warn!(target: "compose", "compose.body.no_acquirer");
            return Composition::empty(ComposeStatus::NoContent);
        };
        let bodies = acquirer
            .acquire_all(items.iter().map(|item| item.link.as_str()))
            .await;
        if bodies.is_empty() {
            return Composition::empty(ComposeStatus::NoContent);
        }

        let sentences = self.summarizer.summarize(&bodies);
        tracing::debug!(
            target: "compose",
            bodies = bodies.len(),
            sentences = sentences.len(),
            "compose.body.summarized"
        );

        let mut intro = format!("요즘 {keyword} 이야기가 많아서 직접 다녀왔어요.");
        if let Some(first) = sentences.first() {
            intro.push_str(&format!(" 미리 찾아본 글에서는 \"{first}\"라는 이야기가 눈에 띄었어요."));
        }
        let mut parts = vec![intro, review_text.to_string()];
        let support: Vec<&str> = sentences.iter().skip(1).take(3).map(String::as_str).collect();
        if !support.is_empty() {
            parts.push(format!("다른 후기들도 비슷했어요. {}", support.join(" ")));
        }
        parts.push(format!(
            "{keyword} 방문을 고민 중이라면 이 글이 도움이 되었으면 좋겠어요. 궁금한 점은 댓글로 남겨 주세요!"
        ));

        let body = self
            .fitter
            .fit_window(&parts.join("\n\n"), self.settings.window);
        let extra = ["내돈내산", "솔직후기"].map(String::from);
        Composition::ready(Draft {
            title: format!("{keyword} 다녀온 후기"),
            body,
            hashtags: self.hashtags(keyword, &extra, 4),
        })
    }

    fn paragraph(&self, items: &[SearchResultItem], note: &str, keyword: &str) -> Composition {
        if items.is_empty() {
            return Composition::empty(ComposeStatus::EmptyInput(MissingInput::SearchResults));
        }
        if keyword.is_empty() {
            return Composition::empty(ComposeStatus::EmptyInput(MissingInput::Keyword));
        }

        let ranked = self.keywords.extract(items, keyword);
        let query_parts: Vec<String> = keyword.split_whitespace().map(str::to_lowercase).collect();
        let words: Vec<&str> = ranked
            .iter()
            .map(String::as_str)
            .filter(|w| is_wordlike(w) && !query_parts.iter().any(|p| p == w))
            .collect();
        let hints = self.topics.classify(items);
        let reps = hints.representatives();
        let hint = |category: TopicCategory| reps.get(&category).copied();

        let summary = match words.as_slice() {
            [first, second, ..] => format!(
                "{keyword}, {first}·{second} 이야기가 많던 곳을 직접 다녀와 솔직하게 정리했어요."
            ),
            [first] => format!("{keyword}, {first} 이야기가 많던 곳을 직접 다녀와 솔직하게 정리했어요."),
            [] => format!("{keyword}, 직접 다녀와서 느낀 점을 솔직하게 정리했어요."),
        };

        let motivation = if words.is_empty() {
            format!("{keyword} 관련 후기가 많아서 궁금한 마음에 직접 다녀왔어요.")
        } else {
            let listed = words.iter().take(3).copied().collect::<Vec<_>>().join(", ");
            format!(
                "{keyword}{} 검색해 보니 {listed} 같은 이야기가 자주 보여서 직접 가 보기로 했어요.",
                object_particle(keyword)
            )
        };

        let ambience = match hint(TopicCategory::Mood) {
            Some(h) => format!("후기 중에는 이런 이야기도 있었어요. \"{h}\" 직접 가 보니 그 말이 무슨 뜻인지 알 것 같았어요."),
            None => "공간이 깔끔하고 편안해서 머무는 내내 기분이 좋았어요.".to_string(),
        };

        let mut menu = match hint(TopicCategory::Menu) {
            Some(h) => format!("메뉴 이야기도 빼놓을 수 없어요. \"{h}\""),
            None => "대표 메뉴 위주로 주문했는데 전반적으로 맛의 균형이 좋았어요.".to_string(),
        };
        menu.push('\n');
        menu.push_str(if note.is_empty() {
            "직접 먹어 보니 기대했던 만큼 만족스러웠어요."
        } else {
            note
        });

        let tips = [
            (
                TopicCategory::Waiting,
                "시간대에 따라 웨이팅이 있을 수 있으니 여유 있게 방문하세요.",
            ),
            (
                TopicCategory::Parking,
                "주차 공간이 넉넉하지 않을 수 있어 대중교통 이용을 추천해요.",
            ),
            (TopicCategory::Price, "메뉴 구성에 비하면 가격은 무난한 편이에요."),
        ]
        .into_iter()
        .map(|(category, fallback)| {
            format!("- {}: {}", category.label(), hint(category).unwrap_or(fallback))
        })
        .collect::<Vec<_>>()
        .join("\n");

        let closing = format!(
            "총평하자면 {keyword}, 다음에 또 방문하고 싶은 곳이에요. 참고가 되었으면 좋겠어요!"
        );

        let sections = [
            ("한 줄 요약", summary),
            ("방문 계기", motivation),
            ("분위기", ambience),
            ("메뉴와 맛", menu),
            ("이용 팁", tips),
            ("총평", closing),
        ];
        let assembled = sections
            .iter()
            .map(|(label, content)| format!("[{label}]\n{content}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let body = self.fitter.fit_window(&assembled, self.settings.window);

        let title = match words.as_slice() {
            [first, second, ..] => format!("{keyword} 방문 후기 | {first}, {second} 총정리"),
            _ => format!("{keyword} 방문 후기"),
        };
        let hashtags = tag_line(self.hashtag_pool.iter().cloned(), self.settings.hashtag_count);

        tracing::debug!(
            target: "compose",
            keywords = ranked.len(),
            hint_categories = reps.len(),
            "compose.paragraph.done"
        );
        Composition::ready(Draft {
            title,
            body,
            hashtags,
        })
    }

    /// `count` distinct tags: the keyword, then `preferred`, then the
    /// lexicon's defaults.
    fn hashtags(&self, keyword: &str, preferred: &[String], count: usize) -> Vec<String> {
        let candidates = std::iter::once(tag_text(keyword))
            .chain(preferred.iter().map(|t| tag_text(t)))
            .chain(self.hashtag_pool.iter().cloned());
        tag_line(candidates, count)
    }
}

/// First `count` distinct non-empty candidates, each prefixed with `#`.
fn tag_line<I: IntoIterator<Item = String>>(candidates: I, count: usize) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(count);
    for tag in candidates {
        if tags.len() >= count {
            break;
        }
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags.into_iter().map(|t| format!("#{t}")).collect()
}

/// Tag body without `#` or whitespace.
fn tag_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '#')
        .collect()
}

/// Purely numeric tokens (post dates) rank but read badly in prose.
fn is_wordlike(token: &str) -> bool {
    !token.chars().all(|c| c.is_ascii_digit())
}

/// 을 after a final consonant, 를 after a vowel.
fn object_particle(word: &str) -> &'static str {
    match word.chars().last() {
        Some(c @ '가'..='힣') => {
            if (u32::from(c) - 0xAC00) % 28 == 0 {
                "를"
            } else {
                "을"
            }
        }
        _ => "을(를)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> DraftComposer {
        DraftComposer::new(&Lexicon::default(), ComposeSettings::default()).unwrap()
    }

    fn items() -> Vec<SearchResultItem> {
        vec![
            SearchResultItem {
                title: "<b>성수</b> 카페 베이글 맛집".into(),
                description: "분위기 좋은 성수 카페, 주차는 근처 공영주차장".into(),
                post_date: "20240501".into(),
                link: "https://blog.example/1".into(),
                ..SearchResultItem::default()
            },
            SearchResultItem {
                title: "성수 카페 베이글".into(),
                description: "주말 웨이팅 30분, 베이글 가격 4,500원".into(),
                post_date: "20240502".into(),
                link: "https://blog.example/2".into(),
                ..SearchResultItem::default()
            },
        ]
    }

    #[tokio::test]
    async fn paragraph_has_six_sections_and_fits_window() {
        let c = composer();
        let out = c
            .compose(&items(), "크림치즈 베이글이 최고였어요.", "성수 카페", &ComposeMode::Paragraph)
            .await;
        assert_eq!(out.status, ComposeStatus::Ready);
        let body = &out.draft.body;
        for label in ["[한 줄 요약]", "[방문 계기]", "[분위기]", "[메뉴와 맛]", "[이용 팁]", "[총평]"] {
            assert!(body.contains(label), "missing {label}");
        }
        assert!(body.contains("크림치즈 베이글이 최고였어요."));
        let len = body.chars().count();
        assert!((1200..=2000).contains(&len), "len = {len}");
        let fixed: Vec<String> = Lexicon::default()
            .hashtags
            .iter()
            .map(|t| format!("#{t}"))
            .collect();
        assert_eq!(fixed.len(), 15);
        assert_eq!(out.draft.hashtags, fixed);
        assert_eq!(out.draft.title, "성수 카페 방문 후기 | 베이글, 맛집 총정리");
        assert!(body.contains("성수 카페를 검색해 보니 베이글, 맛집, 분위기 같은"));
    }

    #[tokio::test]
    async fn paragraph_hashtags_come_from_the_lexicon() {
        let lexicon = Lexicon {
            hashtags: vec!["성수".into(), "#베이글".into(), "성수".into(), "브런치".into()],
            ..Lexicon::default()
        };
        let c = DraftComposer::new(&lexicon, ComposeSettings::default()).unwrap();
        let out = c
            .compose(&items(), "", "성수 카페", &ComposeMode::Paragraph)
            .await;
        assert_eq!(out.draft.hashtags, vec!["#성수", "#베이글", "#브런치"]);
    }

    #[tokio::test]
    async fn paragraph_tips_prefer_hints() {
        let out = composer()
            .compose(&items(), "", "성수 카페", &ComposeMode::Paragraph)
            .await;
        assert!(out.draft.body.contains("- 대기: 성수 카페 베이글 주말 웨이팅 30분"));
        assert!(out.draft.body.contains("- 주차: 성수 카페 베이글 맛집 분위기 좋은"));
        assert!(out.draft.body.contains("직접 먹어 보니 기대했던 만큼"));
    }

    #[tokio::test]
    async fn paragraph_requires_results() {
        let out = composer()
            .compose(&[], "메모", "카페", &ComposeMode::Paragraph)
            .await;
        assert_eq!(
            out.status,
            ComposeStatus::EmptyInput(MissingInput::SearchResults)
        );
        assert_eq!(out.draft, Draft::default());
        assert_eq!(out.status.message(), "먼저 검색 결과를 불러와 주세요.");
    }

    #[tokio::test]
    async fn body_mode_checks_inputs_before_fetching() {
        let c = composer();
        let out = c.compose(&items(), "  ", "성수", &ComposeMode::BodyDerived).await;
        assert_eq!(out.status, ComposeStatus::EmptyInput(MissingInput::ReviewText));
        let out = c.compose(&items(), "좋았어요", "", &ComposeMode::BodyDerived).await;
        assert_eq!(out.status, ComposeStatus::EmptyInput(MissingInput::Keyword));
    }

    #[tokio::test]
    async fn body_mode_without_acquirer_is_no_content() {
        let out = composer()
            .compose(&items(), "좋았어요", "성수", &ComposeMode::BodyDerived)
            .await;
        assert_eq!(out.status, ComposeStatus::NoContent);
        assert!(out.draft.body.is_empty());
    }

    #[tokio::test]
    async fn simple_mode_uses_fields_verbatim() {
        let fields = SimpleFields {
            title: "내 카페 후기".into(),
            rating: 4,
            url: " https://blog.example/me ".into(),
        };
        let out = composer()
            .compose(&[], "커피가 맛있었어요.", "성수 카페", &ComposeMode::Simple(fields))
            .await;
        assert!(out.status.is_ready());
        assert_eq!(out.draft.title, "내 카페 후기");
        assert_eq!(
            out.draft.body,
            "별점: ★★★★☆ (4/5)\n링크: https://blog.example/me\n\n커피가 맛있었어요."
        );
        assert_eq!(out.draft.hashtags, vec!["#성수카페"]);
    }

    #[tokio::test]
    async fn simple_mode_needs_review_text() {
        let out = composer()
            .compose(&[], "", "", &ComposeMode::Simple(SimpleFields::default()))
            .await;
        assert_eq!(out.status, ComposeStatus::EmptyInput(MissingInput::ReviewText));
    }

    #[test]
    fn render_joins_parts_with_blank_lines() {
        let draft = Draft {
            title: "제목".into(),
            body: "본문".into(),
            hashtags: vec!["#a".into(), "#b".into()],
        };
        assert_eq!(draft.render(), "제목\n\n본문\n\n#a #b");
        assert_eq!(Draft::default().render(), "");
    }

    #[test]
    fn hashtags_are_deduplicated_and_capped() {
        let c = composer();
        let tags = c.hashtags("맛집 추천", &["맛집추천".into(), "베이글".into()], 4);
        assert_eq!(tags, vec!["#맛집추천", "#베이글", "#카페추천", "#내돈내산"]);
    }

    #[test]
    fn particles_follow_final_consonant() {
        assert_eq!(object_particle("성수 카페"), "를");
        assert_eq!(object_particle("을지로 맛집"), "을");
        assert_eq!(object_particle("cafe"), "을(를)");
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_value(ComposeStatus::EmptyInput(MissingInput::Keyword)).unwrap();
        assert_eq!(json["status"], "empty_input");
        assert_eq!(json["missing"], "keyword");
    }

    #[test]
    fn inverted_window_is_rejected() {
        let settings = ComposeSettings {
            window: LengthWindow { min: 10, max: 1 },
            ..ComposeSettings::default()
        };
        assert!(matches!(
            DraftComposer::new(&Lexicon::default(), settings),
            Err(DraftError::Config(_))
        ));
    }
}
