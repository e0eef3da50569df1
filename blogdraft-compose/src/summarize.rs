use blogdraft_common::text::char_len;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub const MIN_SENTENCE_CHARS: usize = 18;
pub const MAX_SENTENCE_CHARS: usize = 140;
pub const MAX_SUMMARY_SENTENCES: usize = 5;

fn sentence_pattern() -> &'static Regex {
    static SENTENCE: OnceLock<Regex> = OnceLock::new();
    // A run of non-terminal text plus whatever terminal punctuation follows it.
    SENTENCE.get_or_init(|| Regex::new(r"[^.!?\r\n]+[.!?]*").expect("static sentence pattern"))
}

/// Rule-based extractive summariser: quotable sentences in first-seen order.
#[derive(Debug, Clone)]
pub struct SentenceSummarizer {
    min_chars: usize,
    max_chars: usize,
    max_sentences: usize,
}

impl Default for SentenceSummarizer {
    fn default() -> Self {
        Self {
            min_chars: MIN_SENTENCE_CHARS,
            max_chars: MAX_SENTENCE_CHARS,
            max_sentences: MAX_SUMMARY_SENTENCES,
        }
    }
}

impl SentenceSummarizer {
    /// Up to five distinct (case-insensitively) sentences of 18..=140 chars.
    pub fn summarize<S: AsRef<str>>(&self, bodies: &[S]) -> Vec<String> {
        let joined = bodies
            .iter()
            .map(|b| b.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        let mut seen = HashSet::new();
        sentence_pattern()
            .find_iter(&joined)
            .map(|m| m.as_str().trim())
            .filter(|s| (self.min_chars..=self.max_chars).contains(&char_len(s)))
            .filter(|s| seen.insert(s.to_lowercase()))
            .take(self.max_sentences)
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_bounds() {
        let bodies = [
            "짧다. 창가 자리는 햇살이 잘 들어와서 좋았어요! 메뉴판이 영어로도 되어 있어 편했어요?",
            "Good.\n두 번째 글에서도 직원분들이 친절하다는 이야기가 많았어요.",
        ];
        let out = SentenceSummarizer::default().summarize(&bodies);
        assert_eq!(
            out,
            vec![
                "창가 자리는 햇살이 잘 들어와서 좋았어요!",
                "메뉴판이 영어로도 되어 있어 편했어요?",
                "두 번째 글에서도 직원분들이 친절하다는 이야기가 많았어요.",
            ]
        );
    }

    #[test]
    fn drops_case_insensitive_duplicates() {
        let bodies = [
            "The coffee here is really smooth and rich. THE COFFEE HERE IS REALLY SMOOTH AND RICH.",
        ];
        let out = SentenceSummarizer::default().summarize(&bodies);
        assert_eq!(out, vec!["The coffee here is really smooth and rich."]);
    }

    #[test]
    fn drops_run_on_sentences() {
        let run_on = format!("{}.", "가".repeat(140));
        let ok = format!("{}.", "나".repeat(139));
        assert_eq!((char_len(&run_on), char_len(&ok)), (141, 140));
        let out = SentenceSummarizer::default().summarize(&[run_on, ok.clone()]);
        assert_eq!(out, vec![ok]);
    }

    #[test]
    fn caps_at_five() {
        let body = (1..=8)
            .map(|i| format!("이것은 충분히 긴 테스트 문장 번호 {i}입니다."))
            .collect::<Vec<_>>()
            .join(" ");
        let out = SentenceSummarizer::default().summarize(&[body]);
        assert_eq!(out.len(), 5);
        assert!(out[0].ends_with("1입니다."));
        assert!(out[4].ends_with("5입니다."));
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let none: [&str; 0] = [];
        assert!(SentenceSummarizer::default().summarize(&none).is_empty());
    }
}
