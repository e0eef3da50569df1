use blogdraft_common::DraftError;
use blogdraft_common::text::char_len;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_CHARS: usize = 1200;
pub const DEFAULT_MAX_CHARS: usize = 2000;

/// Inclusive character window a composed body must land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthWindow {
    pub min: usize,
    pub max: usize,
}

impl Default for LengthWindow {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_CHARS,
            max: DEFAULT_MAX_CHARS,
        }
    }
}

impl LengthWindow {
    pub fn new(min: usize, max: usize) -> Result<Self, DraftError> {
        if min > max {
            return Err(DraftError::Config(format!(
                "length window min ({min}) exceeds max ({max})"
            )));
        }
        Ok(Self { min, max })
    }
}

/// Pads short bodies with a filler sentence and truncates long ones.
#[derive(Debug, Clone)]
pub struct LengthFitter {
    filler: String,
}

impl LengthFitter {
    pub fn new(filler: &str) -> Result<Self, DraftError> {
        let filler = filler.trim();
        if filler.is_empty() {
            return Err(DraftError::Config("filler sentence must not be empty".into()));
        }
        Ok(Self {
            filler: filler.to_string(),
        })
    }

    pub fn fit_window(&self, body: &str, window: LengthWindow) -> String {
        self.fit(body, window.min, window.max)
    }

    /// Bring `body` into `[min, max]` chars.
    ///
    /// Growth appends `"\n" + filler` until the minimum is reached. Anything
    /// longer than `max` is cut to exactly `max` chars, and a cut that does
    /// not end in `.`, `!` or `?` has its last char replaced with `.`.
    /// `min > max` is treated as `min == max`.
    ///
    /// ```
    /// use blogdraft_compose::LengthFitter;
    ///
    /// let fitter = LengthFitter::new("끝.").unwrap();
    /// assert_eq!(fitter.fit("가나다라마", 0, 3), "가나.");
    /// assert_eq!(fitter.fit("짧음", 6, 10), "짧음\n끝.\n끝.");
    /// ```
    pub fn fit(&self, body: &str, min: usize, max: usize) -> String {
        let min = min.min(max);
        let mut text = body.trim().to_string();
        let mut len = char_len(&text);
        let filler_len = char_len(&self.filler);

        while len < min {
            if !text.is_empty() {
                text.push('\n');
                len += 1;
            }
            text.push_str(&self.filler);
            len += filler_len;
            if len > max {
                break;
            }
        }

        if len > max {
            let mut cut: String = text.chars().take(max).collect();
            if !cut.ends_with(is_terminal) {
                cut.pop();
                if max > 0 {
                    cut.push('.');
                }
            }
            text = cut;
        }
        text
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILLER: &str = "돌아보니 다시 방문하고 싶을 만큼 만족스러운 시간이었어요.";

    fn fitter() -> LengthFitter {
        LengthFitter::new(FILLER).unwrap()
    }

    #[test]
    fn long_body_is_cut_to_exactly_max_with_terminal_punctuation() {
        let body = "가".repeat(2500);
        let out = fitter().fit(&body, 1200, 2000);
        assert_eq!(char_len(&out), 2000);
        assert!(out.ends_with('.'));
        assert!(out.starts_with(&"가".repeat(1999)));
    }

    #[test]
    fn cut_that_already_ends_in_punctuation_is_kept() {
        let body = format!("{}!{}", "a".repeat(9), "b".repeat(10));
        assert_eq!(fitter().fit(&body, 0, 10), format!("{}!", "a".repeat(9)));
    }

    #[test]
    fn short_body_grows_with_newline_separated_fillers() {
        let body = "나".repeat(500);
        let out = fitter().fit(&body, 1200, 2000);
        let len = char_len(&out);
        assert!((1200..=2000).contains(&len), "len = {len}");
        let tail = out.strip_prefix(body.as_str()).unwrap();
        let fillers: Vec<&str> = tail.split('\n').skip(1).collect();
        assert!(!fillers.is_empty());
        assert!(tail.starts_with('\n'));
        assert!(fillers.iter().all(|f| *f == FILLER));
    }

    #[test]
    fn body_inside_window_is_only_trimmed() {
        let body = format!("  {}  ", "다".repeat(1500));
        assert_eq!(fitter().fit(&body, 1200, 2000), "다".repeat(1500));
    }

    #[test]
    fn empty_body_starts_from_the_filler() {
        let out = fitter().fit("   ", 40, 2000);
        assert!(out.starts_with(FILLER));
        assert!(char_len(&out) >= 40);
    }

    #[test]
    fn inverted_window_collapses_to_max() {
        let out = fitter().fit("짧은 글", 500, 100);
        assert_eq!(char_len(&out), 100);
        assert!(out.ends_with(is_terminal));
    }

    #[test]
    fn zero_max_yields_empty() {
        assert_eq!(fitter().fit("무엇이든", 10, 0), "");
    }

    #[test]
    fn window_validation() {
        assert!(LengthWindow::new(10, 5).is_err());
        assert_eq!(LengthWindow::new(5, 5).unwrap(), LengthWindow { min: 5, max: 5 });
        assert!(LengthFitter::new("  ").is_err());
    }
}
