//! Draft composition for blog review posts.
//!
//! The analysers are independent and deterministic:
//!
//! - [`SentenceSummarizer`]: quotable sentences from acquired bodies
//! - [`KeywordExtractor`]: frequency-ranked snippet tokens
//! - [`TopicHintClassifier`]: snippet sentences bucketed by [`TopicCategory`]
//! - [`LengthFitter`]: grows or cuts a body into a [`LengthWindow`]
//!
//! [`DraftComposer`] wires them together with an optional
//! [`blogdraft_web::ContentAcquirer`] and produces a [`Composition`].
//! Language tables live in [`Lexicon`] and are passed in at construction.

pub mod compose;
pub mod fit;
pub mod keywords;
pub mod lexicon;
pub mod summarize;
pub mod topics;

pub use compose::{
    ComposeMode, ComposeSettings, ComposeStatus, Composition, Draft, DraftComposer, SimpleFields,
};
pub use fit::{LengthFitter, LengthWindow};
pub use keywords::KeywordExtractor;
pub use lexicon::{CategoryPatterns, Lexicon};
pub use summarize::SentenceSummarizer;
pub use topics::{TopicCategory, TopicHintClassifier, TopicHints};
