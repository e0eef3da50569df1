//! Common types and utilities shared across blogdraft crates.
//!
//! This crate defines the search-result data model, the text normaliser used
//! by every pipeline stage, observability helpers, and the shared error
//! taxonomy. It stays dependency-light so every crate can depend on it.
//!
//! # Overview
//!
//! - [`SearchResultItem`]: one snippet returned by the search collaborator
//! - [`text`]: markup stripping, entity decoding and whitespace collapsing
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`DraftError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use blogdraft_common::SearchResultItem;
//!
//! let item = SearchResultItem {
//!     title: "<b>성수</b> 카페 &amp; 디저트".into(),
//!     ..SearchResultItem::default()
//! };
//! assert_eq!(item.display().title, "성수 카페 & 디저트");
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;
pub mod text;

/// One search-result snippet as delivered by the search collaborator.
///
/// Every text field may still carry markup (`<b>` highlights) and HTML
/// entities; use [`SearchResultItem::display`] or [`text::normalize`] before
/// showing or analysing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "bloggername")]
    pub blogger_name: String,
    #[serde(default, rename = "postdate")]
    pub post_date: String,
    #[serde(default)]
    pub link: String,
}

/// Normalised, display-ready view of a [`SearchResultItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub title: String,
    pub blogger_name: String,
    pub post_date: String,
    pub description: String,
    pub link: String,
}

impl SearchResultItem {
    pub fn display(&self) -> ResultView {
        ResultView {
            title: text::normalize(&self.title),
            blogger_name: text::normalize(&self.blogger_name),
            post_date: text::normalize(&self.post_date),
            description: text::normalize(&self.description),
            link: self.link.trim().to_string(),
        }
    }
}

/// Which required input was missing from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInput {
    Keyword,
    SearchResults,
    ReviewText,
}

impl MissingInput {
    /// User-facing prompt asking for the missing input.
    pub fn prompt(self) -> &'static str {
        match self {
            MissingInput::Keyword => "검색어를 입력해 주세요.",
            MissingInput::SearchResults => "먼저 검색 결과를 불러와 주세요.",
            MissingInput::ReviewText => "후기 메모를 입력해 주세요.",
        }
    }
}

/// Error types used across the blogdraft workspace.
#[derive(thiserror::Error, Debug)]
pub enum DraftError {
    /// A query, snippet set or note was required but absent.
    #[error("{}", .0.prompt())]
    EmptyInput(MissingInput),

    /// One retrieval target failed or yielded too little text.
    #[error("acquisition miss for {target}: {reason}")]
    AcquisitionMiss { target: String, reason: String },

    /// No candidate link yielded usable text.
    #[error("본문을 가져올 수 있는 글이 없습니다. 다른 검색어로 다시 시도해 주세요.")]
    NoContent,

    /// Exporting the finished draft failed; the draft itself is fine.
    #[error("초안을 내보내지 못했습니다: {0}")]
    CopyFailure(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The search collaborator could not be reached or answered badly.
    #[error("검색 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요. ({0})")]
    Search(String),
}

/// Convenient alias for results that use [`DraftError`].
pub type Result<T> = std::result::Result<T, DraftError>;
