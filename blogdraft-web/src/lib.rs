//! Web discovery and acquisition utilities.
//!
//! - Blog search collaborator client (`search`) for snippets
//! - Document fetching trait and HTTP-backed implementation (`fetch`)
//! - Selector-based readable-text extraction (`extract`)
//! - Ordered proxy/raw retrieval with a minimum-length gate (`acquire`)

pub mod acquire;
pub mod extract;
pub mod fetch;
pub mod search;

pub use acquire::{AcquireSettings, ContentAcquirer, RetrievalTarget};
pub use extract::ExtractRules;
pub use fetch::{DocumentFetcher, HttpFetcher};
pub use search::{BlogSearchApi, SearchSettings};
