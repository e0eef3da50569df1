//! JSON file holding saved reviews and the last draft note.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedReview {
    pub url: String,
    pub rating: u8,
    pub text: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct StoreData {
    reviews: Vec<SavedReview>,
    draft_note: Option<String>,
}

pub struct ReviewStore {
    path: PathBuf,
}

impl ReviewStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Append a review. Reviews are kept in insertion order.
    pub fn add_review(&self, url: &str, rating: u8, text: &str) -> Result<SavedReview> {
        anyhow::ensure!((1..=5).contains(&rating), "rating must be 1..=5, got {rating}");
        let text = text.trim();
        anyhow::ensure!(!text.is_empty(), "review text must not be empty");

        let review = SavedReview {
            url: url.trim().to_string(),
            rating,
            text: text.to_string(),
            saved_at: Utc::now(),
        };
        let mut data = self.read()?;
        data.reviews.push(review.clone());
        self.write(&data)?;
        tracing::info!(target: "store", count = data.reviews.len(), "store.review.added");
        Ok(review)
    }

    pub fn reviews(&self) -> Result<Vec<SavedReview>> {
        Ok(self.read()?.reviews)
    }

    pub fn note(&self) -> Result<Option<String>> {
        Ok(self.read()?.draft_note.filter(|n| !n.trim().is_empty()))
    }

    pub fn set_note(&self, note: &str) -> Result<()> {
        let mut data = self.read()?;
        data.draft_note = Some(note.to_string());
        self.write(&data)
    }

    pub fn clear_note(&self) -> Result<bool> {
        let mut data = self.read()?;
        let had = data.draft_note.take().is_some();
        self.write(&data)?;
        Ok(had)
    }

    fn read(&self) -> Result<StoreData> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(StoreData::default()),
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("corrupt store file: {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read store: {}", self.path.display()))
            }
        }
    }

    /// Write through a sibling temp file so a crash never leaves half a file.
    fn write(&self, data: &StoreData) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create store directory: {}", dir.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, data)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to replace store: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> ReviewStore {
        ReviewStore::open(tmp.path().join("nested").join("store.json"))
    }

    #[test]
    fn reviews_persist_in_insertion_order() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        assert!(s.reviews().unwrap().is_empty());

        s.add_review("https://a.example", 5, "최고예요").unwrap();
        s.add_review(" https://b.example ", 3, "  보통이에요 ").unwrap();

        let reopened = store(&tmp);
        let reviews = reopened.reviews().unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].url, "https://a.example");
        assert_eq!(reviews[1].url, "https://b.example");
        assert_eq!(reviews[1].text, "보통이에요");
        assert!(reviews[0].saved_at <= reviews[1].saved_at);
    }

    #[test]
    fn rating_and_text_are_validated() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        assert!(s.add_review("u", 0, "text").is_err());
        assert!(s.add_review("u", 6, "text").is_err());
        assert!(s.add_review("u", 4, "   ").is_err());
        assert!(s.reviews().unwrap().is_empty());
    }

    #[test]
    fn note_round_trip_and_clear() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        assert_eq!(s.note().unwrap(), None);

        s.set_note("라떼가 고소했어요").unwrap();
        s.add_review("u", 4, "좋아요").unwrap();
        assert_eq!(s.note().unwrap().as_deref(), Some("라떼가 고소했어요"));
        assert_eq!(s.reviews().unwrap().len(), 1);

        assert!(s.clear_note().unwrap());
        assert_eq!(s.note().unwrap(), None);
        assert!(!s.clear_note().unwrap());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = ReviewStore::open(&path).reviews().unwrap_err();
        assert!(err.to_string().contains("corrupt store file"));
    }
}
