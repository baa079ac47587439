//! Lead photo storage — a locally persisted PNG the shortcut runtime can
//! fetch by stored name.

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Bundled fallback returned when no photo is set or the file is unreadable.
const DEFAULT_PHOTO: &[u8] = include_bytes!("../../assets/default-lead.png");

pub struct LeadPhotoStore {
    dir: PathBuf,
}

impl LeadPhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// PNG bytes for the stored photo name. An empty name or an unreadable
    /// file falls back to the bundled default — this path never fails.
    pub async fn load(&self, name: &str) -> Vec<u8> {
        if name.is_empty() {
            return DEFAULT_PHOTO.to_vec();
        }
        match fs::read(self.dir.join(name)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(name, error = %e, "Falling back to default lead photo");
                DEFAULT_PHOTO.to_vec()
            }
        }
    }

    /// Persist picked image bytes under a fresh name, returning the name
    /// for the caller to store in settings.
    pub async fn save(&self, bytes: &[u8]) -> std::io::Result<String> {
        fs::create_dir_all(&self.dir).await?;
        let name = format!("{}.png", Uuid::new_v4());
        fs::write(self.dir.join(&name), bytes).await?;
        debug!(name = %name, "Lead photo saved");
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_name_returns_bundled_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadPhotoStore::new(dir.path());
        assert_eq!(store.load("").await, DEFAULT_PHOTO);
    }

    #[tokio::test]
    async fn missing_file_returns_bundled_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadPhotoStore::new(dir.path());
        assert_eq!(store.load("nope.png").await, DEFAULT_PHOTO);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadPhotoStore::new(dir.path());

        let name = store.save(b"fake png bytes").await.unwrap();
        assert!(name.ends_with(".png"));
        assert_eq!(store.load(&name).await, b"fake png bytes");
    }

    #[tokio::test]
    async fn saves_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadPhotoStore::new(dir.path());

        let a = store.save(b"one").await.unwrap();
        let b = store.save(b"two").await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn bundled_default_is_a_png() {
        assert_eq!(&DEFAULT_PHOTO[..8], b"\x89PNG\r\n\x1a\n");
    }
}
