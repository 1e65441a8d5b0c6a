//! Local filesystem store.
//!
//! Keeps one JSON document per section under the root directory. Each
//! collection is read once, cached, and rewritten atomically (temp file then
//! rename) after every insert.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::Notice;
use crate::storage::{Collection, NoticeStore};

/// Local filesystem store backend.
pub struct LocalStore {
    root_dir: PathBuf,
    cache: Mutex<HashMap<String, Vec<Notice>>>,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Path of a section's collection file.
    fn path(&self, section: &str) -> Result<PathBuf> {
        let valid = !section.is_empty()
            && section
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
        if !valid {
            return Err(AppError::store(format!("invalid section name '{section}'")));
        }
        Ok(self.root_dir.join(format!("{section}.json")))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read a section's collection, returning an empty one if the file doesn't exist.
    async fn read_collection(&self, section: &str) -> Result<Vec<Notice>> {
        let path = self.path(section)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let collection: Collection = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::store(format!("corrupt collection {}: {e}", path.display()))
                })?;
                Ok(collection.notices)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn write_collection(&self, section: &str, notices: &[Notice]) -> Result<()> {
        let path = self.path(section)?;
        let bytes = serde_json::to_vec_pretty(&Collection::new(notices.to_vec()))?;
        self.write_bytes(&path, &bytes).await
    }

    /// Persist `stored` plus `notice`, then update the cache.
    ///
    /// The cache only changes once the file is written, so a failed write
    /// leaves the notice unknown to later calls.
    async fn append(
        &self,
        section: &str,
        stored: &mut Vec<Notice>,
        notice: &Notice,
    ) -> Result<()> {
        let mut updated = stored.clone();
        updated.push(notice.clone());
        self.write_collection(section, &updated).await?;
        *stored = updated;
        Ok(())
    }

    /// Cached notices of `section`, loading them from disk on first use.
    async fn cached<'a>(
        &self,
        cache: &'a mut HashMap<String, Vec<Notice>>,
        section: &str,
    ) -> Result<&'a mut Vec<Notice>> {
        if !cache.contains_key(section) {
            let notices = self.read_collection(section).await?;
            log::debug!("Loaded {} stored notices for {}", notices.len(), section);
            cache.insert(section.to_string(), notices);
        }
        cache
            .get_mut(section)
            .ok_or_else(|| AppError::store(format!("collection {section} not cached")))
    }
}

#[async_trait]
impl NoticeStore for LocalStore {
    async fn contains(&self, section: &str, notice: &Notice) -> Result<bool> {
        let mut cache = self.cache.lock().await;
        let stored = self.cached(&mut cache, section).await?;
        Ok(stored.contains(notice))
    }

    async fn insert(&self, section: &str, notice: &Notice) -> Result<()> {
        let mut cache = self.cache.lock().await;
        let stored = self.cached(&mut cache, section).await?;
        self.append(section, stored, notice).await
    }

    async fn insert_if_absent(&self, section: &str, notice: &Notice) -> Result<bool> {
        let mut cache = self.cache.lock().await;
        let stored = self.cached(&mut cache, section).await?;
        if stored.contains(notice) {
            return Ok(false);
        }
        self.append(section, stored, notice).await?;
        Ok(true)
    }

    async fn load(&self, section: &str) -> Result<Vec<Notice>> {
        let mut cache = self.cache.lock().await;
        Ok(self.cached(&mut cache, section).await?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn notice(title: &str) -> Notice {
        Notice::new(title, "12 Jan 2024 10:00", "body")
    }

    #[tokio::test]
    async fn test_empty_section() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        assert!(store.load("acad_ug").await.unwrap().is_empty());
        assert!(!store.contains("acad_ug", &notice("A")).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        let a = notice("A");
        let b = notice("B").with_attachment("http://x/acad_ug/b.pdf", "ff00");

        {
            let store = LocalStore::new(tmp.path());
            assert!(store.insert_if_absent("acad_ug", &a).await.unwrap());
            store.insert("acad_ug", &b).await.unwrap();
        }

        let reopened = LocalStore::new(tmp.path());
        assert_eq!(reopened.load("acad_ug").await.unwrap(), vec![a.clone(), b]);
        assert!(reopened.contains("acad_ug", &a).await.unwrap());
        assert!(tmp.path().join("acad_ug.json").exists());
        assert!(!tmp.path().join("acad_ug.tmp").exists());
    }

    #[tokio::test]
    async fn test_insert_if_absent_skips_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let a = notice("A");

        assert!(store.insert_if_absent("acad_ug", &a).await.unwrap());
        assert!(!store.insert_if_absent("acad_ug", &a).await.unwrap());

        let bytes = std::fs::read(tmp.path().join("acad_ug.json")).unwrap();
        let collection: Collection = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(collection.count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_store_once() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let a = notice("A");

        let (first, second) = tokio::join!(
            store.insert_if_absent("acad_ug", &a),
            store.insert_if_absent("acad_ug", &a)
        );

        assert!(first.unwrap() ^ second.unwrap());
        assert_eq!(store.load("acad_ug").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_notice_unstored() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let a = notice("A");
        let blocker = tmp.path().join("acad_ug.tmp");
        std::fs::create_dir(&blocker).unwrap();

        assert!(store.insert_if_absent("acad_ug", &a).await.is_err());
        assert!(store.insert("acad_ug", &a).await.is_err());
        assert!(!store.contains("acad_ug", &a).await.unwrap());
        assert!(store.load("acad_ug").await.unwrap().is_empty());

        std::fs::remove_dir(&blocker).unwrap();
        assert!(store.insert_if_absent("acad_ug", &a).await.unwrap());

        let reopened = LocalStore::new(tmp.path());
        assert_eq!(reopened.load("acad_ug").await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn test_corrupt_collection_is_store_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("acad_ug.json"), b"{ not json").unwrap();
        let store = LocalStore::new(tmp.path());

        let err = store.contains("acad_ug", &notice("A")).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[tokio::test]
    async fn test_rejects_path_like_section() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());

        assert!(store.load("../etc").await.is_err());
        assert!(store.load("").await.is_err());
    }
}
