//! In-memory store for tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::Notice;
use crate::storage::NoticeStore;

/// Notice store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sections: Mutex<HashMap<String, Vec<Notice>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store already holding `notices` for `section`.
    pub fn with_notices(section: &str, notices: Vec<Notice>) -> Self {
        let mut sections = HashMap::new();
        sections.insert(section.to_string(), notices);
        Self {
            sections: Mutex::new(sections),
        }
    }
}

#[async_trait]
impl NoticeStore for MemoryStore {
    async fn contains(&self, section: &str, notice: &Notice) -> Result<bool> {
        let sections = self.sections.lock().await;
        Ok(sections
            .get(section)
            .is_some_and(|stored| stored.contains(notice)))
    }

    async fn insert(&self, section: &str, notice: &Notice) -> Result<()> {
        let mut sections = self.sections.lock().await;
        sections
            .entry(section.to_string())
            .or_default()
            .push(notice.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, section: &str, notice: &Notice) -> Result<bool> {
        let mut sections = self.sections.lock().await;
        let stored = sections.entry(section.to_string()).or_default();
        if stored.contains(notice) {
            return Ok(false);
        }
        stored.push(notice.clone());
        Ok(true)
    }

    async fn load(&self, section: &str) -> Result<Vec<Notice>> {
        let sections = self.sections.lock().await;
        Ok(sections.get(section).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_if_absent() {
        let store = MemoryStore::new();
        let notice = Notice::new("A", "t", "x");

        assert!(store.insert_if_absent("acad_ug", &notice).await.unwrap());
        assert!(!store.insert_if_absent("acad_ug", &notice).await.unwrap());
        assert_eq!(store.load("acad_ug").await.unwrap(), vec![notice]);
    }

    #[tokio::test]
    async fn test_sections_are_independent() {
        let notice = Notice::new("A", "t", "x");
        let store = MemoryStore::with_notices("acad_ug", vec![notice.clone()]);

        assert!(store.contains("acad_ug", &notice).await.unwrap());
        assert!(!store.contains("acad_pg", &notice).await.unwrap());
        assert!(store.load("bcrth").await.unwrap().is_empty());
    }
}
