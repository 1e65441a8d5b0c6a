//! Novelty detection against the persisted store.
//!
//! A crawled notice is new when no identical record exists in its section's
//! collection. New notices are stored as they are found, so filtering the same
//! crawl twice reports nothing the second time.

use crate::error::Result;
use crate::models::Notice;
use crate::storage::NoticeStore;

/// Filters crawled notices down to the ones not stored before.
pub struct NoveltyFilter<'a> {
    store: &'a dyn NoticeStore,
}

impl<'a> NoveltyFilter<'a> {
    pub fn new(store: &'a dyn NoticeStore) -> Self {
        Self { store }
    }

    /// Store every unseen notice of `section` and return those, in crawl order.
    pub async fn filter(&self, section: &str, notices: Vec<Notice>) -> Result<Vec<Notice>> {
        let mut new_notices = Vec::new();
        for notice in notices {
            if self.store.insert_if_absent(section, &notice).await? {
                log::debug!("[{}] New notice: {}", section, notice.title);
                new_notices.push(notice);
            }
        }
        Ok(new_notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn make_notice(title: &str) -> Notice {
        Notice::new(title, "12 Jan 2024 10:00", format!("{title} body"))
    }

    #[tokio::test]
    async fn test_reports_only_unseen() {
        let a = make_notice("A");
        let b = make_notice("B");
        let store = MemoryStore::with_notices("acad_ug", vec![a.clone()]);
        let filter = NoveltyFilter::new(&store);

        let new = filter
            .filter("acad_ug", vec![a.clone(), b.clone()])
            .await
            .unwrap();
        assert_eq!(new, vec![b.clone()]);
        assert_eq!(store.load("acad_ug").await.unwrap(), vec![a.clone(), b.clone()]);

        let again = filter.filter("acad_ug", vec![a.clone(), b.clone()]).await.unwrap();
        assert!(again.is_empty());
        assert_eq!(store.load("acad_ug").await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_second_pass_is_empty() {
        let store = MemoryStore::new();
        let filter = NoveltyFilter::new(&store);
        let crawl = vec![
            make_notice("A"),
            make_notice("B").with_attachment("http://x/b.pdf", "aa"),
            make_notice("C"),
        ];

        let first = filter.filter("acad_pg", crawl.clone()).await.unwrap();
        let second = filter.filter("acad_pg", crawl).await.unwrap();

        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_within_a_crawl_reported_once() {
        let store = MemoryStore::new();
        let filter = NoveltyFilter::new(&store);
        let a = make_notice("A");

        let new = filter
            .filter("acad_ug", vec![a.clone(), a.clone()])
            .await
            .unwrap();

        assert_eq!(new, vec![a]);
        assert_eq!(store.load("acad_ug").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_edited_text_is_a_new_record() {
        let original = make_notice("A");
        let edited = Notice {
            text: "A body (corrected)".into(),
            ..original.clone()
        };
        let store = MemoryStore::with_notices("acad_ug", vec![original]);

        let new = NoveltyFilter::new(&store)
            .filter("acad_ug", vec![edited.clone()])
            .await
            .unwrap();

        assert_eq!(new, vec![edited]);
        assert_eq!(store.load("acad_ug").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sections_do_not_share_records() {
        let a = make_notice("A");
        let store = MemoryStore::with_notices("acad_ug", vec![a.clone()]);

        let new = NoveltyFilter::new(&store)
            .filter("bcrth", vec![a.clone()])
            .await
            .unwrap();

        assert_eq!(new, vec![a]);
    }
}
