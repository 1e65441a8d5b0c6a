//! Persisted notice store.
//!
//! One collection per section, keyed by the full notice. Records are only
//! ever added; nothing is updated or pruned.
//!
//! ## Directory Structure (`LocalStore`)
//!
//! ```text
//! storage/notices/
//! ├── acad_ug.json
//! ├── acad_pg.json
//! └── bcrth.json
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Notice;

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// On-disk form of one section's collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Time of the last insert
    pub updated_at: DateTime<Utc>,
    /// Number of stored notices
    pub count: usize,
    /// Stored notices in insertion order
    pub notices: Vec<Notice>,
}

impl Collection {
    pub fn new(notices: Vec<Notice>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: notices.len(),
            notices,
        }
    }
}

/// Trait for notice store backends.
///
/// `Ok(false)` from a lookup means "no such record"; an unreachable or
/// corrupt store is an `Err`.
#[async_trait]
pub trait NoticeStore: Send + Sync {
    /// Whether an identical notice is already stored for `section`.
    async fn contains(&self, section: &str, notice: &Notice) -> Result<bool>;

    /// Store `notice` for `section` unconditionally.
    async fn insert(&self, section: &str, notice: &Notice) -> Result<()>;

    /// Store `notice` unless an identical one exists, as a single atomic step.
    ///
    /// Returns whether the notice was inserted.
    async fn insert_if_absent(&self, section: &str, notice: &Notice) -> Result<bool>;

    /// All notices stored for `section`, in insertion order.
    async fn load(&self, section: &str) -> Result<Vec<Notice>>;
}
