// src/models/section.rs

//! Board sections.

use url::Url;

use crate::error::Result;

/// An independently paginated part of the board with its own notice collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Collection name, e.g. `acad_ug`
    pub id: String,

    /// Path relative to the board root, e.g. `acad_ug/`
    pub path: String,
}

impl Section {
    /// Create a section whose id is the first segment of its path.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let id = path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self { id, path }
    }

    pub fn with_id(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// Root listing URL of this section; relative links on its pages resolve against it.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let path = self.path.trim_start_matches('/');
        if path.ends_with('/') {
            Ok(base.join(path)?)
        } else {
            Ok(base.join(&format!("{path}/"))?)
        }
    }
}
