//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::Section;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Board root; section paths are joined onto it
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Sections to crawl, in crawl order
    #[serde(default = "defaults::sections")]
    pub sections: Vec<SectionConfig>,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Persisted store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or return defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Config not found at {:?}. Using defaults.", path.as_ref());
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| AppError::validation(format!("base_url is invalid: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation("base_url must be http or https"));
        }
        if self.sections.is_empty() {
            return Err(AppError::validation("No sections defined"));
        }
        let mut ids = HashSet::new();
        for section in self.sections() {
            if section.path.trim().is_empty() {
                return Err(AppError::validation("Section path is empty"));
            }
            if !ids.insert(section.id.clone()) {
                return Err(AppError::validation(format!(
                    "Duplicate section id '{}'",
                    section.id
                )));
            }
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        Ok(())
    }

    /// Parsed board root.
    pub fn base(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Resolved sections in declared order.
    pub fn sections(&self) -> Vec<Section> {
        self.sections.iter().map(SectionConfig::to_section).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            sections: defaults::sections(),
            crawler: CrawlerConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// One configured board section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Collection name; defaults to the first path segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Path relative to the board root, e.g. `acad_ug/`
    pub path: String,
}

impl SectionConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: None,
            path: path.into(),
        }
    }

    fn to_section(&self) -> Section {
        match &self.id {
            Some(id) => Section::with_id(id.clone(), self.path.clone()),
            None => Section::new(self.path.clone()),
        }
    }
}

/// What to do when a single notice cannot be scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoticeErrorPolicy {
    /// Abort the run on the first failing notice
    #[default]
    Abort,
    /// Log the failure and continue with the next notice
    Skip,
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between listing pages in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Notice pages fetched concurrently per listing page
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Failure handling for individual notices
    #[serde(default)]
    pub on_notice_error: NoticeErrorPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            on_notice_error: NoticeErrorPolicy::default(),
        }
    }
}

/// Persisted store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one JSON collection per section
    #[serde(default = "defaults::store_dir")]
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: defaults::store_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::SectionConfig;

    pub fn base_url() -> String {
        "http://noticeboard.iitkgp.ernet.in/".into()
    }
    pub fn sections() -> Vec<SectionConfig> {
        ["acad_ug/", "acad_pg/", "bcrth/"]
            .into_iter()
            .map(SectionConfig::new)
            .collect()
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; noticeboard/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        0
    }
    pub fn max_concurrent() -> usize {
        1
    }

    pub fn store_dir() -> PathBuf {
        PathBuf::from("storage/notices")
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
