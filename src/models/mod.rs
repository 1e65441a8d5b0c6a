// src/models/mod.rs

//! Domain models for the crawler.
//!
//! This module contains the notice records, board sections and the
//! application configuration.

mod config;
mod notice;
mod section;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, LoggingConfig, NoticeErrorPolicy, SectionConfig, StoreConfig,
};
pub use notice::{Attachment, Notice, NoticeRow};
pub use section::Section;
