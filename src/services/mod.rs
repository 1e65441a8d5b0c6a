//! Service layer for the crawler.
//!
//! This module contains the board-specific scraping logic:
//! - Listing page parsing (`ListingParser`)
//! - Notice detail parsing (`NoticeParser`)
//! - Attachment fingerprinting (`fingerprint`)
//! - Paginated section crawling (`SectionCrawler`)

pub mod fingerprint;
mod listing;
mod notices;
mod sections;

pub use fingerprint::{CHUNK_SIZE, fingerprint, fingerprint_with_chunk_size};
pub use listing::{ListingPage, ListingParser};
pub use notices::{NoticePage, NoticeParser};
pub use sections::{SectionCrawl, SectionCrawler};
