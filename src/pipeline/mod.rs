//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl every section and keep the notices not seen before
//! - `scrape`: Same, with configuration, HTTP client and store built from the
//!   configuration file

pub mod crawl;
pub mod novelty;

pub use crawl::{NewNotices, run_crawler, scrape, scrape_with};
pub use novelty::NoveltyFilter;
