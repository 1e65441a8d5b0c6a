// src/pipeline/crawl.rs

//! Notice crawling pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, Notice};
use crate::pipeline::NoveltyFilter;
use crate::services::SectionCrawler;
use crate::storage::{LocalStore, NoticeStore};
use crate::utils::http::{HttpFetcher, PageFetcher};

/// New notices found in a run, keyed by section id.
pub type NewNotices = BTreeMap<String, Vec<Notice>>;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "NOTICEBOARD_CONFIG";

/// Configuration file used when `NOTICEBOARD_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "storage/config.toml";

/// Crawl every configured section, in declared order, and keep the new notices.
///
/// The first unrecovered error aborts the whole run; no partial result is
/// returned.
pub async fn run_crawler(
    config: &Config,
    fetcher: &dyn PageFetcher,
    store: &dyn NoticeStore,
) -> Result<NewNotices> {
    let start_time = Utc::now();
    let sections = config.sections();
    log::info!("Crawling {} section(s) of {}", sections.len(), config.base_url);

    let crawler = SectionCrawler::new(fetcher, &config.crawler, config.base()?)?;
    let filter = NoveltyFilter::new(store);
    let mut new_notices = NewNotices::new();

    for section in &sections {
        let crawl = crawler.crawl(section).await?;
        let crawled = crawl.notices.len();
        let fresh = filter.filter(&section.id, crawl.notices).await?;

        log::info!(
            "[{}] {} page(s), {} crawled, {} skipped, {} new",
            section.id,
            crawl.pages_visited,
            crawled,
            crawl.skipped,
            fresh.len()
        );
        new_notices.insert(section.id.clone(), fresh);
    }

    let total: usize = new_notices.values().map(Vec::len).sum();
    log::info!(
        "Run finished in {}s: {} new notice(s)",
        (Utc::now() - start_time).num_seconds(),
        total
    );
    Ok(new_notices)
}

/// Crawl with the configuration file named by `NOTICEBOARD_CONFIG`.
///
/// Builds the HTTP fetcher and the local store from that configuration. A
/// missing file means defaults; an unreadable or malformed one fails the run.
pub async fn scrape() -> Result<NewNotices> {
    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load_or_default(&path)?;
    scrape_with(&config).await
}

/// Crawl with an already loaded configuration.
pub async fn scrape_with(config: &Config) -> Result<NewNotices> {
    config.validate()?;
    let fetcher = HttpFetcher::from_config(&config.crawler)?;
    let store = LocalStore::new(&config.store.dir);
    run_crawler(config, &fetcher, &store).await
}
