// src/services/sections.rs

//! Section crawler.
//!
//! Walks every listing page of one section and scrapes each notice the
//! listings point at, preserving listing order.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::Result;
use crate::models::{CrawlerConfig, Notice, NoticeErrorPolicy, NoticeRow, Section};
use crate::services::listing::ListingParser;
use crate::services::notices::NoticeParser;
use crate::utils::http::PageFetcher;

/// Pagination state of a section crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CrawlState {
    /// A listing page is due to be fetched
    FetchingPage(String),
    /// No next-page link remained
    Done,
}

/// Summary of one section crawl.
#[derive(Debug, Default)]
pub struct SectionCrawl {
    /// Section id
    pub section: String,
    /// Notices in listing order, duplicates included
    pub notices: Vec<Notice>,
    /// Listing pages fetched
    pub pages_visited: usize,
    /// Notices dropped under the skip policy
    pub skipped: usize,
}

/// Service for crawling all pages of a section.
pub struct SectionCrawler<'a> {
    fetcher: &'a dyn PageFetcher,
    config: &'a CrawlerConfig,
    base_url: Url,
    listing: ListingParser,
    notices: NoticeParser,
}

impl<'a> SectionCrawler<'a> {
    /// Create a new section crawler.
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        config: &'a CrawlerConfig,
        base_url: Url,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            config,
            base_url,
            listing: ListingParser::new()?,
            notices: NoticeParser::new()?,
        })
    }

    /// Crawl every listing page of `section`.
    pub async fn crawl(&self, section: &Section) -> Result<SectionCrawl> {
        let section_url = section.url(&self.base_url)?;
        let delay = Duration::from_millis(self.config.request_delay_ms);

        let mut outcome = SectionCrawl {
            section: section.id.clone(),
            ..SectionCrawl::default()
        };
        let mut visited = HashSet::new();
        let mut state = CrawlState::FetchingPage(section_url.to_string());

        while let CrawlState::FetchingPage(page_url) = state {
            if outcome.pages_visited > 0 && delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }

            log::info!("[{}] Fetching listing page {}", section.id, page_url);
            let html = self.fetcher.fetch_text(&page_url).await?;
            let page = self.listing.parse(&html, &section_url, &self.base_url)?;
            visited.insert(page_url);
            outcome.pages_visited += 1;

            log::debug!("[{}] {} notice rows", section.id, page.rows.len());
            self.scrape_rows(&page.rows, &section_url, &mut outcome).await?;

            state = match page.next_page {
                Some(next) if visited.contains(&next) => {
                    log::warn!(
                        "[{}] Next page {} was already visited, stopping",
                        section.id,
                        next
                    );
                    CrawlState::Done
                }
                Some(next) => CrawlState::FetchingPage(next),
                None => CrawlState::Done,
            };
        }

        log::info!(
            "[{}] Crawled {} notices over {} pages",
            section.id,
            outcome.notices.len(),
            outcome.pages_visited
        );
        Ok(outcome)
    }

    /// Scrape the notices of one listing page, appending them in row order.
    async fn scrape_rows(
        &self,
        rows: &[NoticeRow],
        section_url: &Url,
        outcome: &mut SectionCrawl,
    ) -> Result<()> {
        let concurrency = self.config.max_concurrent.max(1);
        let mut results = stream::iter(rows)
            .map(|row| async move {
                let result = self.notices.scrape(self.fetcher, row, section_url).await;
                (row, result)
            })
            .buffered(concurrency);

        while let Some((row, result)) = results.next().await {
            match result {
                Ok(notice) => outcome.notices.push(notice),
                Err(e)
                    if e.is_notice_failure()
                        && self.config.on_notice_error == NoticeErrorPolicy::Skip =>
                {
                    outcome.skipped += 1;
                    log::warn!(
                        "[{}] Skipping notice {}: {}",
                        outcome.section,
                        row.detail_url,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
