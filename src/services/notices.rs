// src/services/notices.rs

//! Notice detail page parser.
//!
//! A detail page lays a notice out over two table rows: the first holds the
//! title and time cells, the second the body `div` and, when the notice has
//! one, the attachment link.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Notice, NoticeRow};
use crate::services::fingerprint::fingerprint;
use crate::services::listing::parse_selector;
use crate::utils::http::PageFetcher;
use crate::utils::resolve_url;

/// Fields extracted from a detail page before any attachment is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticePage {
    pub title: String,
    pub time: String,
    pub text: String,
    /// Raw attachment href, if the body row links one
    pub attachment_href: Option<String>,
}

/// Parser for notice detail pages.
pub struct NoticeParser {
    row: Selector,
    cell: Selector,
    body: Selector,
    link: Selector,
}

impl NoticeParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            row: parse_selector("tr")?,
            cell: parse_selector("td")?,
            body: parse_selector("div")?,
            link: parse_selector("a")?,
        })
    }

    /// Extract title, time, body and attachment href from a detail page.
    pub fn parse(&self, html: &str) -> Result<NoticePage> {
        let document = Html::parse_document(html);
        let missing = |what: &str| AppError::parse("notice page", format!("{what} not found"));

        let mut rows = document.select(&self.row);
        let header = rows.next().ok_or_else(|| missing("header row"))?;
        let content = rows.next().ok_or_else(|| missing("content row"))?;

        let mut cells = header.select(&self.cell);
        let title = cells.next().ok_or_else(|| missing("title cell"))?;
        let time = cells.next().ok_or_else(|| missing("time cell"))?;
        let body = content
            .select(&self.body)
            .next()
            .ok_or_else(|| missing("body"))?;

        let attachment_href = content
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        Ok(NoticePage {
            title: text_of(title),
            time: text_of(time).trim().to_string(),
            text: text_of(body),
            attachment_href,
        })
    }

    /// Fetch and parse the notice a listing row points at.
    ///
    /// When the row is flagged as having an attachment, the attachment is
    /// resolved against `section_url`, streamed and fingerprinted.
    pub async fn scrape(
        &self,
        fetcher: &dyn PageFetcher,
        row: &NoticeRow,
        section_url: &Url,
    ) -> Result<Notice> {
        let html = fetcher.fetch_text(&row.detail_url).await?;
        let page = self.parse(&html).map_err(|e| match e {
            AppError::Parse { message, .. } => AppError::parse(&row.detail_url, message),
            other => other,
        })?;

        let mut notice = Notice::new(page.title, page.time, page.text);
        if row.has_attachment {
            let href = page.attachment_href.ok_or_else(|| {
                AppError::parse(&row.detail_url, "flagged attachment link not found")
            })?;
            let url = resolve_url(section_url, &href)?;
            let stream = fetcher.fetch_stream(&url).await?;
            let digest = fingerprint(stream).await?;
            log::debug!("Attachment {} -> {}", url, digest);
            notice = notice.with_attachment(url, digest);
        }

        Ok(notice)
    }
}

fn text_of(element: ElementRef) -> String {
    element.text().collect()
}
