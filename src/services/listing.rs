// src/services/listing.rs

//! Listing page parser.
//!
//! A listing page keeps its notices in the table inside the top-aligned
//! content cell. Rows with exactly three cells are notices:
//!
//! ```text
//! | date | attachment marker (a.notice) | title link (a[href]) |
//! ```
//!
//! The last row of the table carries the pager. The pager's `font.text`
//! element holds an `a.notice` link to the next page; when that chain is
//! absent the section has no further pages.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::NoticeRow;
use crate::utils::resolve_url;

/// Cell count of a notice row.
const NOTICE_ROW_CELLS: usize = 3;

/// Everything extracted from one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Notice rows in page order
    pub rows: Vec<NoticeRow>,

    /// Absolute URL of the next page, `None` on the last page
    pub next_page: Option<String>,
}

/// Parser for listing pages.
pub struct ListingParser {
    content: Selector,
    table: Selector,
    row: Selector,
    cell: Selector,
    link: Selector,
    notice_link: Selector,
    pager: Selector,
}

impl ListingParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            content: parse_selector(r#"td[valign="top"]"#)?,
            table: parse_selector("table")?,
            row: parse_selector("tr")?,
            cell: parse_selector("td")?,
            link: parse_selector("a")?,
            notice_link: parse_selector("a.notice")?,
            pager: parse_selector("font.text")?,
        })
    }

    /// Parse a listing page.
    ///
    /// Detail links resolve against `section_url`, the next-page link against
    /// `base_url`.
    pub fn parse(&self, html: &str, section_url: &Url, base_url: &Url) -> Result<ListingPage> {
        let document = Html::parse_document(html);
        let context = format!("listing {section_url}");

        let table = document
            .select(&self.content)
            .next()
            .and_then(|content| content.select(&self.table).next())
            .ok_or_else(|| AppError::parse(&context, "notice table not found"))?;

        let rows: Vec<ElementRef> = table.select(&self.row).collect();
        let Some(last_row) = rows.last() else {
            return Err(AppError::parse(&context, "notice table has no rows"));
        };

        let mut notices = Vec::new();
        for row in &rows {
            let cells: Vec<ElementRef> = row.select(&self.cell).collect();
            if cells.len() != NOTICE_ROW_CELLS {
                continue;
            }

            let has_attachment = cells[1].select(&self.notice_link).next().is_some();
            let href = cells[2]
                .select(&self.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .ok_or_else(|| AppError::parse(&context, "notice row without a detail link"))?;

            notices.push(NoticeRow {
                detail_url: resolve_url(section_url, href)?,
                has_attachment,
            });
        }

        let next_page = self
            .next_href(*last_row)
            .map(|href| resolve_url(base_url, href))
            .transpose()?;

        Ok(ListingPage {
            rows: notices,
            next_page,
        })
    }

    fn next_href<'a>(&self, last_row: ElementRef<'a>) -> Option<&'a str> {
        last_row
            .select(&self.pager)
            .next()?
            .select(&self.notice_link)
            .next()?
            .value()
            .attr("href")
    }
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
