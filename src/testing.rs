//! Offline page fetcher for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::io::Cursor;

use crate::error::{AppError, Result};
use crate::utils::http::{ByteStream, PageFetcher};

/// Serves canned pages and attachments and records every requested URL.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, String>,
    attachments: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn attachment(mut self, url: &str, bytes: impl AsRef<[u8]>) -> Self {
        self.attachments.insert(url.to_string(), bytes.as_ref().to_vec());
        self
    }

    /// Requested URLs in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }
}

/// A 404 `reqwest` error, the same shape `HttpFetcher` returns.
fn not_found(url: &str) -> AppError {
    let response = http::Response::builder()
        .status(404)
        .body(format!("no fixture for {url}"))
        .unwrap();
    reqwest::Response::from(response)
        .error_for_status()
        .unwrap_err()
        .into()
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.record(url);
        self.pages.get(url).cloned().ok_or_else(|| not_found(url))
    }

    async fn fetch_stream(&self, url: &str) -> Result<ByteStream> {
        self.record(url);
        let bytes = self.attachments.get(url).cloned().ok_or_else(|| not_found(url))?;
        Ok(Box::pin(Cursor::new(bytes)))
    }
}
