// src/utils/http.rs

//! HTTP client utilities.

use std::io;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use futures::io::AsyncRead;

use crate::error::Result;
use crate::models::CrawlerConfig;

/// Streamed response body.
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// Source of board pages and attachments.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a page and return its body as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// GET a resource and return its body as a stream, without buffering it.
    async fn fetch_stream(&self, url: &str) -> Result<ByteStream>;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// `PageFetcher` backed by one shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build the client from crawler settings.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        Ok(self.get(url).await?.text().await?)
    }

    async fn fetch_stream(&self, url: &str) -> Result<ByteStream> {
        log::debug!("GET {} (streamed)", url);
        let body = Box::pin(
            self.get(url)
                .await?
                .bytes_stream()
                .map_err(io::Error::other),
        );
        Ok(Box::pin(body.into_async_read()))
    }
}
