//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::Client;

use crate::fetcher::PageFetcher;
use crate::{Result, ReviewError};

// Community boards tend to reject obvious bot agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0 Safari/537.36";

/// A page fetcher that uses plain HTTP requests via reqwest.
///
/// Only server-rendered markup is visible; comments injected by JavaScript
/// after load are not.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` with a browser-like user agent.
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(BROWSER_USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Creates an `HttpFetcher` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReviewError::Status {
                service: "page fetch",
                status: status.as_u16(),
                body: String::new(),
            });
        }
        Ok(response.text().await?)
    }
}
