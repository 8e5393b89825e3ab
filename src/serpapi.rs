//! Search API trait and the SerpAPI implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::result::OrganicResult;
use crate::{Config, CrawlQuery, Result, ReviewError};

/// Trait for search backends used by the crawler.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Returns the backend name.
    fn name(&self) -> &str;

    /// Runs `query` and returns its organic results in engine order.
    async fn search(&self, query: &CrawlQuery) -> Result<Vec<OrganicResult>>;
}

/// SerpAPI client.
pub struct SerpApi {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

impl SerpApi {
    /// Creates a client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("game-review-search/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.serpapi_endpoint.clone(),
            api_key: config.serp_api_key.clone(),
        })
    }

    /// Creates a client with a custom reqwest client.
    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SearchApi for SerpApi {
    fn name(&self) -> &str {
        "SerpAPI"
    }

    async fn search(&self, query: &CrawlQuery) -> Result<Vec<OrganicResult>> {
        let q = query.query_string();
        let num = query.num.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", q.as_str()),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
                ("engine", query.engine.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Status {
                service: "SerpAPI",
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SerpResponse = response.json().await?;
        Ok(parsed.organic_results)
    }
}
