//! # game-review-search
//!
//! Collects review snippets for a game by combining LLM-generated review
//! sites and search keywords with a web search API.
//!
//! The pipeline has three steps:
//!
//! - Ask a text model ([`Bedrock`] by default) for review site domains and
//!   search keywords
//! - Search every engine × site × keyword combination through a
//!   [`SearchApi`] ([`SerpApi`] by default)
//! - Write the collected [`ReviewRecord`]s to a JSON file
//!
//! Community boards can also be crawled directly with
//! [`board::BoardCrawler`], which keeps recent posts and splits them into
//! one record per comment.
//!
//! ## Example
//!
//! ```rust,no_run
//! use game_review_search::{write_records, Bedrock, Config, Crawler, LlmClient, SerpApi};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let llm = LlmClient::new(Bedrock::new(&config)?);
//!
//!     let sites = llm.generate_sites().await?;
//!     let keywords = llm.generate_keywords("로드나인").await?;
//!
//!     let crawler = Crawler::new(SerpApi::new(&config)?);
//!     let records = crawler.crawl(&sites, &keywords).await?;
//!     write_records(&records, "reviews.json")?;
//!     Ok(())
//! }
//! ```

mod bedrock;
mod config;
mod crawler;
mod error;
mod extract;
mod llm;
mod query;
mod result;
mod serpapi;
mod writer;

pub mod board;
pub mod comments;
pub mod fetcher;
pub mod fetcher_http;

pub use bedrock::Bedrock;
pub use config::{Config, DEFAULT_MODEL_ID, DEFAULT_REGION, DEFAULT_SERPAPI_ENDPOINT};
pub use crawler::Crawler;
pub use error::{Result, ReviewError};
pub use extract::{extract_json, string_list};
pub use llm::{LlmClient, TextModel};
pub use query::{CrawlQuery, DEFAULT_ENGINE, DEFAULT_RESULTS_PER_QUERY};
pub use result::{OrganicResult, ReviewRecord, NO_CONTENT, NO_DATE, NO_TITLE, NO_URL};
pub use serpapi::{SearchApi, SerpApi};
pub use writer::{read_records, write_records, DEFAULT_OUTPUT_FILE};
