//! Comment enrichment for collected review records.
//!
//! Search snippets only carry a title and a short excerpt. For community
//! board posts the page itself holds the full body and the user comments;
//! [`CommentScraper`] fetches each record's page and fans the record out into
//! one record per comment.

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::fetcher::PageFetcher;
use crate::result::{NO_CONTENT, NO_TITLE};
use crate::{Result, ReviewError, ReviewRecord};

const TITLE_SELECTOR: &str = ".title_subject";
const BODY_SELECTOR: &str = ".write_div";
const COMMENT_SELECTOR: &str = ".comment_box .usertxt";

/// Content scraped from a single post page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPage {
    /// Post title, if present.
    pub title: Option<String>,
    /// Post body text, if present.
    pub body: Option<String>,
    /// User comments in page order.
    pub comments: Vec<String>,
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ReviewError::Parse(format!("Failed to parse selector: {:?}", e)))
}

pub(crate) fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Extracts title, body, and comments from post markup.
pub fn parse_post(html: &str) -> Result<PostPage> {
    let document = Html::parse_document(html);

    let title_selector = selector(TITLE_SELECTOR)?;
    let body_selector = selector(BODY_SELECTOR)?;
    let comment_selector = selector(COMMENT_SELECTOR)?;

    Ok(PostPage {
        title: document.select(&title_selector).next().and_then(element_text),
        body: document.select(&body_selector).next().and_then(element_text),
        comments: document
            .select(&comment_selector)
            .filter_map(element_text)
            .collect(),
    })
}

/// Fetches post pages and attaches their comments to review records.
pub struct CommentScraper {
    fetcher: Arc<dyn PageFetcher>,
}

impl CommentScraper {
    /// Creates a scraper using `fetcher`.
    pub fn new<F: PageFetcher + 'static>(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    /// Creates a scraper sharing an existing fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetches and parses the page at `url`.
    pub async fn scrape(&self, url: &str) -> Result<PostPage> {
        let html = self.fetcher.fetch(url).await?;
        parse_post(&html)
    }

    /// Expands each record into one record per comment found on its page.
    ///
    /// Records without a URL, or whose page cannot be fetched, are kept
    /// unchanged. A page title or body replaces the corresponding
    /// placeholder. A page without comments keeps a single record with no
    /// comment.
    pub async fn enrich(&self, records: Vec<ReviewRecord>) -> Vec<ReviewRecord> {
        let mut enriched = Vec::with_capacity(records.len());

        for mut record in records {
            if !record.has_url() {
                enriched.push(record);
                continue;
            }

            let page = match self.scrape(&record.url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Skipping comments for {}: {}", record.url, e);
                    enriched.push(record);
                    continue;
                }
            };
            debug!("{} has {} comments", record.url, page.comments.len());

            if record.title == NO_TITLE {
                if let Some(title) = page.title {
                    record.title = title;
                }
            }
            if record.content == NO_CONTENT {
                if let Some(body) = page.body {
                    record.content = body;
                }
            }

            if page.comments.is_empty() {
                enriched.push(record);
            } else {
                enriched.extend(page.comments.iter().map(|c| record.with_comment(c.as_str())));
            }
        }

        info!("Enriched records: {}", enriched.len());
        enriched
    }
}
