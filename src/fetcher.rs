//! Post page retrieval used by comment enrichment.

use async_trait::async_trait;

use crate::Result;

/// Source of post page markup for [`crate::comments::CommentScraper`].
///
/// Implementations return the raw HTML of a review or board post; parsing
/// happens in [`crate::comments::parse_post`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the HTML of the post at `url`, failing on non-success status.
    async fn fetch(&self, url: &str) -> Result<String>;
}
