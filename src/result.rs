//! Search result and review record types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder for a result without a link.
pub const NO_URL: &str = "N/A";
/// Placeholder for a result without a title.
pub const NO_TITLE: &str = "제목 없음";
/// Placeholder for a result without a snippet.
pub const NO_CONTENT: &str = "내용 없음";
/// Placeholder for a result without a date.
pub const NO_DATE: &str = "날짜 없음";

/// One organic (non-paid) result item as returned by the search API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicResult {
    /// Result URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: Option<String>,
    /// Result title.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Result description/snippet.
    #[serde(default, deserialize_with = "lenient_string")]
    pub snippet: Option<String>,
    /// Date shown by the engine, free-form.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
}

/// Keeps string values and treats any other JSON value as absent, so one
/// odd item does not fail the whole response.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// A normalized review snippet collected from one search result.
///
/// Fields serialize in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Result URL, or [`NO_URL`].
    pub url: String,
    /// Result date, or [`NO_DATE`].
    pub date: String,
    /// Result title, or [`NO_TITLE`].
    pub title: String,
    /// Result snippet, or [`NO_CONTENT`].
    pub content: String,
    /// User comment scraped from the page; `None` for search-derived records.
    pub comment: Option<String>,
    /// Search engine that produced the result.
    pub source: String,
    /// Keyword that produced the result.
    pub keyword: String,
    /// Site the search was restricted to.
    pub site: String,
}

impl ReviewRecord {
    /// Builds a record from a search result, filling absent fields with
    /// placeholders.
    pub fn from_organic(
        result: OrganicResult,
        source: impl Into<String>,
        keyword: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        Self {
            url: result.link.unwrap_or_else(|| NO_URL.to_string()),
            date: result.date.unwrap_or_else(|| NO_DATE.to_string()),
            title: result.title.unwrap_or_else(|| NO_TITLE.to_string()),
            content: result.snippet.unwrap_or_else(|| NO_CONTENT.to_string()),
            comment: None,
            source: source.into(),
            keyword: keyword.into(),
            site: site.into(),
        }
    }

    /// Returns a copy carrying `comment`.
    pub fn with_comment(&self, comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..self.clone()
        }
    }

    /// Returns true if the record points at a real URL.
    pub fn has_url(&self) -> bool {
        self.url != NO_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> OrganicResult {
        OrganicResult {
            link: Some("https://x.com/review/1".to_string()),
            title: Some("Great game".to_string()),
            snippet: Some("Loved it".to_string()),
            date: Some("Mar 3, 2025".to_string()),
        }
    }

    #[test]
    fn test_from_organic_full() {
        let record = ReviewRecord::from_organic(full_result(), "google", "foo", "x.com");
        assert_eq!(record.url, "https://x.com/review/1");
        assert_eq!(record.title, "Great game");
        assert_eq!(record.content, "Loved it");
        assert_eq!(record.date, "Mar 3, 2025");
        assert_eq!(record.comment, None);
        assert_eq!(record.source, "google");
        assert_eq!(record.keyword, "foo");
        assert_eq!(record.site, "x.com");
        assert!(record.has_url());
    }

    #[test]
    fn test_from_organic_fallbacks() {
        let record = ReviewRecord::from_organic(OrganicResult::default(), "google", "k", "s");
        assert_eq!(record.url, "N/A");
        assert_eq!(record.title, "제목 없음");
        assert_eq!(record.content, "내용 없음");
        assert_eq!(record.date, "날짜 없음");
        assert!(!record.has_url());
    }

    #[test]
    fn test_organic_result_deserialization_partial() {
        let json = r#"{"position": 1, "link": "https://a.com", "displayed_link": "a.com"}"#;
        let result: OrganicResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.link.as_deref(), Some("https://a.com"));
        assert!(result.title.is_none());
        assert!(result.snippet.is_none());
        assert!(result.date.is_none());
    }

    #[test]
    fn test_organic_result_null_field_gets_placeholder() {
        let result: OrganicResult =
            serde_json::from_str(r#"{"link": null, "title": "t"}"#).unwrap();
        assert!(result.link.is_none());
        assert_eq!(result.title.as_deref(), Some("t"));

        let record = ReviewRecord::from_organic(result, "google", "k", "s");
        assert_eq!(record.url, "N/A");
        assert_eq!(record.title, "t");
        assert!(!record.has_url());
    }

    #[test]
    fn test_organic_result_non_string_field_is_absent() {
        let json = r#"{"link": "x", "title": ["a"], "snippet": {"text": "b"}, "date": 2024}"#;
        let result: OrganicResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.link.as_deref(), Some("x"));
        assert!(result.title.is_none());
        assert!(result.snippet.is_none());
        assert!(result.date.is_none());

        let record = ReviewRecord::from_organic(result, "google", "k", "s");
        assert_eq!(record.date, "날짜 없음");
        assert_eq!(record.title, "제목 없음");
        assert_eq!(record.content, "내용 없음");
    }

    #[test]
    fn test_with_comment() {
        let record = ReviewRecord::from_organic(full_result(), "google", "foo", "x.com");
        let commented = record.with_comment("첫 댓글");
        assert_eq!(commented.comment.as_deref(), Some("첫 댓글"));
        assert_eq!(commented.url, record.url);
        assert!(record.comment.is_none());
    }

    #[test]
    fn test_review_record_serialization_order() {
        let record = ReviewRecord::from_organic(full_result(), "google", "foo", "x.com");
        let json = serde_json::to_string(&record).unwrap();
        let keys = ["\"url\"", "\"date\"", "\"title\"", "\"content\"", "\"comment\"", "\"source\"", "\"keyword\"", "\"site\""];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"comment\":null"));
    }

    #[test]
    fn test_review_record_keeps_non_ascii() {
        let record = ReviewRecord::from_organic(OrganicResult::default(), "google", "후기", "s");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("후기"));
        assert!(json.contains("제목 없음"));
    }
}
