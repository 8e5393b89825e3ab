//! Site-restricted search query representation.

/// Default number of results requested per query.
pub const DEFAULT_RESULTS_PER_QUERY: u32 = 5;

/// Default search engine passed to the search API.
pub const DEFAULT_ENGINE: &str = "google";

/// A single keyword search restricted to one site on one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlQuery {
    /// The search keyword.
    pub keyword: String,
    /// Domain the search is restricted to.
    pub site: String,
    /// Search engine identifier understood by the search API.
    pub engine: String,
    /// Number of results to request.
    pub num: u32,
}

impl CrawlQuery {
    /// Creates a query for `keyword` on `site` with default engine and count.
    pub fn new(keyword: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            site: site.into(),
            engine: DEFAULT_ENGINE.to_string(),
            num: DEFAULT_RESULTS_PER_QUERY,
        }
    }

    /// Sets the search engine.
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sets the number of results to request.
    pub fn with_num(mut self, num: u32) -> Self {
        self.num = num;
        self
    }

    /// Returns the search string, e.g. `"로드나인 후기 site:inven.co.kr"`.
    pub fn query_string(&self) -> String {
        format!("{} site:{}", self.keyword, self.site)
    }
}
