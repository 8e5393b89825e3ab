//! Crawl orchestration over engines, sites, and keywords.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::query::{DEFAULT_ENGINE, DEFAULT_RESULTS_PER_QUERY};
use crate::{CrawlQuery, ReviewRecord, Result, SearchApi};

/// Runs one search per (engine, site, keyword) combination and collects
/// every organic result as a [`ReviewRecord`].
pub struct Crawler {
    api: Arc<dyn SearchApi>,
    engines: Vec<String>,
    results_per_query: u32,
}

impl Crawler {
    /// Creates a crawler using `api` with the default engine and count.
    pub fn new<A: SearchApi + 'static>(api: A) -> Self {
        Self::with_api(Arc::new(api))
    }

    /// Creates a crawler sharing an existing search backend.
    pub fn with_api(api: Arc<dyn SearchApi>) -> Self {
        Self {
            api,
            engines: vec![DEFAULT_ENGINE.to_string()],
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
        }
    }

    /// Sets the engines to query, in order.
    pub fn with_engines(mut self, engines: Vec<String>) -> Self {
        self.engines = engines;
        self
    }

    /// Sets the number of results requested per query.
    pub fn with_results_per_query(mut self, num: u32) -> Self {
        self.results_per_query = num;
        self
    }

    /// Returns the configured engines.
    pub fn engines(&self) -> &[String] {
        &self.engines
    }

    /// Returns the number of queries a crawl over `sites` and `keywords`
    /// will issue.
    pub fn query_count(&self, sites: &[String], keywords: &[String]) -> usize {
        self.engines.len() * sites.len() * keywords.len()
    }

    /// Searches every combination sequentially.
    ///
    /// Records are ordered by engine, then site, then keyword, then the
    /// engine's own result order. The first failed request aborts the crawl
    /// and no partial results are returned.
    pub async fn crawl(&self, sites: &[String], keywords: &[String]) -> Result<Vec<ReviewRecord>> {
        let start = Instant::now();
        let mut records = Vec::new();

        info!(
            "Crawling {} queries via {}",
            self.query_count(sites, keywords),
            self.api.name()
        );

        for engine in &self.engines {
            for site in sites {
                for keyword in keywords {
                    let query = CrawlQuery::new(keyword.as_str(), site.as_str())
                        .with_engine(engine.as_str())
                        .with_num(self.results_per_query);
                    info!("Searching '{}' on {} (engine: {})", keyword, site, engine);

                    let results = self.api.search(&query).await?;
                    debug!(
                        "{} '{}' returned {} results, first: {:?}",
                        engine,
                        query.query_string(),
                        results.len(),
                        &results[..results.len().min(2)]
                    );

                    records.extend(results.into_iter().map(|result| {
                        ReviewRecord::from_organic(result, engine.as_str(), keyword.as_str(), site.as_str())
                    }));
                }
            }
        }

        info!(
            "Collected {} records in {}ms",
            records.len(),
            start.elapsed().as_millis()
        );
        Ok(records)
    }
}
