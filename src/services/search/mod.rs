pub mod duckduckgo;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::PipelineError;
use crate::models::WebSearchResult;

pub const RESULTS_PER_QUERY: usize = 3;
pub const MAX_MERGED_RESULTS: usize = 5;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns up to `max_results` hits. An empty list is not an error.
    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<WebSearchResult>>;
}

/// Runs every query in order and merges the hits.
///
/// A failing query contributes nothing. Results are deduplicated by URL
/// (first occurrence wins), entries without a URL are always kept, and the
/// merged list is capped at [`MAX_MERGED_RESULTS`].
pub async fn multi_search(
    provider: &dyn SearchProvider,
    queries: &[String],
    max_results_per_query: usize,
) -> Vec<WebSearchResult> {
    let mut all_results = Vec::new();
    let mut failed = 0;

    for query in queries {
        match provider.search(query, max_results_per_query).await {
            Ok(results) => all_results.extend(results),
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, query = %query, "web search failed");
            }
        }
    }

    if failed > 0 {
        let degraded = PipelineError::SearchDegraded {
            failed,
            total: queries.len(),
        };
        tracing::warn!(error = %degraded, "continuing with partial search results");
    }

    dedup_and_truncate(all_results, MAX_MERGED_RESULTS)
}

fn dedup_and_truncate(results: Vec<WebSearchResult>, limit: usize) -> Vec<WebSearchResult> {
    let mut seen_urls = HashSet::new();
    results
        .into_iter()
        .filter(|r| r.url.is_empty() || seen_urls.insert(r.url.clone()))
        .take(limit)
        .collect()
}
