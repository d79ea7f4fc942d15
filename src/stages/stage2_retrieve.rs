use tracing::{info, warn};

use crate::models::{dedupe_by_url, ResearchPlan, Source};
use crate::search::WebSearch;

/// Configuration for Stage 2
#[derive(Debug, Clone)]
pub struct Stage2Config {
    /// Results requested per subquestion
    pub max_results_per_subquestion: usize,
}

impl Default for Stage2Config {
    fn default() -> Self {
        Self {
            max_results_per_subquestion: 4,
        }
    }
}

/// Result of Stage 2 retrieval
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    /// Deduplicated sources in discovery order
    pub sources: Vec<Source>,
    /// Subquestions whose search call failed
    pub failed_subquestions: Vec<String>,
    /// Results dropped as duplicate urls
    pub duplicates_removed: usize,
}

/// Execute Stage 2: one web search per subquestion.
///
/// Without a plan the query is the only subquestion. A failed search is logged
/// and skipped. Results are concatenated in subquestion order and then
/// deduplicated by url, keeping the first occurrence.
pub async fn retrieve_sources(
    search: &dyn WebSearch,
    plan: Option<&ResearchPlan>,
    query: &str,
    config: &Stage2Config,
) -> RetrievalResult {
    let subquestions: Vec<&str> = match plan {
        Some(plan) => plan.subquestions.iter().map(String::as_str).collect(),
        None => vec![query],
    };

    let mut collected = Vec::new();
    let mut failed_subquestions = Vec::new();

    for subquestion in subquestions {
        match search
            .search(subquestion, config.max_results_per_subquestion)
            .await
        {
            Ok(hits) => {
                info!("Subquestion {:?}: {} results", subquestion, hits.len());
                collected.extend(hits.into_iter().map(|hit| Source {
                    subquestion: subquestion.to_string(),
                    title: hit.title,
                    url: hit.url.trim().to_string(),
                    content: hit.content,
                    score: hit.score,
                }));
            }
            Err(e) => {
                warn!("Search failed for subquestion {:?}: {}", subquestion, e);
                failed_subquestions.push(subquestion.to_string());
            }
        }
    }

    let total = collected.len();
    let sources = dedupe_by_url(collected);
    let duplicates_removed = total - sources.len();

    info!(
        "Stage 2: {} sources ({} duplicates removed, {} failed searches)",
        sources.len(),
        duplicates_removed,
        failed_subquestions.len()
    );

    RetrievalResult {
        sources,
        failed_subquestions,
        duplicates_removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hit, FakeSearch};

    fn plan(subquestions: &[&str]) -> ResearchPlan {
        ResearchPlan {
            subquestions: subquestions.iter().map(|s| s.to_string()).collect(),
            focus: String::new(),
            source_preferences: String::new(),
        }
    }

    #[tokio::test]
    async fn test_one_search_per_subquestion_with_cap() {
        let search = FakeSearch::default();
        let plan = plan(&["a", "b", "c"]);

        retrieve_sources(&search, Some(&plan), "q", &Stage2Config::default()).await;

        let calls = search.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("a".to_string(), 4),
                ("b".to_string(), 4),
                ("c".to_string(), 4)
            ]
        );
    }

    #[tokio::test]
    async fn test_without_plan_searches_query() {
        let search = FakeSearch::default().with_hits("q", vec![hit("t", "https://a", "c")]);

        let result = retrieve_sources(&search, None, "q", &Stage2Config::default()).await;

        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].subquestion, "q");
    }

    #[tokio::test]
    async fn test_dedupes_across_subquestions_in_order() {
        let search = FakeSearch::default()
            .with_hits("a", vec![hit("a1", "https://1", ""), hit("a2", "https://2", "")])
            .with_hits("b", vec![hit("b1", "https://1", ""), hit("b2", "https://3", "")]);
        let plan = plan(&["a", "b"]);

        let result = retrieve_sources(&search, Some(&plan), "q", &Stage2Config::default()).await;

        let titles: Vec<&str> = result.sources.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2", "b2"]);
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.sources[2].subquestion, "b");
    }

    #[tokio::test]
    async fn test_urls_are_trimmed_before_dedupe() {
        let search = FakeSearch::default()
            .with_hits("a", vec![hit("a1", "https://1", "")])
            .with_hits("b", vec![hit("b1", " https://1 ", ""), hit("b2", "https://2\n", "")]);
        let plan = plan(&["a", "b"]);

        let result = retrieve_sources(&search, Some(&plan), "q", &Stage2Config::default()).await;

        let urls: Vec<&str> = result.sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://1", "https://2"]);
        assert_eq!(result.duplicates_removed, 1);
    }

    #[tokio::test]
    async fn test_failed_subquestion_is_skipped() {
        let search = FakeSearch::default()
            .with_failure("a", "rate limited")
            .with_hits("b", vec![hit("b1", "https://1", "")]);
        let plan = plan(&["a", "b"]);

        let result = retrieve_sources(&search, Some(&plan), "q", &Stage2Config::default()).await;

        assert_eq!(result.failed_subquestions, vec!["a"]);
        assert_eq!(result.sources.len(), 1);
        assert!(result.sources.iter().all(|s| s.subquestion != "a"));
    }

    #[tokio::test]
    async fn test_all_searches_failing_yields_no_sources() {
        let search = FakeSearch::default()
            .with_failure("a", "down")
            .with_failure("b", "down");
        let plan = plan(&["a", "b"]);

        let result = retrieve_sources(&search, Some(&plan), "q", &Stage2Config::default()).await;

        assert!(result.sources.is_empty());
        assert_eq!(result.failed_subquestions.len(), 2);
    }
}
