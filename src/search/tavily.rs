use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SearchHit, WebSearch};
use crate::config::Settings;
use crate::error::SearchError;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Configuration for the Tavily search client
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub api_key: String,
    /// "basic" or "advanced"
    pub search_depth: String,
    pub endpoint: String,
}

impl TavilyConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            search_depth: "basic".to_string(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(settings.require_tavily_key()?.to_string()))
    }
}

/// Tavily web-search client
pub struct TavilyClient {
    client: Client,
    config: TavilyConfig,
}

impl TavilyClient {
    pub fn new(config: TavilyConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let request = TavilySearchRequest {
            api_key: self.config.api_key.clone(),
            query: query.to_string(),
            max_results,
            search_depth: self.config.search_depth.clone(),
            include_raw_content: false,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Response(format!("HTTP {}: {}", status, body)));
        }

        let response: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Serialization(e.to_string()))?;

        debug!(query, results = response.results.len(), "tavily search complete");

        Ok(response.results)
    }
}

#[derive(Debug, Serialize)]
struct TavilySearchRequest {
    api_key: String,
    query: String,
    max_results: usize,
    search_depth: String,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "query": "quantum tunnelling",
            "results": [
                {"title": "Quantum tunnelling", "url": "https://a", "content": "Particles...", "score": 0.91},
                {"title": "No score", "url": "https://b", "content": "..."}
            ]
        }"#;

        let response: TavilySearchResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].url, "https://a");
        assert_eq!(response.results[0].score, Some(0.91));
        assert_eq!(response.results[1].score, None);
    }

    #[test]
    fn test_parse_result_without_url() {
        let json = r#"{"results": [{"title": "t", "content": "c"}]}"#;
        let response: TavilySearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results[0].url, "");
    }

    #[test]
    fn test_request_shape() {
        let request = TavilySearchRequest {
            api_key: "tvly-test".to_string(),
            query: "q".to_string(),
            max_results: 4,
            search_depth: "basic".to_string(),
            include_raw_content: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["max_results"], 4);
        assert_eq!(value["search_depth"], "basic");
    }
}
