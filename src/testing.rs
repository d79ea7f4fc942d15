//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{LlmError, PublishError, SearchError};
use crate::llm::{GenerationRequest, ModelProfile, TextGenerator};
use crate::publish::DocumentPublisher;
use crate::search::{SearchHit, WebSearch};

/// Generator returning a fixed reply per profile and recording every request
pub struct ScriptedGenerator {
    planning: Result<String, String>,
    writing: Result<String, String>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(planning: Result<&str, &str>, writing: Result<&str, &str>) -> Self {
        Self {
            planning: planning.map(str::to_string).map_err(str::to_string),
            writing: writing.map(str::to_string).map_err(str::to_string),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests_for(&self, profile: ModelProfile) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.profile == profile)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = match request.profile {
            ModelProfile::Planning => &self.planning,
            ModelProfile::Writing => &self.writing,
        };
        reply.clone().map_err(LlmError::Response)
    }
}

/// Search returning canned hits per query; unknown queries return nothing
#[derive(Default)]
pub struct FakeSearch {
    results: HashMap<String, Result<Vec<SearchHit>, String>>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn with_hits(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.results.insert(query.to_string(), Ok(hits));
        self
    }

    pub fn with_failure(mut self, query: &str, message: &str) -> Self {
        self.results
            .insert(query.to_string(), Err(message.to_string()));
        self
    }
}

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        match self.results.get(query) {
            Some(Ok(hits)) => Ok(hits.iter().take(max_results).cloned().collect()),
            Some(Err(message)) => Err(SearchError::Response(message.clone())),
            None => Ok(vec![]),
        }
    }
}

/// Publisher that always fails
pub struct FailingPublisher;

#[async_trait]
impl DocumentPublisher for FailingPublisher {
    async fn publish(&self, _title: &str, _markdown: &str) -> Result<Option<String>, PublishError> {
        Err(PublishError::Rejected("document store unavailable".to_string()))
    }
}

/// Publisher that always returns the given link
pub struct LinkPublisher(pub &'static str);

#[async_trait]
impl DocumentPublisher for LinkPublisher {
    async fn publish(&self, _title: &str, _markdown: &str) -> Result<Option<String>, PublishError> {
        Ok(Some(self.0.to_string()))
    }
}

pub fn hit(title: &str, url: &str, content: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        content: content.to_string(),
        score: Some(0.5),
    }
}
