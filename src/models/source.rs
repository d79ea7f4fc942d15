use serde::{Deserialize, Serialize};

/// A single retrieved web result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Subquestion whose search produced this result
    pub subquestion: String,
    pub title: String,
    /// Deduplication key; may be empty
    pub url: String,
    pub content: String,
    /// Provider relevance score, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Source {
    /// Whether this source carries a usable url
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}
