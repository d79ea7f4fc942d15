use serde::{Deserialize, Serialize};

/// Focus text used when the planner cannot produce one
pub const FALLBACK_FOCUS: &str = "General overview of the topic.";

/// Source-preference text used when the planner cannot produce one
pub const FALLBACK_SOURCE_PREFERENCES: &str = "Mixed high-quality web sources.";

/// Decomposition of a query into subquestions plus guidance text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPlan {
    /// Ordered subquestions, never empty
    pub subquestions: Vec<String>,
    /// Short statement of what the report should focus on
    pub focus: String,
    /// Which kinds of sources to prefer
    pub source_preferences: String,
}

impl ResearchPlan {
    /// The fixed single-subquestion plan used when planning fails
    pub fn fallback(query: &str) -> Self {
        Self {
            subquestions: vec![query.to_string()],
            focus: FALLBACK_FOCUS.to_string(),
            source_preferences: FALLBACK_SOURCE_PREFERENCES.to_string(),
        }
    }
}

/// Plan shape as emitted by the language model; every field may be missing
#[derive(Debug, Default, Deserialize)]
pub struct RawPlan {
    #[serde(default)]
    pub subquestions: Vec<String>,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub source_preferences: Option<String>,
}
