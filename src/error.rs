use thiserror::Error;

use crate::models::{PipelineStage, ResearchState};

/// Errors from the language-generation service
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to language model failed: {0}")]
    Http(String),
    #[error("language model returned an error response: {0}")]
    Response(String),
    #[error("could not decode language model response: {0}")]
    Serialization(String),
}

/// Errors from the web-search service
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(String),
    #[error("search provider returned an error response: {0}")]
    Response(String),
    #[error("could not decode search response: {0}")]
    Serialization(String),
}

/// Errors from the document-publish service
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to write published document: {0}")]
    Io(#[from] std::io::Error),
    #[error("publish target rejected the document: {0}")]
    Rejected(String),
}

/// Violations of the stage rules on [`ResearchState`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("cannot move to {attempted:?} from {current:?}")]
    OutOfOrder {
        current: PipelineStage,
        attempted: PipelineStage,
    },
    #[error("plan has no subquestions")]
    EmptyPlan,
}

/// Run-level failures of the research pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error(transparent)]
    State(#[from] StateError),

    /// The synthesis call failed; the plan and sources gathered so far are kept.
    #[error("report synthesis failed: {source}")]
    Synthesis {
        #[source]
        source: LlmError,
        state: Box<ResearchState>,
    },
}

impl PipelineError {
    /// Partial state captured before the failure, if any
    pub fn partial_state(&self) -> Option<&ResearchState> {
        match self {
            PipelineError::Synthesis { state, .. } => Some(state),
            _ => None,
        }
    }
}
