use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{dedupe_by_url, ResearchPlan, Source};
use crate::error::StateError;

/// Position of a run in the linear pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Query received, nothing computed yet
    Received,
    Planned,
    Retrieved,
    Synthesized,
    /// Terminal, whether or not a link was produced
    Published,
}

impl PipelineStage {
    /// The only stage that may follow this one
    pub fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Received => Some(PipelineStage::Planned),
            PipelineStage::Planned => Some(PipelineStage::Retrieved),
            PipelineStage::Retrieved => Some(PipelineStage::Synthesized),
            PipelineStage::Synthesized => Some(PipelineStage::Published),
            PipelineStage::Published => None,
        }
    }
}

/// State record threaded through the four stages of one research run.
///
/// Every stage output is merged through its own `apply_*` method, which only
/// succeeds when the state sits at the preceding stage. Each field is therefore
/// written exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchState {
    run_id: Uuid,
    query: String,
    plan: Option<ResearchPlan>,
    sources: Vec<Source>,
    report_markdown: Option<String>,
    drive_file_link: Option<String>,
    stage: PipelineStage,
}

impl ResearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            query: query.into(),
            plan: None,
            sources: Vec::new(),
            report_markdown: None,
            drive_file_link: None,
            stage: PipelineStage::Received,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn plan(&self) -> Option<&ResearchPlan> {
        self.plan.as_ref()
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn report_markdown(&self) -> Option<&str> {
        self.report_markdown.as_deref()
    }

    pub fn drive_file_link(&self) -> Option<&str> {
        self.drive_file_link.as_deref()
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Record the planner output. A plan without a non-blank subquestion is rejected.
    pub fn apply_plan(&mut self, plan: ResearchPlan) -> Result<(), StateError> {
        if plan.subquestions.iter().all(|s| s.trim().is_empty()) {
            return Err(StateError::EmptyPlan);
        }
        self.advance(PipelineStage::Planned)?;
        self.plan = Some(plan);
        Ok(())
    }

    /// Record the retrieved sources. Duplicate urls are dropped, keeping the first.
    pub fn apply_sources(&mut self, sources: Vec<Source>) -> Result<(), StateError> {
        self.advance(PipelineStage::Retrieved)?;
        self.sources = dedupe_by_url(sources);
        Ok(())
    }

    /// Record the synthesized report
    pub fn apply_report(&mut self, report_markdown: String) -> Result<(), StateError> {
        self.advance(PipelineStage::Synthesized)?;
        self.report_markdown = Some(report_markdown);
        Ok(())
    }

    /// Record the publish outcome; `None` when nothing was published
    pub fn apply_publish_link(&mut self, link: Option<String>) -> Result<(), StateError> {
        self.advance(PipelineStage::Published)?;
        self.drive_file_link = link;
        Ok(())
    }

    fn advance(&mut self, attempted: PipelineStage) -> Result<(), StateError> {
        if self.stage.next() != Some(attempted) {
            return Err(StateError::OutOfOrder {
                current: self.stage,
                attempted,
            });
        }
        self.stage = attempted;
        Ok(())
    }
}
