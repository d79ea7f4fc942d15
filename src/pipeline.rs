use tracing::{info, warn};

use crate::error::PipelineError;
use crate::llm::TextGenerator;
use crate::models::ResearchState;
use crate::publish::DocumentPublisher;
use crate::search::WebSearch;
use crate::stages::{
    plan_research, publish_report, retrieve_sources, synthesize_report, Stage1Config,
    Stage2Config, Stage3Config,
};

/// Per-stage configuration for one pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub plan: Stage1Config,
    pub retrieve: Stage2Config,
    pub synthesize: Stage3Config,
}

/// Drives one query through Planner, Retriever, Synthesizer and Publisher
pub struct ResearchPipeline<'a> {
    generator: &'a dyn TextGenerator,
    search: &'a dyn WebSearch,
    publisher: &'a dyn DocumentPublisher,
    config: PipelineConfig,
}

impl<'a> ResearchPipeline<'a> {
    pub fn new(
        generator: &'a dyn TextGenerator,
        search: &'a dyn WebSearch,
        publisher: &'a dyn DocumentPublisher,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            search,
            publisher,
            config,
        }
    }

    /// Run all four stages for `query`, strictly in order.
    ///
    /// Only a blank query or a failed synthesis call fail the run. In the
    /// latter case the error carries the plan and sources gathered so far.
    pub async fn run(&self, query: &str) -> Result<ResearchState, PipelineError> {
        let query = validate_query(query)?;
        let mut state = ResearchState::new(query);

        info!(run_id = %state.run_id(), "Starting research run for {:?}", query);

        // Stage 1: Planning
        let outcome = plan_research(self.generator, state.query(), &self.config.plan).await;
        state.apply_plan(outcome.into_plan())?;

        // Stage 2: Retrieval
        let retrieval = retrieve_sources(
            self.search,
            state.plan(),
            state.query(),
            &self.config.retrieve,
        )
        .await;
        state.apply_sources(retrieval.sources)?;

        // Stage 3: Synthesis
        let synthesis = synthesize_report(
            self.generator,
            state.query(),
            state.plan(),
            state.sources(),
            &self.config.synthesize,
        )
        .await;
        let report = match synthesis {
            Ok(report) => report,
            Err(source) => {
                warn!(run_id = %state.run_id(), "Synthesis failed: {}", source);
                return Err(PipelineError::Synthesis {
                    source,
                    state: Box::new(state),
                });
            }
        };
        state.apply_report(report)?;

        // Stage 4: Publishing
        let link = publish_report(self.publisher, &state).await;
        state.apply_publish_link(link)?;

        info!(
            run_id = %state.run_id(),
            "Research run complete: {} sources, published={}",
            state.sources().len(),
            state.drive_file_link().is_some()
        );

        Ok(state)
    }
}

fn validate_query(query: &str) -> Result<&str, PipelineError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(PipelineError::EmptyQuery);
    }
    Ok(query)
}
