use tracing::info;

use crate::error::LlmError;
use crate::llm::{
    build_synthesis_prompt, GenerationRequest, ModelProfile, TextGenerator,
    SYNTHESIS_SYSTEM_PROMPT,
};
use crate::models::{ResearchPlan, Source};

/// Configuration for Stage 3
#[derive(Debug, Clone)]
pub struct Stage3Config {
    /// Sources beyond this count are left out of the prompt
    pub max_sources: usize,
    /// Per-source content limit, in characters
    pub max_content_chars: usize,
}

impl Default for Stage3Config {
    fn default() -> Self {
        Self {
            max_sources: 10,
            max_content_chars: 800,
        }
    }
}

/// The first `max_sources` sources, in arrival order.
///
/// At least one source is kept when any were retrieved, so a zero cap never
/// turns a run with sources into a run without them.
pub fn select_sources(sources: &[Source], max_sources: usize) -> &[Source] {
    &sources[..sources.len().min(max_sources.max(1))]
}

/// Build the writing request for a query, plan and retrieved sources
pub fn build_synthesis_request(
    query: &str,
    plan: Option<&ResearchPlan>,
    sources: &[Source],
    config: &Stage3Config,
) -> GenerationRequest {
    let selected = select_sources(sources, config.max_sources);
    GenerationRequest::new(
        SYNTHESIS_SYSTEM_PROMPT,
        build_synthesis_prompt(query, plan, selected, config.max_content_chars),
        ModelProfile::Writing,
    )
}

/// Execute Stage 3: write the cited markdown report.
///
/// Returns the raw text of the writing call; its structure is not checked.
/// A failed call is returned to the caller.
pub async fn synthesize_report(
    generator: &dyn TextGenerator,
    query: &str,
    plan: Option<&ResearchPlan>,
    sources: &[Source],
    config: &Stage3Config,
) -> Result<String, LlmError> {
    let request = build_synthesis_request(query, plan, sources, config);

    info!(
        "Stage 3: synthesizing from {} of {} sources",
        select_sources(sources, config.max_sources).len(),
        sources.len()
    );

    let report = generator.generate(&request).await?;

    info!("Stage 3: report is {} characters", report.chars().count());

    Ok(report)
}
