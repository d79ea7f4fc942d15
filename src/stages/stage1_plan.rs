use tracing::{info, warn};

use crate::llm::{
    build_planner_prompt, GenerationRequest, ModelProfile, TextGenerator, PLANNER_SYSTEM_PROMPT,
};
use crate::models::{RawPlan, ResearchPlan, FALLBACK_FOCUS, FALLBACK_SOURCE_PREFERENCES};

/// Configuration for Stage 1
#[derive(Debug, Clone)]
pub struct Stage1Config {
    /// Subquestions beyond this count are dropped
    pub max_subquestions: usize,
}

impl Default for Stage1Config {
    fn default() -> Self {
        Self {
            max_subquestions: 5,
        }
    }
}

/// Why the planner fell back to the single-subquestion plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The generation call itself failed
    GenerationFailed(String),
    /// The reply held no JSON object
    NoJson,
    /// The JSON did not match the plan shape
    InvalidJson(String),
    /// The JSON parsed but listed no usable subquestions
    NoSubquestions,
}

/// Result of Stage 1 planning
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// The model produced a usable plan
    Parsed(ResearchPlan),
    /// The fixed fallback plan was used
    Fallback {
        plan: ResearchPlan,
        reason: FallbackReason,
    },
}

impl PlanOutcome {
    pub fn plan(&self) -> &ResearchPlan {
        match self {
            PlanOutcome::Parsed(plan) => plan,
            PlanOutcome::Fallback { plan, .. } => plan,
        }
    }

    pub fn into_plan(self) -> ResearchPlan {
        match self {
            PlanOutcome::Parsed(plan) => plan,
            PlanOutcome::Fallback { plan, .. } => plan,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PlanOutcome::Fallback { .. })
    }
}

/// Execute Stage 1: decompose the query into a research plan.
///
/// Makes exactly one planning call. Any failure (call error, missing or
/// malformed JSON, no subquestions) yields [`ResearchPlan::fallback`]; this
/// function never fails.
pub async fn plan_research(
    generator: &dyn TextGenerator,
    query: &str,
    config: &Stage1Config,
) -> PlanOutcome {
    let request = GenerationRequest::new(
        PLANNER_SYSTEM_PROMPT,
        build_planner_prompt(query),
        ModelProfile::Planning,
    );

    let outcome = match generator.generate(&request).await {
        Ok(reply) => match parse_plan(&reply, config) {
            Ok(plan) => PlanOutcome::Parsed(plan),
            Err(reason) => PlanOutcome::Fallback {
                plan: ResearchPlan::fallback(query),
                reason,
            },
        },
        Err(e) => PlanOutcome::Fallback {
            plan: ResearchPlan::fallback(query),
            reason: FallbackReason::GenerationFailed(e.to_string()),
        },
    };

    match &outcome {
        PlanOutcome::Parsed(plan) => info!(
            "Stage 1: planned {} subquestions",
            plan.subquestions.len()
        ),
        PlanOutcome::Fallback { reason, .. } => {
            warn!("Stage 1: using fallback plan ({:?})", reason)
        }
    }

    outcome
}

/// Parse a planner reply into a plan, or say why it is unusable
pub fn parse_plan(reply: &str, config: &Stage1Config) -> Result<ResearchPlan, FallbackReason> {
    let json = extract_json(reply).ok_or(FallbackReason::NoJson)?;
    let raw: RawPlan =
        serde_json::from_str(json).map_err(|e| FallbackReason::InvalidJson(e.to_string()))?;

    let subquestions: Vec<String> = raw
        .subquestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(config.max_subquestions)
        .collect();

    if subquestions.is_empty() {
        return Err(FallbackReason::NoSubquestions);
    }

    Ok(ResearchPlan {
        subquestions,
        focus: non_blank_or(raw.focus, FALLBACK_FOCUS),
        source_preferences: non_blank_or(raw.source_preferences, FALLBACK_SOURCE_PREFERENCES),
    })
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Slice from the first `{` to the last `}`, which strips prose and code fences
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
