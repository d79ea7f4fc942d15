use crate::models::{ResearchPlan, Source};

/// Marker appended to source content cut for prompt inclusion
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// Statement used in place of a reference block when retrieval found nothing
pub const NO_SOURCES_NOTICE: &str = "No web sources were found for this query.";

/// System prompt for the planning call
pub const PLANNER_SYSTEM_PROMPT: &str = r#"You are a research planner. You break a research question into a small number of focused subquestions that together cover it.

Return ONLY a JSON object, with no surrounding prose and no markdown fences, of the form:
{"subquestions": ["..."], "focus": "...", "source_preferences": "..."}

- subquestions: 2 to 5 concrete, independently searchable questions.
- focus: one sentence describing what the final report should concentrate on.
- source_preferences: one sentence describing which kinds of sources to prefer."#;

/// System prompt for the report-writing call
pub const SYNTHESIS_SYSTEM_PROMPT: &str = r#"You are a careful research writer. You synthesize a report ONLY from the numbered sources you are given.

RULES:
- Cite sources inline with their index in square brackets, e.g. [1] or [2][4].
- Do not cite an index that is not in the source list.
- When a claim is not supported by any source, say so explicitly instead of inventing support.
- Write in clear, neutral, well-structured markdown."#;

/// Section skeleton the report must follow
pub const REPORT_SECTIONS: [&str; 8] = [
    "Title",
    "Abstract",
    "Introduction",
    "Background / Key Concepts",
    "Main Discussion",
    "Limitations",
    "Future research directions",
    "References",
];

/// Build the user prompt for the planning call
pub fn build_planner_prompt(query: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Research question\n");
    prompt.push_str(query.trim());
    prompt.push_str("\n\n");
    prompt.push_str("Produce the research plan as JSON now.\n");
    prompt
}

/// Cut `content` to at most `max_chars` characters, appending the marker when cut
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut cut = content[..byte_idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        None => content.to_string(),
    }
}

/// Format sources as a numbered reference block, `[1]` first
pub fn build_reference_block(sources: &[Source], max_content_chars: usize) -> String {
    let mut block = String::new();

    for (i, source) in sources.iter().enumerate() {
        block.push_str(&format!("[{}] {}\n", i + 1, source.title.trim()));
        if source.has_url() {
            block.push_str(&format!("URL: {}\n", source.url.trim()));
        }
        block.push_str(&format!(
            "Content: {}\n\n",
            truncate_content(&source.content, max_content_chars)
        ));
    }

    block
}

/// Build the user prompt for the report-writing call.
///
/// `sources` must already be the selected subset; their order defines the
/// citation indices.
pub fn build_synthesis_prompt(
    query: &str,
    plan: Option<&ResearchPlan>,
    sources: &[Source],
    max_content_chars: usize,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("# Research question\n");
    prompt.push_str(query.trim());
    prompt.push_str("\n\n");

    prompt.push_str("## Research plan\n");
    match plan {
        Some(plan) => {
            prompt.push_str("Subquestions:\n");
            for subquestion in &plan.subquestions {
                prompt.push_str(&format!("- {}\n", subquestion));
            }
            prompt.push_str(&format!("Focus: {}\n", plan.focus));
            prompt.push_str(&format!("Source preferences: {}\n", plan.source_preferences));
        }
        None => prompt.push_str("No research plan was produced.\n"),
    }
    prompt.push('\n');

    prompt.push_str("## Sources\n");
    if sources.is_empty() {
        prompt.push_str(NO_SOURCES_NOTICE);
        prompt.push_str("\nDo not fabricate references. Answer from general knowledge, mark every claim as unsupported by sources, and state in the References section that no sources were available.\n\n");
    } else {
        prompt.push_str(&build_reference_block(sources, max_content_chars));
    }

    prompt.push_str("## Instructions\n");
    prompt.push_str("Write a markdown research report with exactly these sections, in order:\n");
    for (i, section) in REPORT_SECTIONS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, section));
    }
    prompt.push_str("Use the Title as a level-1 heading and the other sections as level-2 headings.\n");
    if !sources.is_empty() {
        prompt.push_str("In References, list every cited source as `[n] Title - URL`.\n");
    }

    prompt
}
