use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::ResearchState;

/// Shown in place of the report when none was produced
pub const NO_REPORT_PLACEHOLDER: &str = "_No report generated yet._";

/// Machine-readable record of a finished (or failed) run
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot<'a> {
    pub generated_at: DateTime<Utc>,
    /// Set when the run failed before reaching the terminal stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub state: &'a ResearchState,
}

impl<'a> StateSnapshot<'a> {
    pub fn new(state: &'a ResearchState) -> Self {
        Self {
            generated_at: Utc::now(),
            error: None,
            state,
        }
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Write the report markdown to a file; fails if the run produced no report
pub fn write_report_markdown(state: &ResearchState, path: &Path) -> Result<()> {
    let report = state
        .report_markdown()
        .context("No report was generated for this run")?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    write!(file, "{}", report)?;
    Ok(())
}

/// Terminal view of a run: the report (or a placeholder) and the publish link
pub fn render_for_terminal(state: &ResearchState) -> String {
    let mut output = String::new();

    output.push_str("Report preview\n");
    output.push_str("==============\n\n");
    output.push_str(state.report_markdown().unwrap_or(NO_REPORT_PLACEHOLDER));
    output.push('\n');

    if let Some(link) = state.drive_file_link() {
        output.push_str(&format!("\n[Open published report]({})\n", link));
    }

    output
}
