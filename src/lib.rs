pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod publish;
pub mod search;
pub mod stages;

#[cfg(test)]
mod testing;

pub use config::Settings;
pub use error::{LlmError, PipelineError, PublishError, SearchError, StateError};
pub use io::{render_for_terminal, write_report_markdown, StateSnapshot};
pub use llm::{OpenAiClient, OpenAiConfig, TextGenerator};
pub use models::{PipelineStage, ResearchPlan, ResearchState, Source};
pub use pipeline::{PipelineConfig, ResearchPipeline};
pub use publish::{DocumentPublisher, FolderPublisher, NoopPublisher};
pub use search::{TavilyClient, TavilyConfig, WebSearch};
pub use stages::{PlanOutcome, Stage1Config, Stage2Config, Stage3Config};
