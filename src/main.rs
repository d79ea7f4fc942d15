use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use research_agent::stages::plan_research;
use research_agent::{
    render_for_terminal, write_report_markdown, DocumentPublisher, FolderPublisher,
    NoopPublisher, OpenAiClient, OpenAiConfig, PipelineConfig, PlanOutcome, ResearchPipeline,
    Settings, Stage1Config, StateSnapshot, TavilyClient, TavilyConfig,
};

#[derive(Parser)]
#[command(name = "research-agent")]
#[command(author, version, about = "Research assistant: plan, search and write a cited report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full research pipeline for a question
    Run {
        /// The research question
        query: String,

        /// Write the report markdown to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the final run state as JSON to this file
        #[arg(long)]
        state_json: Option<PathBuf>,

        /// Publish the report into the reports folder under this directory
        #[arg(long)]
        publish_dir: Option<PathBuf>,

        /// Model name (overrides OPENAI_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Search results requested per subquestion
        #[arg(long, default_value = "4", value_parser = parse_positive)]
        max_results: usize,

        /// Maximum sources included in the report prompt
        #[arg(long, default_value = "10", value_parser = parse_positive)]
        max_sources: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Only decompose a question into a research plan
    Plan {
        /// The research question
        query: String,

        /// Model name (overrides OPENAI_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

struct RunOptions {
    output: Option<PathBuf>,
    state_json: Option<PathBuf>,
    publish_dir: Option<PathBuf>,
    max_results: usize,
    max_sources: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env();

    match cli.command {
        Commands::Run {
            query,
            output,
            state_json,
            publish_dir,
            model,
            max_results,
            max_sources,
            verbose,
        } => {
            setup_logging(verbose);
            if let Some(model) = model {
                settings.model = model;
            }
            let options = RunOptions {
                output,
                state_json,
                publish_dir,
                max_results,
                max_sources,
            };
            run_research(&settings, &query, options).await
        }
        Commands::Plan {
            query,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            if let Some(model) = model {
                settings.model = model;
            }
            plan_query(&settings, &query).await
        }
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_research(settings: &Settings, query: &str, options: RunOptions) -> Result<()> {
    let generator = OpenAiClient::new(OpenAiConfig::from_settings(settings)?);
    let search = TavilyClient::new(TavilyConfig::from_settings(settings)?);

    let publisher: Box<dyn DocumentPublisher> = match &options.publish_dir {
        Some(dir) => {
            info!(
                "Publishing reports to {:?}",
                dir.join(&settings.reports_folder_name)
            );
            Box::new(FolderPublisher::new(dir, settings.reports_folder_name.as_str()))
        }
        None => {
            if settings.has_document_store_credentials() {
                info!("Document store credentials found but no publish target given; report will not be published");
            }
            Box::new(NoopPublisher)
        }
    };

    let mut config = PipelineConfig::default();
    config.retrieve.max_results_per_subquestion = options.max_results;
    config.synthesize.max_sources = options.max_sources;

    info!("Using model {}", generator.model());
    let pipeline = ResearchPipeline::new(&generator, &search, publisher.as_ref(), config);

    let state = match pipeline.run(query).await {
        Ok(state) => state,
        Err(e) => {
            if let (Some(path), Some(partial)) = (&options.state_json, e.partial_state()) {
                StateSnapshot::new(partial)
                    .with_error(&e)
                    .write_json(path)?;
                warn!("Partial state written to {:?}", path);
            }
            return Err(e).context("Research pipeline failed");
        }
    };

    if let Some(path) = &options.output {
        write_report_markdown(&state, path)?;
        info!("Report written to {:?}", path);
    }
    if let Some(path) = &options.state_json {
        StateSnapshot::new(&state).write_json(path)?;
        info!("State written to {:?}", path);
    }

    println!("{}", render_for_terminal(&state));

    Ok(())
}

async fn plan_query(settings: &Settings, query: &str) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Query must not be empty");
    }

    let generator = OpenAiClient::new(OpenAiConfig::from_settings(settings)?);
    let outcome = plan_research(&generator, query, &Stage1Config::default()).await;
    if let PlanOutcome::Fallback { reason, .. } = &outcome {
        warn!("Planner fell back to the single-subquestion plan: {:?}", reason);
    }

    let json =
        serde_json::to_string_pretty(outcome.plan()).context("Failed to serialize plan")?;
    println!("{}", json);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["research-agent"].iter().chain(args).copied())
    }

    #[test]
    fn test_run_defaults() {
        let cli = parse(&["run", "q"]).unwrap();
        match cli.command {
            Commands::Run {
                max_results,
                max_sources,
                ..
            } => {
                assert_eq!(max_results, 4);
                assert_eq!(max_sources, 10);
            }
            Commands::Plan { .. } => panic!("expected run"),
        }
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        assert!(parse(&["run", "q", "--max-sources", "0"]).is_err());
        assert!(parse(&["run", "q", "--max-results", "0"]).is_err());
        assert!(parse(&["run", "q", "--max-sources", "x"]).is_err());
        assert!(parse(&["run", "q", "--max-sources", "1", "--max-results", "1"]).is_ok());
    }
}
