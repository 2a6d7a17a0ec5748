//! CLI entrypoint for slideforge
//!
//! This is the main binary that wires together all layers using
//! dependency injection: dataset ingestion, provider adapters (with
//! optional fallback), the pipeline use case, and document persistence.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use slideforge_application::{
    AlwaysApprove, AlwaysReject, DocumentStore, FeedbackProvider, LlmGateway,
    PipelineProgressNotifier, RunPipelineInput, RunPipelineUseCase,
};
use slideforge_domain::{BusinessContext, Stage, Urgency};
use slideforge_infrastructure::{
    ConfigLoader, FallbackGateway, HttpChatGateway, JsonFileStore, dataset_from_json,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate a presentation from tabular data
#[derive(Parser)]
#[command(name = "slideforge", version, about)]
struct Cli {
    /// Path to the input data (JSON array of row objects)
    #[arg(long)]
    data: PathBuf,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Industry the data comes from
    #[arg(long, default_value = "")]
    industry: String,

    /// Intended audience description
    #[arg(long, default_value = "")]
    audience: String,

    /// Request urgency: low, medium, high or critical
    #[arg(long, default_value = "medium")]
    urgency: String,

    /// Business goal (repeatable)
    #[arg(long = "goal")]
    goals: Vec<String>,

    /// KPI to highlight (repeatable)
    #[arg(long = "kpi")]
    kpis: Vec<String>,

    /// Decision maker in the audience (repeatable)
    #[arg(long = "decision-maker")]
    decision_makers: Vec<String>,

    /// How feedback requests are answered in this non-interactive run
    #[arg(long, value_enum, default_value = "auto-approve")]
    feedback: FeedbackMode,

    /// Override the configured iteration budget
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Directory the finished document is written to; omit to skip
    /// persistence
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum FeedbackMode {
    /// Approve every feedback request
    AutoApprove,
    /// Request a major revision on every feedback request
    AutoReject,
}

/// Prints pipeline progress to stderr so stdout stays machine-readable
struct ConsoleProgress;

impl PipelineProgressNotifier for ConsoleProgress {
    fn on_iteration_start(&self, iteration: u32, max_iterations: u32) {
        eprintln!("iteration {iteration}/{max_iterations}");
    }

    fn on_review_complete(&self, _iteration: u32, confidence: f64) {
        eprintln!("  review confidence: {confidence:.0}");
    }

    fn on_stage_complete(&self, stage: Stage) {
        eprintln!("  {} done", stage.display_name());
    }

    fn on_feedback_required(&self, iteration: u32) {
        eprintln!("  feedback requested for iteration {iteration}");
    }

    fn on_run_complete(&self, iterations: u32, confidence: f64) {
        eprintln!("finished after {iterations} iteration(s), confidence {confidence:.0}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;

    let text = std::fs::read_to_string(&cli.data)
        .with_context(|| format!("reading {}", cli.data.display()))?;
    let dataset = dataset_from_json(&text).context("parsing input data")?;
    info!(
        columns = dataset.columns().len(),
        rows = dataset.row_count(),
        "dataset loaded"
    );

    let context = BusinessContext {
        industry: cli.industry,
        goals: cli.goals,
        kpis: cli.kpis,
        audience: cli.audience,
        urgency: cli
            .urgency
            .parse::<Urgency>()
            .map_err(|e| anyhow::anyhow!(e))?,
        decision_makers: cli.decision_makers,
        time_horizon: String::new(),
    };

    // === Dependency Injection ===
    let primary: Arc<dyn LlmGateway> =
        Arc::new(HttpChatGateway::from_endpoint(&config.provider.primary));
    let gateway: Arc<dyn LlmGateway> = match &config.provider.fallback {
        Some(endpoint) => Arc::new(FallbackGateway::new(
            primary,
            Arc::new(HttpChatGateway::from_endpoint(endpoint)),
        )),
        None => primary,
    };
    let feedback: Arc<dyn FeedbackProvider> = match cli.feedback {
        FeedbackMode::AutoApprove => Arc::new(AlwaysApprove),
        FeedbackMode::AutoReject => Arc::new(AlwaysReject),
    };

    let mut params = config.pipeline.to_params();
    if let Some(max_iterations) = cli.max_iterations {
        params.max_iterations = max_iterations;
    }

    // Ctrl-C cancels the run at the next guarded await point
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("cancelling...");
            signal_token.cancel();
        }
    });

    let use_case =
        RunPipelineUseCase::new(gateway, feedback).with_cancellation_token(token);
    let input = RunPipelineInput::new(dataset, context).with_params(params);

    let output = use_case
        .execute_with_progress(input, &ConsoleProgress)
        .await?;

    if let Some(dir) = &cli.output_dir {
        let store = JsonFileStore::new(dir);
        store
            .save(&output.document)
            .await
            .map_err(|e| anyhow::anyhow!("saving document: {e}"))?;
        eprintln!(
            "document written to {}",
            dir.join(format!("{}.json", output.run_id)).display()
        );
    }

    println!("{}", serde_json::to_string_pretty(&output.document)?);
    eprintln!(
        "run {}: {} slide(s), stop reason: {}, confidence {:.0} after {} iteration(s)",
        output.run_id,
        output.document.slides.len(),
        output.stop_reason,
        output.confidence,
        output.iterations,
    );

    Ok(())
}
