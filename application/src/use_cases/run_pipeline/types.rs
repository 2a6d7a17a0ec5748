//! Type definitions for the RunPipeline use case

use crate::ports::llm_gateway::GatewayError;
use slideforge_domain::{
    BusinessContext, Dataset, DomainError, IterationRecord, PresentationDocument, Stage,
};
use std::time::Duration;
use thiserror::Error;

/// Why one stage attempt failed
#[derive(Error, Debug)]
pub enum StageFailure {
    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),

    /// Parse/schema/continuity failure from the domain validator
    #[error("{0}")]
    Response(DomainError),

    #[error("cancelled")]
    Cancelled,
}

impl StageFailure {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StageFailure::Cancelled)
            || matches!(self, StageFailure::Response(e) if e.is_cancelled())
    }
}

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum RunPipelineError {
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Insight review failed: {cause}")]
    Review { cause: StageFailure },

    #[error("{stage} stage failed: {cause}")]
    Stage { stage: Stage, cause: StageFailure },

    #[error("Feedback provider failed: {0}")]
    Feedback(String),

    #[error("Pipeline failed with no usable iteration: {last_error}")]
    PipelineFailed { last_error: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunPipelineError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        match self {
            RunPipelineError::Cancelled => true,
            RunPipelineError::Review { cause } | RunPipelineError::Stage { cause, .. } => {
                cause.is_cancelled()
            }
            _ => false,
        }
    }

    /// Review and stage failures are retryable within the controller's
    /// per-iteration retry budget; everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        !self.is_cancelled()
            && matches!(
                self,
                RunPipelineError::Review { .. } | RunPipelineError::Stage { .. }
            )
    }
}

impl From<DomainError> for RunPipelineError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidDataset(msg) => RunPipelineError::InvalidDataset(msg),
            DomainError::Cancelled => RunPipelineError::Cancelled,
            other => RunPipelineError::Review {
                cause: StageFailure::Response(other),
            },
        }
    }
}

/// Tunable parameters for one run
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Upper bound on loop passes
    pub max_iterations: u32,
    /// Confidence at which the loop stops
    pub confidence_threshold: f64,
    /// Retries allowed per iteration after its first failed attempt
    pub stage_retry_budget: u32,
    /// Timeout applied to every external model call
    pub call_timeout: Duration,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            confidence_threshold: 85.0,
            stage_retry_budget: 2,
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// Input for the RunPipeline use case
pub struct RunPipelineInput {
    /// Normalized tabular data, owned exclusively by this run
    pub dataset: Dataset,
    pub context: BusinessContext,
    pub params: PipelineParams,
    /// Stable id for the assembled document
    pub run_id: String,
}

impl RunPipelineInput {
    pub fn new(dataset: Dataset, context: BusinessContext) -> Self {
        let run_id = format!("run-{}", derive_run_id(&dataset, &context));
        Self {
            dataset,
            context,
            params: PipelineParams::default(),
            run_id,
        }
    }

    pub fn with_params(mut self, params: PipelineParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }
}

/// Deterministic default run id derived from the input shape (FNV-1a over
/// column names, industry, and row count)
fn derive_run_id(dataset: &Dataset, context: &BusinessContext) -> String {
    let mut hash: u64 = 0xcbf29ce484222325;
    let mut mix = |bytes: &[u8]| {
        for b in bytes {
            hash ^= u64::from(*b);
            hash = hash.wrapping_mul(0x100000001b3);
        }
    };
    for column in dataset.columns() {
        mix(column.name().as_bytes());
    }
    mix(context.industry.as_bytes());
    mix(&(dataset.row_count() as u64).to_le_bytes());
    format!("{:016x}", hash)
}

/// What ended the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Confidence reached the configured threshold
    ConfidenceReached,
    /// Iteration budget exhausted with usable results
    MaxIterations,
    /// Feedback approved the result outright
    Approved,
    /// A later iteration failed; the best earlier result was returned.
    ///
    /// This policy is deliberate (callers prefer a lower-confidence deck
    /// over no deck) but is surfaced explicitly so callers who disagree
    /// can treat it as a failure.
    BestEffort,
}

impl StopReason {
    pub fn as_str(&self) -> &str {
        match self {
            StopReason::ConfidenceReached => "confidence_reached",
            StopReason::MaxIterations => "max_iterations",
            StopReason::Approved => "approved",
            StopReason::BestEffort => "best_effort",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output from the RunPipeline use case
#[derive(Debug)]
pub struct RunPipelineOutput {
    pub run_id: String,
    /// The assembled, always-renderable presentation
    pub document: PresentationDocument,
    /// Full iteration history for audit/debug and replay
    pub history: Vec<IterationRecord>,
    pub stop_reason: StopReason,
    /// Confidence of the iteration the document was assembled from
    pub confidence: f64,
    /// Number of iterations attempted
    pub iterations: u32,
}
