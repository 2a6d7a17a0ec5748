//! Progress notification port
//!
//! Defines the interface for reporting pipeline progress. Implementations
//! live outside this crate (console, UI, test recorders); all callbacks
//! default to no-ops so implementors opt into the events they care about.

use slideforge_domain::Stage;

/// Callbacks for progress updates during a pipeline run
pub trait PipelineProgressNotifier: Send + Sync {
    /// Called when an iteration begins
    fn on_iteration_start(&self, _iteration: u32, _max_iterations: u32) {}

    /// Called after the Insight Reviewer scored the analysis
    fn on_review_complete(&self, _iteration: u32, _confidence: f64) {}

    /// Called when a stage agent starts
    fn on_stage_start(&self, _stage: Stage) {}

    /// Called when a stage agent finishes successfully
    fn on_stage_complete(&self, _stage: Stage) {}

    /// Called when the run transitions to `AwaitingFeedback`
    fn on_feedback_required(&self, _iteration: u32) {}

    /// Called when an iteration finishes with its combined confidence
    fn on_iteration_complete(&self, _iteration: u32, _confidence: f64) {}

    /// Called once when the run stops
    fn on_run_complete(&self, _iterations: u32, _confidence: f64) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PipelineProgressNotifier for NoProgress {}
