//! Application layer for slideforge
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; adapters for the ports live in the infrastructure
//! layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    document_store::{DocumentStore, StoreError},
    feedback::{AlwaysApprove, AlwaysReject, FeedbackError, FeedbackProvider, ScriptedFeedback},
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, PipelineProgressNotifier},
};
pub use use_cases::run_pipeline::{
    PipelineParams, RunPipelineError, RunPipelineInput, RunPipelineOutput, RunPipelineUseCase,
    StageFailure, StopReason,
};
