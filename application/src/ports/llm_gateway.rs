//! LLM Gateway port
//!
//! Defines the interface for communicating with a language-model provider.
//! Every pipeline call is single-shot (one prompt, one response); sessions
//! and streaming belong to other systems, not this core.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Transport-class errors justify falling back to a secondary
    /// provider; request-level failures do not.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionError(_) | GatewayError::Timeout | GatewayError::TransportClosed
        )
    }
}

/// Gateway for single-shot model completions
///
/// This port defines how the application layer talks to model providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one prompt under a system prompt and return the full response
    /// text
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError>;

    /// Human-readable provider/model description, for logs
    fn describe(&self) -> String;
}
