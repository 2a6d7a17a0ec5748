//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file
//! and convert into application-layer parameters.

use serde::{Deserialize, Serialize};
use slideforge_application::PipelineParams;
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Loop control settings
    pub pipeline: FilePipelineConfig,
    /// Model provider settings
    pub provider: FileProviderConfig,
}

/// Pipeline loop settings (`[pipeline]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Maximum loop passes per run (default: 5)
    pub max_iterations: u32,
    /// Confidence score at which the loop stops (default: 85)
    pub confidence_threshold: f64,
    /// Retries per iteration after its first failure (default: 2)
    pub stage_retry_budget: u32,
    /// Timeout for each model call, in seconds (default: 60)
    pub call_timeout_secs: u64,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            confidence_threshold: 85.0,
            stage_retry_budget: 2,
            call_timeout_secs: 60,
        }
    }
}

impl FilePipelineConfig {
    pub fn to_params(&self) -> PipelineParams {
        PipelineParams {
            max_iterations: self.max_iterations,
            confidence_threshold: self.confidence_threshold,
            stage_retry_budget: self.stage_retry_budget,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
        }
    }
}

/// One chat-completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderEndpoint {
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY")
    pub api_key_env: String,
    /// Direct API key (not recommended — use the env var instead)
    pub api_key: Option<String>,
    /// Model name sent with every request
    pub model: String,
}

impl Default for FileProviderEndpoint {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Provider settings (`[provider]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    #[serde(flatten)]
    pub primary: FileProviderEndpoint,
    /// Secondary endpoint used when the primary is unreachable
    /// (`[provider.fallback]` section)
    pub fallback: Option<FileProviderEndpoint>,
}
