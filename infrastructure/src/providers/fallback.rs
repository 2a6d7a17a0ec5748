//! Fallback provider chaining
//!
//! Wraps a primary and a secondary gateway. Transport-class failures
//! (connection refused, timeout, closed transport) switch the call to the
//! secondary; request-level failures like a rejected prompt do not, since
//! the secondary would reject it the same way.

use async_trait::async_trait;
use slideforge_application::ports::llm_gateway::{GatewayError, LlmGateway};
use std::sync::Arc;
use tracing::warn;

/// Gateway that retries transport failures against a secondary provider
pub struct FallbackGateway {
    primary: Arc<dyn LlmGateway>,
    secondary: Arc<dyn LlmGateway>,
}

impl FallbackGateway {
    pub fn new(primary: Arc<dyn LlmGateway>, secondary: Arc<dyn LlmGateway>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl LlmGateway for FallbackGateway {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        match self.primary.complete(system_prompt, prompt).await {
            Ok(response) => Ok(response),
            Err(error) if error.is_transport() => {
                warn!(
                    primary = %self.primary.describe(),
                    secondary = %self.secondary.describe(),
                    error = %error,
                    "primary provider unreachable, falling back"
                );
                self.secondary.complete(system_prompt, prompt).await
            }
            Err(error) => Err(error),
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} (fallback: {})",
            self.primary.describe(),
            self.secondary.describe()
        )
    }
}
