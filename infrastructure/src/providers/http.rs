//! Chat-completions HTTP provider adapter

use crate::config::FileProviderEndpoint;
use async_trait::async_trait;
use serde::Deserialize;
use slideforge_application::ports::llm_gateway::{GatewayError, LlmGateway};
use tracing::debug;

/// Sampling temperature for pipeline calls; responses must follow a JSON
/// schema, so keep it low
const TEMPERATURE: f64 = 0.2;

/// Gateway for providers exposing the chat-completions wire format
pub struct HttpChatGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl HttpChatGateway {
    /// Build a gateway from an endpoint config.
    ///
    /// The API key is read from the environment variable the config
    /// names; a key placed directly in the config wins when present.
    pub fn from_endpoint(endpoint: &FileProviderEndpoint) -> Self {
        let api_key = endpoint
            .api_key
            .clone()
            .or_else(|| std::env::var(&endpoint.api_key_env).ok());
        Self::new(&endpoint.base_url, api_key, &endpoint.model)
    }

    pub fn new(base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    fn map_transport_error(error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout
        } else if error.is_connect() {
            GatewayError::ConnectionError(error.to_string())
        } else {
            GatewayError::RequestFailed(error.to_string())
        }
    }
}

#[async_trait]
impl LlmGateway for HttpChatGateway {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "temperature": TEMPERATURE,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": prompt},
            ],
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(Self::map_transport_error)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("malformed response: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GatewayError::RequestFailed("response has no choices".to_string()))?;

        debug!(model = %self.model, chars = content.len(), "completion received");
        Ok(content)
    }

    fn describe(&self) -> String {
        format!("{} @ {}", self.model, self.base_url)
    }
}
