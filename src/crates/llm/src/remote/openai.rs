//! OpenAI-compatible chat-completions client.
//!
//! Works against any endpoint that speaks the `/chat/completions` wire
//! format: OpenAI itself, OpenRouter, vLLM, LiteLLM and similar gateways
//! fronting hosted open models such as `llama3.1-8b`.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiCompatibleClient;
//! use llm::config::RemoteLlmConfig;
//! use llm::{CompletionModel, CompletionRequest};
//!
//! let config = RemoteLlmConfig::from_env(
//!     "OPENAI_API_KEY",
//!     "https://api.openai.com/v1",
//!     "gpt-4o-mini",
//! )?;
//! let client = OpenAiCompatibleClient::new(config)?;
//! let response = client.complete(CompletionRequest::new("Hello!")).await?;
//! ```

use crate::completion::{CompletionModel, CompletionRequest, CompletionResponse, TokenUsage};
use crate::config::{join_url, RemoteLlmConfig};
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for OpenAI-compatible completion endpoints.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiCompatibleClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, client })
    }

    /// Probe `GET {base_url}/models` with the configured credentials.
    pub async fn check_health(&self) -> Result<bool> {
        let url = join_url(&self.config.base_url, "models");
        match self.authorized(self.client.get(&url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.bearer_auth(&self.config.api_key);
        match &self.config.organization {
            Some(org) => req.header("OpenAI-Organization", org),
            None => req,
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(request.prompt.clone()),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    /// Pull the single text field out of a response body.
    fn convert_response(&self, resp: ChatCompletionResponse) -> Result<CompletionResponse> {
        let choice = resp.choices.into_iter().next().ok_or_else(|| {
            LlmError::InvalidResponse("response contained no choices".to_string())
        })?;

        let text = choice.message.content.ok_or_else(|| {
            LlmError::InvalidResponse("first choice has no message content".to_string())
        })?;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion(self.config.model.clone()));
        }

        Ok(CompletionResponse {
            text,
            model: resp.model.unwrap_or_else(|| self.config.model.clone()),
            usage: resp
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        })
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompatibleClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = join_url(&self.config.base_url, "chat/completions");
        let body = self.build_request(&request);

        debug!(url = %url, model = %self.config.model, "Sending completion request");

        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(e.to_string())
                } else {
                    LlmError::HttpError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("OpenAI-compatible", status, error_text));
        }

        let resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        self.convert_response(resp)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn is_available(&self) -> Result<bool> {
        self.check_health().await
    }
}

// Wire types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}
