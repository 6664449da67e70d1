//! Ollama client implementation.
//!
//! Uses the non-streaming `/api/generate` endpoint: one prompt in, one
//! `response` string out.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::config::LocalLlmConfig;
//! use llm::{CompletionModel, CompletionRequest};
//!
//! let config = LocalLlmConfig::new("http://localhost:11434", "llama3.1:8b");
//! let client = OllamaClient::new(config)?;
//! let response = client.complete(CompletionRequest::new("Hello!")).await?;
//! ```

use crate::completion::{CompletionModel, CompletionRequest, CompletionResponse, TokenUsage};
use crate::config::{join_url, LocalLlmConfig};
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ollama client for local inference.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, client })
    }

    /// Check if the Ollama server is running.
    pub async fn check_health(&self) -> Result<bool> {
        let url = join_url(&self.config.base_url, "api/tags");
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> GenerateRequest {
        let mut options = HashMap::new();
        if let Some(temp) = request.temperature {
            options.insert("temperature", serde_json::Value::from(temp));
        }
        if let Some(max_tokens) = request.max_tokens {
            options.insert("num_predict", serde_json::Value::from(max_tokens));
        }

        GenerateRequest {
            model: self.config.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
            options: if options.is_empty() {
                None
            } else {
                Some(options)
            },
        }
    }

    fn convert_response(&self, resp: GenerateResponse) -> Result<CompletionResponse> {
        let text = resp.response.ok_or_else(|| {
            LlmError::InvalidResponse("missing `response` field".to_string())
        })?;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion(self.config.model.clone()));
        }

        let usage = match (resp.prompt_eval_count, resp.eval_count) {
            (None, None) => None,
            (input, output) => Some(TokenUsage::new(input.unwrap_or(0), output.unwrap_or(0))),
        };

        Ok(CompletionResponse {
            text,
            model: resp.model.unwrap_or_else(|| self.config.model.clone()),
            usage,
        })
    }
}

#[async_trait]
impl CompletionModel for OllamaClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = join_url(&self.config.base_url, "api/generate");
        let body = self.build_request(&request);

        debug!(url = %url, model = %self.config.model, "Sending completion request");

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                LlmError::ServiceUnavailable(format!(
                    "Ollama not reachable at {}: {}",
                    self.config.base_url, e
                ))
            } else if e.is_timeout() {
                LlmError::Timeout(e.to_string())
            } else {
                LlmError::HttpError(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Ollama", status, error_text));
        }

        let resp: GenerateResponse = response
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

// Ollama API types
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<&'static str, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}
