//! Core trait and request/response types for text completion.
//!
//! A completion is a single request/response exchange: one prompt in, one
//! text out, against the model identifier the client was configured with.
//! Implementations must be `Send + Sync`; share them as
//! `Arc<dyn CompletionModel>`.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The full prompt text, sent as one user turn.
    pub prompt: String,

    /// Sampling temperature. `None` leaves the provider default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens. `None` leaves the provider default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

impl CompletionRequest {
    /// Create a request for the given prompt with provider defaults.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by a provider, when it reports any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl TokenUsage {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// The text a provider produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text. Opaque to callers; never validated beyond presence.
    pub text: String,

    /// Model identifier echoed by the provider (falls back to the requested one).
    pub model: String,

    /// Token usage, if the provider reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// A hosted or local text-completion capability.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use llm::{CompletionModel, CompletionRequest, CompletionResponse, Result};
/// use async_trait::async_trait;
///
/// struct Shouty;
///
/// #[async_trait]
/// impl CompletionModel for Shouty {
///     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
///         Ok(CompletionResponse {
///             text: request.prompt.to_uppercase(),
///             model: "shouty".to_string(),
///             usage: None,
///         })
///     }
///
///     fn model(&self) -> &str {
///         "shouty"
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send one prompt and wait for the complete response.
    ///
    /// # Errors
    ///
    /// Network failures, non-success statuses, and bodies without a text
    /// field all surface as [`crate::LlmError`]. Nothing is retried.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// The model identifier sent with every request.
    fn model(&self) -> &str;

    /// Check whether the provider is reachable.
    ///
    /// Default implementation returns `Ok(true)`, assuming availability.
    async fn is_available(&self) -> Result<bool> {
        Ok(true)
    }
}
