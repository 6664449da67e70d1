//! Text-completion providers for rxnarrative.
//!
//! This crate defines the [`CompletionModel`] trait, the single capability the
//! narrative routine needs from a language model: send one prompt to a fixed
//! model and get one piece of text back. No conversation state, no streaming,
//! no tool calls.
//!
//! # Local Providers
//!
//! - **Ollama** - `/api/generate` on a local or LAN Ollama server
//!
//! # Remote Providers
//!
//! - **OpenAI-compatible** - any `/chat/completions` endpoint (OpenAI,
//!   OpenRouter, vLLM, hosted gateways serving `llama3.1-8b`, ...)
//!
//! # Stub
//!
//! - [`stub::FixedCompletion`] - deterministic text, records prompts; for tests
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::remote::OpenAiCompatibleClient;
//! use llm::config::RemoteLlmConfig;
//! use llm::{CompletionModel, CompletionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env(
//!         "OPENAI_API_KEY",
//!         "https://api.openai.com/v1",
//!         "gpt-4o-mini",
//!     )?;
//!     let client = OpenAiCompatibleClient::new(config)?;
//!
//!     let response = client
//!         .complete(CompletionRequest::new("Summarise last month's sales."))
//!         .await?;
//!     println!("{}", response.text);
//!
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod config;
pub mod error;
pub mod stub;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export commonly used types
pub use completion::{CompletionModel, CompletionRequest, CompletionResponse, TokenUsage};
pub use config::{LocalLlmConfig, RemoteLlmConfig};
pub use error::{LlmError, Result};
