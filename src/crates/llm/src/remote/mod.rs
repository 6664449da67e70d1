//! Remote completion providers.
//!
//! These providers require an API key and talk to a hosted endpoint.
//!
//! # Providers
//!
//! - **OpenAI-compatible** - OpenAI, OpenRouter, vLLM, LiteLLM, hosted gateways

pub mod openai;

pub use openai::OpenAiCompatibleClient;
