//! Local completion providers.
//!
//! These talk to a model server on localhost or the local network and need
//! no API key.
//!
//! # Providers
//!
//! - **Ollama** - `/api/generate`

pub mod ollama;

pub use ollama::OllamaClient;
