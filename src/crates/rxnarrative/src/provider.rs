//! Completion provider selection
//!
//! Maps the `[llm]` config section onto one of the `llm` crate's clients.

use crate::config::LlmConfig;
use crate::error::{ReportError, Result};
use llm::config::{LocalLlmConfig, RemoteLlmConfig};
use llm::local::OllamaClient;
use llm::remote::OpenAiCompatibleClient;
use llm::stub::FixedCompletion;
use llm::CompletionModel;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const OPENAI_BASE: &str = "https://api.openai.com/v1";
const OLLAMA_BASE: &str = "http://localhost:11434";

/// Build the completion model named by `config.provider`
pub fn completion_model_from_config(config: &LlmConfig) -> Result<Arc<dyn CompletionModel>> {
    let provider = config.provider.to_lowercase();
    let timeout = Duration::from_secs(config.timeout_secs);

    debug!(provider = %provider, model = %config.model, "Selecting completion provider");

    match provider.as_str() {
        "openai" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| ReportError::Config("OpenAI API key not configured".to_string()))?;

            let mut remote_config = RemoteLlmConfig::new(
                api_key,
                config.api_base.clone().unwrap_or_else(|| OPENAI_BASE.to_string()),
                config.model.clone(),
            )
            .with_timeout(timeout);
            if let Some(ref organization) = config.organization {
                remote_config = remote_config.with_organization(organization.clone());
            }

            let client = OpenAiCompatibleClient::new(remote_config)
                .map_err(|e| ReportError::Config(format!("OpenAI client: {}", e)))?;
            Ok(Arc::new(client))
        }

        "ollama" => {
            let local_config = LocalLlmConfig::new(
                config.api_base.clone().unwrap_or_else(|| OLLAMA_BASE.to_string()),
                config.model.clone(),
            )
            .with_timeout(timeout);

            let client = OllamaClient::new(local_config)
                .map_err(|e| ReportError::Config(format!("Ollama client: {}", e)))?;
            Ok(Arc::new(client))
        }

        "stub" => {
            let stub = match config.stub_reply {
                Some(ref reply) => FixedCompletion::new(config.model.clone(), reply.clone()),
                None => FixedCompletion::echo(config.model.clone()),
            };
            Ok(Arc::new(stub))
        }

        _ => Err(ReportError::Config(format!(
            "Unsupported LLM provider: {}. Available: openai, ollama, stub",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm::CompletionRequest;

    #[test]
    fn test_openai_requires_key() {
        let config = LlmConfig {
            api_key: None,
            ..LlmConfig::default()
        };

        let err = completion_model_from_config(&config).err().unwrap();
        assert!(err.to_string().contains("API key not configured"));
    }

    #[test]
    fn test_openai_with_key() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            api_base: Some("http://127.0.0.1:9/v1".to_string()),
            ..LlmConfig::default()
        };

        let model = completion_model_from_config(&config).unwrap();
        assert_eq!(model.model(), "llama3.1-8b");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: "Ollama".to_string(),
            model: "llama3.1:8b".to_string(),
            api_key: None,
            ..LlmConfig::default()
        };

        let model = completion_model_from_config(&config).unwrap();
        assert_eq!(model.model(), "llama3.1:8b");
    }

    #[tokio::test]
    async fn test_stub_provider_replies() {
        let config = LlmConfig {
            provider: "stub".to_string(),
            stub_reply: Some("fixed narrative".to_string()),
            ..LlmConfig::default()
        };

        let model = completion_model_from_config(&config).unwrap();
        let response = model.complete(CompletionRequest::new("anything")).await.unwrap();
        assert_eq!(response.text, "fixed narrative");
    }

    #[test]
    fn test_unknown_provider() {
        let config = LlmConfig {
            provider: "cortex".to_string(),
            ..LlmConfig::default()
        };

        let err = completion_model_from_config(&config).err().unwrap();
        assert!(matches!(err, ReportError::Config(_)));
    }
}
