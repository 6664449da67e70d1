//! Narrative generator: one prompt in, one narrative out

use crate::config::LlmConfig;
use crate::error::{ReportError, Result};
use crate::models::{Narrative, Prompt};
use llm::{CompletionModel, CompletionRequest};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sends each prompt as an independent completion call.
///
/// No retries and no response validation beyond what the provider does.
#[derive(Clone)]
pub struct NarrativeGenerator {
    model: Arc<dyn CompletionModel>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
}

impl std::fmt::Debug for NarrativeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeGenerator")
            .field("model", &self.model.model())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl NarrativeGenerator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Take sampling settings from the `[llm]` section
    pub fn with_settings(mut self, config: &LlmConfig) -> Self {
        self.temperature = config.temperature;
        self.max_tokens = config.max_tokens;
        self
    }

    /// Model identifier sent on every call
    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    /// Provider reachability, for `health`
    pub async fn is_available(&self) -> bool {
        self.model.is_available().await.unwrap_or(false)
    }

    pub async fn generate(&self, prompt: &Prompt) -> Result<Narrative> {
        let mut request = CompletionRequest::new(prompt.text.clone());
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        debug!(section = %prompt.section, prompt = %prompt.text, "Sending prompt");
        let started = Instant::now();

        let response = self
            .model
            .complete(request)
            .await
            .map_err(|source| {
                warn!(
                    section = %prompt.section,
                    retryable = source.is_retryable(),
                    error = %source,
                    "Completion failed"
                );
                ReportError::ExternalService {
                    section: prompt.section,
                    source,
                }
            })?;

        info!(
            section = %prompt.section,
            model = %response.model,
            prompt_chars = prompt.text.chars().count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Narrative generated"
        );
        debug!(section = %prompt.section, narrative = %response.text, "Completion text");

        Ok(Narrative {
            section: prompt.section,
            text: response.text,
            model: response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;
    use llm::stub::FixedCompletion;

    #[tokio::test]
    async fn test_generate_passes_prompt_through() {
        let stub = FixedCompletion::new("llama3.1-8b", "Volumes held steady.");
        let generator = NarrativeGenerator::new(Arc::new(stub.clone()));

        let narrative = generator
            .generate(&Prompt::new(Section::Kpi, "facts"))
            .await
            .unwrap();

        assert_eq!(narrative.section, Section::Kpi);
        assert_eq!(narrative.text, "Volumes held steady.");
        assert_eq!(narrative.model, "llama3.1-8b");
        assert_eq!(stub.prompts(), vec!["facts".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_names_the_section() {
        let stub = FixedCompletion::new("m", "unused").failing_on(1);
        let generator = NarrativeGenerator::new(Arc::new(stub));

        let err = generator
            .generate(&Prompt::new(Section::Forecast, "facts"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReportError::ExternalService {
                section: Section::Forecast,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_stub_model_is_available() {
        let generator = NarrativeGenerator::new(Arc::new(FixedCompletion::echo("m")));
        assert!(generator.is_available().await);
    }

    #[test]
    fn test_settings_from_config() {
        let config = LlmConfig {
            temperature: Some(0.2),
            max_tokens: Some(256),
            ..LlmConfig::default()
        };
        let generator =
            NarrativeGenerator::new(Arc::new(FixedCompletion::new("m", "x"))).with_settings(&config);

        assert_eq!(generator.temperature, Some(0.2));
        assert_eq!(generator.max_tokens, Some(256));
        assert_eq!(generator.model_name(), "m");
    }
}
