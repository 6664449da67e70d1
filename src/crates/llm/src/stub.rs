//! Deterministic in-process completion model.
//!
//! `FixedCompletion` never touches the network. It answers every prompt with
//! the same text (or echoes the prompt back) and keeps the prompts it saw, so
//! tests can assert on exactly what would have been sent to a real provider.

use crate::completion::{CompletionModel, CompletionRequest, CompletionResponse};
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Reply {
    Fixed(String),
    Echo,
}

/// A completion model that returns canned text.
#[derive(Debug, Clone)]
pub struct FixedCompletion {
    model: String,
    reply: Reply,
    fail_on_call: Option<usize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FixedCompletion {
    /// Answer every prompt with `text`.
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reply: Reply::Fixed(text.into()),
            fail_on_call: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every prompt with the prompt itself.
    pub fn echo(model: impl Into<String>) -> Self {
        Self {
            reply: Reply::Echo,
            ..Self::new(model, String::new())
        }
    }

    /// Fail the `call`-th request (1-based) with `ServiceUnavailable`.
    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of requests received so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl CompletionModel for FixedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let call = {
            let mut prompts = self.prompts.lock();
            prompts.push(request.prompt.clone());
            prompts.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(LlmError::ServiceUnavailable(format!(
                "stub configured to fail on call {}",
                call
            )));
        }

        let text = match &self.reply {
            Reply::Fixed(text) => text.clone(),
            Reply::Echo => request.prompt,
        };

        Ok(CompletionResponse {
            text,
            model: self.model.clone(),
            usage: None,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
