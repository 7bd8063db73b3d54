//! Scripted provider shared by the extractor and session tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use readaloud_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use super::provider::LlmProvider;

/// Replies with scripted results in order; records every request it sees.
/// Once the script runs out it keeps answering with `fallback`.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    capabilities: ProviderCapabilities,
}

impl MockProvider {
    pub fn replying(text: &str) -> Self {
        Self::scripted(Vec::new(), text)
    }

    pub fn scripted(script: Vec<Result<String, String>>, fallback: &str) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: fallback.to_string(),
            requests: Arc::new(Mutex::new(Vec::new())),
            capabilities: ProviderCapabilities {
                vision: true,
                max_context_tokens: 128_000,
                max_output_tokens: 4_096,
            },
        }
    }

    pub fn request_log(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()));
        let model = request.model.clone();

        async move {
            match next {
                Ok(content) => Ok(CompletionResponse {
                    id: "resp-mock".to_string(),
                    content,
                    model,
                    stop_reason: StopReason::EndTurn,
                    usage: Usage {
                        input_tokens: 120,
                        output_tokens: 30,
                    },
                }),
                Err(message) => Err(LlmError::Provider { message }),
            }
        }
    }
}
