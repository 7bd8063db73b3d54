//! OllamaProvider: local vision models served by Ollama.
//!
//! Sends `POST {base_url}/api/chat` with `stream: false`. The page image is
//! attached to the user message as an inline base64 string.

pub mod types;

use std::time::Duration;

use readaloud_core::llm::provider::LlmProvider;
use readaloud_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

use self::types::{OllamaChatRequest, OllamaChatResponse, OllamaErrorBody, OllamaMessage, OllamaOptions};

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Vision provider for a local Ollama server. No credentials.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl OllamaProvider {
    /// Large local models can take minutes on a first (cold) load.
    const TIMEOUT: Duration = Duration::from_secs(600);

    pub fn new(model: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: OLLAMA_BASE_URL.to_string(),
            model,
            capabilities: ProviderCapabilities {
                vision: true,
                max_context_tokens: 128_000,
                max_output_tokens: 4_096,
            },
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_ollama_request(&self, request: &CompletionRequest) -> OllamaChatRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
                images: m.images.iter().map(|image| image.data.clone()).collect(),
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        OllamaChatRequest {
            model,
            messages,
            stream: false,
            options: OllamaOptions {
                num_predict: Some(request.max_tokens),
                temperature: request.temperature,
            },
        }
    }
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_ollama_request(request);
        let url = self.url("/api/chat");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaErrorBody>(&error_body)
                .map(|b| b.error)
                .unwrap_or(error_body);
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(message),
                404 => LlmError::InvalidRequest(format!("model not available: {message}")),
                503 => LlmError::Overloaded(message),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {message}"),
                },
            });
        }

        let ollama_resp: OllamaChatResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        into_completion(ollama_resp)
    }
}

fn into_completion(resp: OllamaChatResponse) -> Result<CompletionResponse, LlmError> {
    let message = resp.message.ok_or(LlmError::EmptyResponse)?;

    let stop_reason = match resp.done_reason.as_deref() {
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    };

    Ok(CompletionResponse {
        // Ollama has no response id; the creation timestamp is unique enough for logs.
        id: resp.created_at.unwrap_or_default(),
        content: message.content,
        model: resp.model,
        stop_reason,
        usage: Usage {
            input_tokens: resp.prompt_eval_count.unwrap_or(0),
            output_tokens: resp.eval_count.unwrap_or(0),
        },
    })
}
