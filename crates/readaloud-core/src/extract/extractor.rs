//! PageExtractor: one frame -> one vision round trip -> story text.

use tracing::{Instrument, debug, info, info_span};

use readaloud_types::error::ExtractionError;
use readaloud_types::llm::{CompletionRequest, Message};

use crate::capture::Frame;
use crate::context::{ContextStore, ConversationContext};
use crate::llm::box_provider::BoxLlmProvider;

use super::encode::encode_frame;
use super::prompt;

/// Request parameters for page extraction.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    /// Translate story text into this language. `None` keeps the original.
    pub target_language: Option<String>,
    pub jpeg_quality: u8,
}

/// Turns captured pages into narratable text through a vision provider.
pub struct PageExtractor {
    provider: BoxLlmProvider,
    config: ExtractorConfig,
}

impl PageExtractor {
    pub fn new(provider: BoxLlmProvider, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the story text from one page.
    ///
    /// - `None` frame: returns `Ok(None)` without touching the provider or
    ///   the context.
    /// - Otherwise exactly one provider call is made, with the page
    ///   instruction and image appended to the context as a transient turn.
    ///   The turn is gone again when this returns, on success and on error.
    ///
    /// The model's answer is returned as-is; an empty string means the page
    /// had no story text.
    pub async fn extract(
        &self,
        frame: Option<&Frame>,
        store: &mut ContextStore,
    ) -> Result<Option<String>, ExtractionError> {
        let Some(frame) = frame else {
            debug!("No frame supplied, skipping extraction");
            return Ok(None);
        };

        let image = encode_frame(frame, self.config.jpeg_quality)?;
        let instruction = prompt::page_instruction(self.config.target_language.as_deref());
        let turn = Message::user(instruction.clone()).with_image(image);

        let span = info_span!(
            "gen_ai.extract",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %self.config.model,
            gen_ai.request.max_tokens = self.config.max_tokens,
            gen_ai.request.temperature = ?self.config.temperature,
            target_language = self.config.target_language.as_deref().unwrap_or("original"),
            context_entries = store.len() + 1,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
        );

        let response = store
            .with_transient_turn(turn, async |context: &ConversationContext| {
                let request = self.build_request(context);
                self.provider.complete(&request).await
            })
            .instrument(span.clone())
            .await
            .map_err(|source| ExtractionError::Provider {
                provider: self.provider.name().to_string(),
                source,
            })?;

        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);

        info!(
            response_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            chars = response.content.len(),
            "Page extracted"
        );

        if !response.content.trim().is_empty() {
            store.retain_exchange(&instruction, &response.content);
        }

        Ok(Some(response.content))
    }

    /// Build the completion request from the full context, transient turn included.
    fn build_request(&self, context: &ConversationContext) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages: context.to_messages(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}
