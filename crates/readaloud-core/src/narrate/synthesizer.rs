//! SpeechSynthesizer trait and its object-safe wrapper.
//!
//! Same blanket-impl pattern as [`crate::llm::box_provider::BoxLlmProvider`].

use std::future::Future;
use std::pin::Pin;

use readaloud_types::speech::{NarrationError, SpeechAudio, SpeechRequest};

/// Text-to-speech backend.
pub trait SpeechSynthesizer: Send + Sync {
    /// Human-readable backend name (e.g., "elevenlabs").
    fn name(&self) -> &str;

    /// Render `request.text` with the requested voice and model.
    fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> impl Future<Output = Result<SpeechAudio, NarrationError>> + Send;
}

/// Object-safe version of [`SpeechSynthesizer`] with boxed futures.
pub trait SpeechSynthesizerDyn: Send + Sync {
    fn name(&self) -> &str;

    fn synthesize_boxed<'a>(
        &'a self,
        request: &'a SpeechRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SpeechAudio, NarrationError>> + Send + 'a>>;
}

impl<T: SpeechSynthesizer> SpeechSynthesizerDyn for T {
    fn name(&self) -> &str {
        SpeechSynthesizer::name(self)
    }

    fn synthesize_boxed<'a>(
        &'a self,
        request: &'a SpeechRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SpeechAudio, NarrationError>> + Send + 'a>> {
        Box::pin(self.synthesize(request))
    }
}

/// Type-erased speech synthesizer.
pub struct BoxSpeechSynthesizer {
    inner: Box<dyn SpeechSynthesizerDyn + Send + Sync>,
}

impl BoxSpeechSynthesizer {
    pub fn new<T: SpeechSynthesizer + 'static>(synthesizer: T) -> Self {
        Self {
            inner: Box::new(synthesizer),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechAudio, NarrationError> {
        self.inner.synthesize_boxed(request).await
    }
}
