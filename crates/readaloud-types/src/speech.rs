//! Text-to-speech request, audio and outcome types.

use serde::{Deserialize, Serialize};

/// One synthesis call: the text plus the voice and model to render it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
}

/// Encoded audio returned by a synthesizer, ready for playback.
#[derive(Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    /// Container/codec of `bytes` (e.g. "audio/mpeg").
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SpeechAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAudio")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Errors from speech synthesis or playback.
#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("speech service authentication failed")]
    AuthenticationFailed,

    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// What happened when the narrator was asked to speak.
///
/// Narration never fails the session; failures are folded into this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum NarrationOutcome {
    Spoken,
    Skipped,
    Failed(String),
}
