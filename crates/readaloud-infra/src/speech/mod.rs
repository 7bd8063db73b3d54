//! Speech synthesis adapters and narrator assembly.

pub mod elevenlabs;

use std::sync::Arc;

use secrecy::SecretString;

use readaloud_core::narrate::{AudioSink, BoxSpeechSynthesizer, Narrator, VoiceSettings};
use readaloud_types::config::SpeechConfig;
use readaloud_types::speech::NarrationError;

use self::elevenlabs::ElevenLabsSynthesizer;

/// Why a session runs without audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteReason {
    Requested,
    MissingApiKey,
    MissingVoice,
}

impl std::fmt::Display for MuteReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MuteReason::Requested => write!(f, "muted on request"),
            MuteReason::MissingApiKey => write!(f, "ELEVENLABS_API_KEY is not set"),
            MuteReason::MissingVoice => write!(f, "no voice id configured"),
        }
    }
}

/// Build the narrator for a session.
///
/// Returns a muted narrator (and the reason) when speech is switched off or
/// cannot be configured. A missing key never stops a reading session.
pub fn build_narrator(
    config: &SpeechConfig,
    api_key: Option<SecretString>,
    mute: bool,
    sink: Arc<dyn AudioSink>,
) -> Result<(Narrator, Option<MuteReason>), NarrationError> {
    if mute {
        return Ok((Narrator::muted(), Some(MuteReason::Requested)));
    }
    let Some(api_key) = api_key else {
        return Ok((Narrator::muted(), Some(MuteReason::MissingApiKey)));
    };
    let Some(voice_id) = config.voice_id.clone().filter(|v| !v.is_empty()) else {
        return Ok((Narrator::muted(), Some(MuteReason::MissingVoice)));
    };

    let synthesizer = ElevenLabsSynthesizer::new(api_key)?.with_base_url(&config.base_url);
    let voice = VoiceSettings {
        voice_id,
        model_id: config.model_id.clone(),
    };

    Ok((
        Narrator::new(BoxSpeechSynthesizer::new(synthesizer), sink, voice),
        None,
    ))
}
