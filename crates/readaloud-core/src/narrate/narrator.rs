//! Narrator: speaks extracted page text, never fails the caller.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span, warn};

use readaloud_types::speech::{NarrationError, NarrationOutcome, SpeechAudio, SpeechRequest};

use super::synthesizer::BoxSpeechSynthesizer;

/// Blocking audio playback. `play` returns once the audio has finished.
///
/// Called from a blocking worker thread, never on the async executor.
pub trait AudioSink: Send + Sync {
    fn play(&self, audio: &SpeechAudio) -> Result<(), NarrationError>;
}

/// Voice and model identifiers passed with every synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSettings {
    pub voice_id: String,
    pub model_id: String,
}

struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&self, _audio: &SpeechAudio) -> Result<(), NarrationError> {
        Ok(())
    }
}

/// Synthesizes and plays page text.
pub struct Narrator {
    synthesizer: Option<BoxSpeechSynthesizer>,
    sink: Arc<dyn AudioSink>,
    voice: VoiceSettings,
}

impl Narrator {
    pub fn new(
        synthesizer: BoxSpeechSynthesizer,
        sink: Arc<dyn AudioSink>,
        voice: VoiceSettings,
    ) -> Self {
        Self {
            synthesizer: Some(synthesizer),
            sink,
            voice,
        }
    }

    /// A narrator that never produces audio. Every `speak` is `Skipped`.
    pub fn muted() -> Self {
        Self {
            synthesizer: None,
            sink: Arc::new(SilentSink),
            voice: VoiceSettings {
                voice_id: String::new(),
                model_id: String::new(),
            },
        }
    }

    pub fn is_muted(&self) -> bool {
        self.synthesizer.is_none()
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    /// Synthesize `text` and play it to completion.
    ///
    /// Synthesis and playback errors are logged and returned as
    /// [`NarrationOutcome::Failed`].
    pub async fn speak(&self, text: &str) -> NarrationOutcome {
        if text.trim().is_empty() {
            return NarrationOutcome::Skipped;
        }
        let Some(synthesizer) = &self.synthesizer else {
            debug!("Narration muted, skipping speech");
            return NarrationOutcome::Skipped;
        };

        let request = SpeechRequest {
            text: text.to_string(),
            voice_id: self.voice.voice_id.clone(),
            model_id: self.voice.model_id.clone(),
        };

        let span = info_span!(
            "speech.narrate",
            speech.system = synthesizer.name(),
            speech.model = %self.voice.model_id,
            chars = text.len(),
        );

        match self.synthesize_and_play(synthesizer, request).instrument(span).await {
            Ok(()) => NarrationOutcome::Spoken,
            Err(e) => {
                warn!(error = %e, "Narration failed, continuing without audio");
                NarrationOutcome::Failed(e.to_string())
            }
        }
    }

    async fn synthesize_and_play(
        &self,
        synthesizer: &BoxSpeechSynthesizer,
        request: SpeechRequest,
    ) -> Result<(), NarrationError> {
        let audio = synthesizer.synthesize(&request).await?;
        debug!(bytes = audio.bytes.len(), media_type = %audio.media_type, "Speech synthesized");

        let sink = Arc::clone(&self.sink);
        tokio::task::spawn_blocking(move || sink.play(&audio))
            .await
            .map_err(|e| NarrationError::Playback(format!("playback task aborted: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrate::synthesizer::SpeechSynthesizer;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedSynth {
        fail: bool,
        seen: Arc<Mutex<Vec<SpeechRequest>>>,
    }

    impl SpeechSynthesizer for ScriptedSynth {
        fn name(&self) -> &str {
            "scripted"
        }

        fn synthesize(
            &self,
            request: &SpeechRequest,
        ) -> impl Future<Output = Result<SpeechAudio, NarrationError>> + Send {
            self.seen.lock().unwrap().push(request.clone());
            let fail = self.fail;
            async move {
                if fail {
                    Err(NarrationError::Synthesis("quota exceeded".to_string()))
                } else {
                    Ok(SpeechAudio {
                        media_type: "audio/mpeg".to_string(),
                        bytes: vec![1, 2, 3],
                    })
                }
            }
        }
    }

    #[derive(Default)]
    struct CountingSink {
        plays: AtomicUsize,
        fail: bool,
    }

    impl AudioSink for CountingSink {
        fn play(&self, audio: &SpeechAudio) -> Result<(), NarrationError> {
            assert_eq!(audio.bytes, vec![1, 2, 3]);
            self.plays.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NarrationError::Playback("no output device".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn voice() -> VoiceSettings {
        VoiceSettings {
            voice_id: "voice-1".to_string(),
            model_id: "eleven_turbo_v2_5".to_string(),
        }
    }

    fn narrator(fail_synth: bool, sink: Arc<CountingSink>) -> (Narrator, Arc<Mutex<Vec<SpeechRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let synth = ScriptedSynth {
            fail: fail_synth,
            seen: Arc::clone(&seen),
        };
        (
            Narrator::new(BoxSpeechSynthesizer::new(synth), sink, voice()),
            seen,
        )
    }

    #[tokio::test]
    async fn test_speak_synthesizes_and_plays() {
        let sink = Arc::new(CountingSink::default());
        let (narrator, seen) = narrator(false, Arc::clone(&sink));

        let outcome = narrator.speak("Once upon a time.").await;

        assert_eq!(outcome, NarrationOutcome::Spoken);
        assert_eq!(sink.plays.load(Ordering::SeqCst), 1);
        let requests = seen.lock().unwrap();
        assert_eq!(requests[0].text, "Once upon a time.");
        assert_eq!(requests[0].voice_id, "voice-1");
        assert_eq!(requests[0].model_id, "eleven_turbo_v2_5");
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_caught() {
        let sink = Arc::new(CountingSink::default());
        let (narrator, _) = narrator(true, Arc::clone(&sink));

        let outcome = narrator.speak("Once upon a time.").await;

        assert!(matches!(outcome, NarrationOutcome::Failed(ref r) if r.contains("quota")));
        assert_eq!(sink.plays.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_playback_failure_is_caught() {
        let sink = Arc::new(CountingSink {
            plays: AtomicUsize::new(0),
            fail: true,
        });
        let (narrator, _) = narrator(false, sink);

        let outcome = narrator.speak("Once upon a time.").await;
        assert!(matches!(outcome, NarrationOutcome::Failed(ref r) if r.contains("no output device")));
    }

    #[tokio::test]
    async fn test_empty_text_is_skipped_without_synthesis() {
        let sink = Arc::new(CountingSink::default());
        let (narrator, seen) = narrator(false, sink);

        assert_eq!(narrator.speak("  \n").await, NarrationOutcome::Skipped);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_muted_narrator_skips() {
        let narrator = Narrator::muted();
        assert!(narrator.is_muted());
        assert_eq!(narrator.speak("Hello").await, NarrationOutcome::Skipped);
    }
}
