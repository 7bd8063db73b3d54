//! RodioSink -- plays synthesized speech on the default output device.

use std::io::Cursor;

use rodio::{Decoder, OutputStream, Sink};

use readaloud_core::narrate::AudioSink;
use readaloud_types::speech::{NarrationError, SpeechAudio};

/// Blocking playback through `rodio`.
///
/// The output stream is not `Send`, so it is opened on the calling thread
/// for every clip and dropped once the clip has finished.
#[derive(Debug, Clone)]
pub struct RodioSink {
    volume: f32,
}

impl RodioSink {
    pub fn new() -> Self {
        Self { volume: 1.0 }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Default for RodioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for RodioSink {
    fn play(&self, audio: &SpeechAudio) -> Result<(), NarrationError> {
        // Decode before touching the device so bad audio fails the same way everywhere.
        let source = Decoder::new(Cursor::new(audio.bytes.clone())).map_err(|e| {
            NarrationError::Playback(format!("failed to decode {}: {e}", audio.media_type))
        })?;

        let (_stream, handle) = OutputStream::try_default()
            .map_err(|e| NarrationError::Playback(format!("failed to open audio output: {e}")))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| NarrationError::Playback(format!("failed to create audio sink: {e}")))?;

        sink.set_volume(self.volume);
        sink.append(source);
        sink.sleep_until_end();

        tracing::debug!(bytes = audio.bytes.len(), "Playback finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(RodioSink::new().with_volume(1.7).volume(), 1.0);
        assert_eq!(RodioSink::new().with_volume(-0.2).volume(), 0.0);
        assert_eq!(RodioSink::default().volume(), 1.0);
    }

    #[test]
    fn test_undecodable_audio_is_a_playback_error() {
        let audio = SpeechAudio {
            media_type: "audio/mpeg".to_string(),
            bytes: b"definitely not audio".to_vec(),
        };
        let err = RodioSink::new().play(&audio).unwrap_err();
        assert!(matches!(err, NarrationError::Playback(ref m) if m.contains("decode")));
    }
}
