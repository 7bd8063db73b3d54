//! ElevenLabsSynthesizer -- [`SpeechSynthesizer`] backed by the ElevenLabs
//! text-to-speech API.
//!
//! `POST {base_url}/v1/text-to-speech/{voice_id}` with the `xi-api-key`
//! header and a `{text, model_id}` JSON body. The response body is MP3.
//!
//! The API key is wrapped in [`SecretString`] and only exposed when building
//! the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use readaloud_core::narrate::SpeechSynthesizer;
use readaloud_types::speech::{NarrationError, SpeechAudio, SpeechRequest};

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

#[derive(Debug, Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// ElevenLabs text-to-speech client. Intentionally not `Debug`.
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl ElevenLabsSynthesizer {
    const TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(api_key: SecretString) -> Result<Self, NarrationError> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| NarrationError::Synthesis(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: ELEVENLABS_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, voice_id)
    }
}

impl SpeechSynthesizer for ElevenLabsSynthesizer {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechAudio, NarrationError> {
        if request.voice_id.is_empty() {
            return Err(NarrationError::Synthesis("no voice id configured".to_string()));
        }

        let body = TextToSpeechBody {
            text: &request.text,
            model_id: &request.model_id,
        };

        let response = self
            .client
            .post(self.url(&request.voice_id))
            .header("xi-api-key", self.api_key.expose_secret())
            .header("accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| NarrationError::Synthesis(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => NarrationError::AuthenticationFailed,
                _ => NarrationError::Synthesis(format!("HTTP {status}: {error_body}")),
            });
        }

        let media_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NarrationError::Synthesis(format!("failed to read audio: {e}")))?;

        if bytes.is_empty() {
            return Err(NarrationError::Synthesis("empty audio response".to_string()));
        }

        Ok(SpeechAudio {
            media_type,
            bytes: bytes.to_vec(),
        })
    }
}
