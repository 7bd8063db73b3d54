//! Configuration types for readaloud.
//!
//! `ReaderConfig` represents the top-level `config.toml` in the data
//! directory. Every field has a default so an empty or missing file yields
//! a working configuration (credentials come from the environment).

use serde::{Deserialize, Serialize};

use crate::capture::Rotation;
use crate::llm::ProviderType;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Language to translate story text into. `None` keeps the book's language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,

    #[serde(default)]
    pub vision: VisionConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub context: ContextConfig,
}

/// Vision provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default)]
    pub provider: ProviderType,

    /// Model identifier. Defaults per provider when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Override the provider's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// JPEG quality (1-100) used when encoding captured pages.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_jpeg_quality() -> u8 {
    85
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: None,
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl VisionConfig {
    /// The configured model, or the provider's default vision model.
    pub fn model_or_default(&self) -> String {
        match (&self.model, self.provider) {
            (Some(model), _) => model.clone(),
            (None, ProviderType::OpenAi) => "gpt-4o-mini".to_string(),
            (None, ProviderType::Ollama) => "llama3.2-vision".to_string(),
        }
    }
}

/// Text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Voice identifier. Falls back to the `ELEVENLABS_VOICE_ID` env var.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,

    #[serde(default = "default_speech_model")]
    pub model_id: String,

    #[serde(default = "default_speech_base_url")]
    pub base_url: String,
}

fn default_speech_model() -> String {
    "eleven_turbo_v2_5".to_string()
}

fn default_speech_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice_id: None,
            model_id: default_speech_model(),
            base_url: default_speech_base_url(),
        }
    }
}

/// Frame acquisition settings.
///
/// Document cameras are usually mounted upside down over the book and need
/// `rotation = "180"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Rotation applied to every frame before it is sent for analysis.
    #[serde(default)]
    pub rotation: Rotation,
}

/// Conversation context settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Keep the model's replies in context so later pages see earlier text.
    #[serde(default)]
    pub retain_replies: bool,

    /// Upper bound on retained pages when `retain_replies` is on.
    #[serde(default = "default_max_retained_pages")]
    pub max_retained_pages: usize,
}

fn default_max_retained_pages() -> usize {
    4
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            retain_replies: false,
            max_retained_pages: default_max_retained_pages(),
        }
    }
}
