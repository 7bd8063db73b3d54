//! Credentials from environment variables.
//!
//! Values are wrapped in [`SecretString`] as soon as they are read and are
//! never logged. Empty or non-Unicode variables count as unset.

use secrecy::SecretString;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ELEVENLABS_API_KEY: &str = "ELEVENLABS_API_KEY";
pub const ELEVENLABS_VOICE_ID: &str = "ELEVENLABS_VOICE_ID";

/// Read one environment variable as a secret.
pub fn env_secret(key: &str) -> Option<SecretString> {
    env_value(key).map(SecretString::from)
}

fn env_value(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => None,
    }
}

/// Everything readaloud resolves from the environment.
///
/// Deliberately not `Debug`; use [`Credentials::status`] for display.
pub struct Credentials {
    pub openai_api_key: Option<SecretString>,
    pub elevenlabs_api_key: Option<SecretString>,
    /// Not a secret, but it travels with the key.
    pub elevenlabs_voice_id: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env_secret(OPENAI_API_KEY),
            elevenlabs_api_key: env_secret(ELEVENLABS_API_KEY),
            elevenlabs_voice_id: env_value(ELEVENLABS_VOICE_ID),
        }
    }

    /// `(variable, is_set)` pairs for status output.
    pub fn status(&self) -> [(&'static str, bool); 3] {
        [
            (OPENAI_API_KEY, self.openai_api_key.is_some()),
            (ELEVENLABS_API_KEY, self.elevenlabs_api_key.is_some()),
            (ELEVENLABS_VOICE_ID, self.elevenlabs_voice_id.is_some()),
        ]
    }
}
