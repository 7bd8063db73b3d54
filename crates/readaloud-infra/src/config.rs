//! Configuration loader for readaloud.
//!
//! Reads `config.toml` from the data directory (`~/.readaloud/` unless
//! overridden) and deserializes it into [`ReaderConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use readaloud_types::config::ReaderConfig;
use readaloud_types::error::ConfigError;

use crate::secret::Credentials;

pub const CONFIG_FILE: &str = "config.toml";
const DATA_DIR_NAME: &str = ".readaloud";

/// `~/.readaloud`.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .ok_or(ConfigError::NoDataDir)
}

/// The explicit directory if given, otherwise [`default_data_dir`].
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(dir) => Ok(dir),
        None => default_data_dir(),
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`ReaderConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_reader_config(data_dir: &Path) -> ReaderConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ReaderConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ReaderConfig::default();
        }
    };

    match toml::from_str::<ReaderConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ReaderConfig::default()
        }
    }
}

/// Fill settings the file left open from the environment.
///
/// `ELEVENLABS_VOICE_ID` is used only when `[speech] voice_id` is unset.
pub fn apply_env(config: &mut ReaderConfig, credentials: &Credentials) {
    if config.speech.voice_id.is_none() {
        config.speech.voice_id = credentials.elevenlabs_voice_id.clone();
    }
}

/// Reject values that deserialize but cannot work.
pub fn validate(config: &ReaderConfig) -> Result<(), ConfigError> {
    if !(1..=100).contains(&config.vision.jpeg_quality) {
        return Err(ConfigError::Invalid(format!(
            "vision.jpeg_quality must be between 1 and 100, got {}",
            config.vision.jpeg_quality
        )));
    }
    if config.vision.max_tokens == 0 {
        return Err(ConfigError::Invalid(
            "vision.max_tokens must be greater than zero".to_string(),
        ));
    }
    if let Some(t) = config.vision.temperature
        && !(0.0..=2.0).contains(&t)
    {
        return Err(ConfigError::Invalid(format!(
            "vision.temperature must be between 0 and 2, got {t}"
        )));
    }
    if config.context.retain_replies && config.context.max_retained_pages == 0 {
        return Err(ConfigError::Invalid(
            "context.max_retained_pages must be at least 1 when retain_replies is on".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use readaloud_types::capture::Rotation;
    use readaloud_types::llm::ProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_reader_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_reader_config(tmp.path()).await;
        assert_eq!(config.vision.provider, ProviderType::OpenAi);
        assert_eq!(config.vision.jpeg_quality, 85);
        assert!(config.target_language.is_none());
    }

    #[tokio::test]
    async fn load_reader_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
target_language = "French"

[vision]
provider = "ollama"
model = "llama3.2-vision:90b"

[capture]
rotation = "180"

[context]
retain_replies = true
max_retained_pages = 2
"#,
        )
        .await
        .unwrap();

        let config = load_reader_config(tmp.path()).await;
        assert_eq!(config.target_language.as_deref(), Some("French"));
        assert_eq!(config.vision.provider, ProviderType::Ollama);
        assert_eq!(config.vision.model_or_default(), "llama3.2-vision:90b");
        assert_eq!(config.capture.rotation, Rotation::Cw180);
        assert!(config.context.retain_replies);
        assert_eq!(config.context.max_retained_pages, 2);
    }

    #[tokio::test]
    async fn load_reader_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_reader_config(tmp.path()).await;
        assert_eq!(config.vision.provider, ProviderType::OpenAi);
        assert_eq!(config.speech.model_id, "eleven_turbo_v2_5");
    }

    #[test]
    fn resolve_data_dir_prefers_explicit() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/readaloud-test"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/readaloud-test"));
    }

    #[test]
    fn apply_env_fills_voice_only_when_unset() {
        let creds = Credentials {
            openai_api_key: None,
            elevenlabs_api_key: None,
            elevenlabs_voice_id: Some("env-voice".to_string()),
        };

        let mut config = ReaderConfig::default();
        apply_env(&mut config, &creds);
        assert_eq!(config.speech.voice_id.as_deref(), Some("env-voice"));

        let mut config = ReaderConfig::default();
        config.speech.voice_id = Some("file-voice".to_string());
        apply_env(&mut config, &creds);
        assert_eq!(config.speech.voice_id.as_deref(), Some("file-voice"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = ReaderConfig::default();
        assert!(validate(&config).is_ok());

        config.vision.jpeg_quality = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));

        let mut config = ReaderConfig::default();
        config.vision.temperature = Some(3.5);
        assert!(validate(&config).is_err());

        let mut config = ReaderConfig::default();
        config.context.retain_replies = true;
        config.context.max_retained_pages = 0;
        assert!(validate(&config).is_err());
    }
}
