//! Vision provider implementations.
//!
//! Concrete implementations of the [`LlmProvider`] trait defined in
//! `readaloud-core`, plus [`create_provider`] which picks one from the
//! `[vision]` configuration.
//!
//! [`LlmProvider`]: readaloud_core::llm::provider::LlmProvider

pub mod ollama;
pub mod openai_compat;

use secrecy::SecretString;

use readaloud_core::llm::box_provider::BoxLlmProvider;
use readaloud_types::config::VisionConfig;
use readaloud_types::llm::{LlmError, ProviderType};

use self::ollama::OllamaProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the vision configuration.
///
/// `api_key` is required for OpenAI-compatible endpoints and ignored by
/// Ollama.
pub fn create_provider(
    config: &VisionConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let model = config.model_or_default();

    match config.provider {
        ProviderType::OpenAi => {
            let key = api_key.ok_or(LlmError::AuthenticationFailed)?;
            let provider = match config.base_url.as_deref() {
                Some(base_url) => OpenAiCompatibleProvider::custom(key, &model, base_url),
                None => OpenAiCompatibleProvider::openai(key, &model),
            };
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::Ollama => {
            let mut provider = OllamaProvider::new(model)?;
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            Ok(BoxLlmProvider::new(provider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_openai() {
        let config = VisionConfig::default();
        let provider = create_provider(&config, Some(SecretString::from("sk-test"))).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_provider_openai_with_base_url() {
        let config = VisionConfig {
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..VisionConfig::default()
        };
        let provider = create_provider(&config, Some(SecretString::from("key"))).unwrap();
        assert_eq!(provider.name(), "openai-compatible");
    }

    #[test]
    fn test_create_provider_openai_missing_key() {
        let result = create_provider(&VisionConfig::default(), None);
        match result {
            Err(LlmError::AuthenticationFailed) => {}
            Err(other) => panic!("Expected AuthenticationFailed, got: {other}"),
            Ok(_) => panic!("Expected error but got Ok"),
        }
    }

    #[test]
    fn test_create_provider_ollama_needs_no_key() {
        let config = VisionConfig {
            provider: ProviderType::Ollama,
            ..VisionConfig::default()
        };
        let provider = create_provider(&config, None).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert!(provider.capabilities().vision);
    }
}
