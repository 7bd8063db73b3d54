use thiserror::Error;

use crate::llm::LlmError;

/// Errors from a single page extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to encode page image: {0}")]
    Encode(String),

    #[error("vision provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: LlmError,
    },
}

/// Errors related to configuration loading and credential resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("no data directory could be determined")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_names_provider() {
        let err = ExtractionError::Provider {
            provider: "openai".to_string(),
            source: LlmError::AuthenticationFailed,
        };
        assert_eq!(
            err.to_string(),
            "vision provider 'openai' failed: authentication failed"
        );
    }

    #[test]
    fn test_missing_credential_message() {
        let err = ConfigError::MissingCredential("OPENAI_API_KEY");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
