//! Wire configuration and credentials into the core reading components.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use readaloud_core::context::{ContextStore, RetentionPolicy};
use readaloud_core::extract::prompt::SYSTEM_INSTRUCTION;
use readaloud_core::extract::{ExtractorConfig, PageExtractor};
use readaloud_core::narrate::Narrator;
use readaloud_infra::audio::RodioSink;
use readaloud_infra::config::{apply_env, load_reader_config, resolve_data_dir, validate};
use readaloud_infra::llm::create_provider;
use readaloud_infra::secret::{Credentials, OPENAI_API_KEY};
use readaloud_infra::speech::{MuteReason, build_narrator};
use readaloud_types::config::ReaderConfig;
use readaloud_types::error::ConfigError;
use readaloud_types::llm::ProviderType;

use super::ReaderOverrides;

/// Effective configuration for one run.
pub struct Settings {
    pub data_dir: PathBuf,
    pub config: ReaderConfig,
    pub credentials: Credentials,
}

impl Settings {
    /// Data dir -> config.toml -> environment -> CLI flags, then validate.
    pub async fn load(data_dir: Option<PathBuf>, overrides: &ReaderOverrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir(data_dir)?;
        let mut config = load_reader_config(&data_dir).await;
        let credentials = Credentials::from_env();

        apply_env(&mut config, &credentials);
        overrides.apply(&mut config);
        validate(&config)?;

        Ok(Self {
            data_dir,
            config,
            credentials,
        })
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(readaloud_infra::config::CONFIG_FILE)
    }
}

/// Everything a reading session needs besides the frame source.
pub struct Reader {
    pub extractor: PageExtractor,
    pub narrator: Narrator,
    pub store: ContextStore,
    pub mute_reason: Option<MuteReason>,
}

pub fn retention_policy(config: &ReaderConfig) -> RetentionPolicy {
    if config.context.retain_replies {
        RetentionPolicy::RetainReplies {
            max_pages: config.context.max_retained_pages,
        }
    } else {
        RetentionPolicy::Discard
    }
}

pub fn extractor_config(config: &ReaderConfig) -> ExtractorConfig {
    ExtractorConfig {
        model: config.vision.model_or_default(),
        max_tokens: config.vision.max_tokens,
        temperature: config.vision.temperature,
        target_language: config
            .target_language
            .clone()
            .filter(|language| !language.trim().is_empty()),
        jpeg_quality: config.vision.jpeg_quality,
    }
}

/// Build the extractor, narrator and context store. Consumes the credentials.
pub fn build_reader(config: &ReaderConfig, credentials: Credentials, mute: bool) -> anyhow::Result<Reader> {
    if config.vision.provider == ProviderType::OpenAi && credentials.openai_api_key.is_none() {
        return Err(ConfigError::MissingCredential(OPENAI_API_KEY).into());
    }

    let provider = create_provider(&config.vision, credentials.openai_api_key)
        .context("failed to create vision provider")?;
    let extractor = PageExtractor::new(provider, extractor_config(config));

    let (narrator, mute_reason) = build_narrator(
        &config.speech,
        credentials.elevenlabs_api_key,
        mute,
        Arc::new(RodioSink::new()),
    )
    .context("failed to set up narration")?;

    let store = ContextStore::new(SYSTEM_INSTRUCTION).with_retention(retention_policy(config));

    Ok(Reader {
        extractor,
        narrator,
        store,
        mute_reason,
    })
}
