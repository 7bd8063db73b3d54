//! CLI command definitions for the `readaloud` binary.

pub mod banner;
pub mod check;
pub mod input;
pub mod observer;
pub mod page;
pub mod read;
pub mod setup;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use readaloud_types::capture::Rotation;
use readaloud_types::config::ReaderConfig;
use readaloud_types::llm::ProviderType;

/// Read picture books aloud: capture a page, extract the story, speak it.
#[derive(Parser)]
#[command(name = "readaloud", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Directory holding config.toml (default: ~/.readaloud).
    #[arg(long, global = true, env = "READALOUD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive reading session over a directory of page images.
    Read(ReadArgs),

    /// Extract (and optionally speak) the text of a single page image.
    Page {
        /// Page image (jpg, jpeg or png).
        image: PathBuf,

        /// Narrate the extracted text.
        #[arg(long)]
        speak: bool,

        #[command(flatten)]
        reader: ReaderOverrides,
    },

    /// Show the effective configuration and which credentials are set.
    Check {
        #[command(flatten)]
        reader: ReaderOverrides,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ReadArgs {
    /// Directory the page images are read from, in file-name order.
    pub pages_dir: PathBuf,

    /// Read this many pages without prompting, then stop.
    #[arg(long, conflicts_with = "all")]
    pub pages: Option<usize>,

    /// Read every page in the directory without prompting.
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub reader: ReaderOverrides,
}

impl ReadArgs {
    /// Unattended runs never prompt.
    pub fn is_unattended(&self, json: bool) -> bool {
        json || self.all || self.pages.is_some()
    }
}

/// Flags that override `config.toml` for one run.
#[derive(Args, Debug, Clone, Default)]
pub struct ReaderOverrides {
    /// Translate the story into this language (e.g. "French").
    #[arg(short, long)]
    pub language: Option<String>,

    /// Vision provider.
    #[arg(long, value_parser = parse_provider)]
    pub provider: Option<ProviderType>,

    /// Vision model identifier.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Rotate captured pages clockwise by 0, 90, 180 or 270 degrees.
    #[arg(long, value_parser = parse_rotation)]
    pub rotate: Option<Rotation>,

    /// Keep earlier pages' text in context for later pages.
    #[arg(long)]
    pub retain: bool,

    /// Do not narrate; print text only.
    #[arg(long)]
    pub mute: bool,
}

impl ReaderOverrides {
    pub fn apply(&self, config: &mut ReaderConfig) {
        if let Some(language) = &self.language {
            config.target_language = Some(language.clone());
        }
        if let Some(provider) = self.provider {
            // A model chosen for another provider would not exist there.
            if provider != config.vision.provider {
                config.vision.model = None;
                config.vision.base_url = None;
            }
            config.vision.provider = provider;
        }
        if let Some(model) = &self.model {
            config.vision.model = Some(model.clone());
        }
        if let Some(rotation) = self.rotate {
            config.capture.rotation = rotation;
        }
        if self.retain {
            config.context.retain_replies = true;
        }
    }
}

fn parse_provider(s: &str) -> Result<ProviderType, String> {
    s.parse()
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    s.parse()
}
