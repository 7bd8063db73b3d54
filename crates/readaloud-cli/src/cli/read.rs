//! `readaloud read`: the interactive page-reading session.

use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use serde_json::json;

use readaloud_core::capture::FrameSource;
use readaloud_core::session::{ScriptedTriggers, SessionLoop, SessionSummary};
use readaloud_infra::capture::DirectoryFrameSource;
use readaloud_types::capture::Rotation;

use super::ReadArgs;
use super::banner::{BannerInfo, print_welcome_banner};
use super::input::PageInput;
use super::observer::{JsonObserver, TerminalObserver};
use super::setup::{Settings, build_reader};

pub async fn run_read(data_dir: Option<PathBuf>, args: ReadArgs, json: bool) -> anyhow::Result<()> {
    let settings = Settings::load(data_dir, &args.reader).await?;
    let config = settings.config;
    let reader = build_reader(&config, settings.credentials, args.reader.mute)?;
    let rotation = config.capture.rotation;

    let unattended = args.is_unattended(json);
    let page_limit = if args.all {
        Some(count_pages(&args.pages_dir, rotation)?)
    } else {
        args.pages
    };

    let source = DirectoryFrameSource::new(&args.pages_dir, rotation);
    let source_label = source.describe();
    let muted = reader.narrator.is_muted();
    let mute_reason = reader.mute_reason;

    let mut session = SessionLoop::start(source, reader.extractor, reader.narrator, reader.store)
        .with_context(|| format!("failed to open {}", args.pages_dir.display()))?;

    let summary = if json {
        // Without --pages/--all, JSON mode reads every page.
        let pages = match page_limit {
            Some(n) => n,
            None => count_pages(&args.pages_dir, rotation)?,
        };
        let mut triggers = ScriptedTriggers::captures(pages);
        let mut observer = JsonObserver::new(std::io::stdout());
        let summary = session.run(&mut triggers, &mut observer).await;
        println!("{}", summary_json(&summary));
        summary
    } else {
        let session_id = session.id().to_string();
        print_welcome_banner(&BannerInfo {
            source: &source_label,
            provider: &config.vision.provider.to_string(),
            model: &config.vision.model_or_default(),
            language: config.target_language.as_deref(),
            muted: mute_reason.map(|r| r.to_string()),
            session_id: &session_id,
        });

        if unattended {
            let mut triggers = ScriptedTriggers::captures(page_limit.unwrap_or(0));
            let mut observer = TerminalObserver::new(std::io::stdout(), muted);
            session.run(&mut triggers, &mut observer).await
        } else {
            let prompt = format!("  {} ", style("Next page >").green().bold());
            let (mut input, writer) = PageInput::new(prompt)
                .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
            let mut observer = TerminalObserver::new(writer, muted);
            session.run(&mut input, &mut observer).await
        }
    };

    if !json {
        print_summary(&summary);
    }
    Ok(())
}

/// Count page images without keeping the directory open.
fn count_pages(dir: &Path, rotation: Rotation) -> anyhow::Result<usize> {
    let mut probe = DirectoryFrameSource::new(dir, rotation);
    probe
        .open()
        .with_context(|| format!("failed to open {}", dir.display()))?;
    let pages = probe.remaining().unwrap_or(0);
    probe.close();
    Ok(pages)
}

fn summary_json(summary: &SessionSummary) -> serde_json::Value {
    json!({
        "session_id": summary.session_id.to_string(),
        "cycles": summary.cycles,
        "pages_read": summary.pages_read,
        "failures": summary.failures,
    })
}

fn print_summary(summary: &SessionSummary) {
    println!();
    println!(
        "  {} {} read, {} failed.",
        style("Session ended.").dim(),
        summary.pages_read,
        summary.failures
    );
}
