//! `readaloud page <image>`: extract one page, print it, optionally speak it.

use std::path::PathBuf;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use readaloud_core::capture::FrameSource;
use readaloud_infra::capture::FileFrameSource;
use readaloud_types::speech::NarrationOutcome;

use super::ReaderOverrides;
use super::setup::{Settings, build_reader};

pub async fn run_page(
    data_dir: Option<PathBuf>,
    image: PathBuf,
    speak: bool,
    overrides: ReaderOverrides,
    json: bool,
) -> anyhow::Result<()> {
    let settings = Settings::load(data_dir, &overrides).await?;
    let config = settings.config;
    let mut reader = build_reader(&config, settings.credentials, overrides.mute || !speak)?;

    let mut source = FileFrameSource::new(&image, config.capture.rotation);
    source.open()?;
    let frame = source
        .read_frame()
        .with_context(|| format!("failed to load {}", image.display()))?;
    source.close();

    let spinner = (!json).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Reading page...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner
    });

    let extracted = reader
        .extractor
        .extract(frame.as_ref(), &mut reader.store)
        .await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let text = extracted
        .context("page extraction failed")?
        .unwrap_or_default();

    let narration = if text.trim().is_empty() {
        NarrationOutcome::Skipped
    } else {
        if !json {
            println!();
            for line in text.trim().lines() {
                println!("  {line}");
            }
            println!();
        }
        reader.narrator.speak(&text).await
    };

    if json {
        let output = json!({
            "image": image.display().to_string(),
            "text": text,
            "narration": narration,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match narration {
        NarrationOutcome::Failed(reason) => {
            eprintln!("  {} Narration failed: {reason}", style("!").yellow().bold());
        }
        _ if text.trim().is_empty() => {
            println!("  {}", style("No story text on this page.").dim());
        }
        _ => {}
    }
    Ok(())
}
