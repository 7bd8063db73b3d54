//! `readaloud check`: effective configuration and credential status.

use std::path::PathBuf;

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use serde_json::json;

use super::ReaderOverrides;
use super::setup::{Settings, retention_policy};

pub async fn run_check(data_dir: Option<PathBuf>, overrides: ReaderOverrides, json: bool) -> anyhow::Result<()> {
    let settings = Settings::load(data_dir, &overrides).await?;
    let config = &settings.config;
    let config_path = settings.config_path();
    let config_found = config_path.is_file();
    let credentials = settings.credentials.status();

    if json {
        let creds: serde_json::Map<String, serde_json::Value> = credentials
            .iter()
            .map(|(name, set)| (name.to_string(), json!(set)))
            .collect();
        let output = json!({
            "data_dir": settings.data_dir.display().to_string(),
            "config_file": config_path.display().to_string(),
            "config_found": config_found,
            "config": config,
            "credentials": creds,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    let config_cell = if config_found {
        Cell::new(config_path.display()).fg(Color::Green)
    } else {
        Cell::new(format!("{} (not found, defaults)", config_path.display())).fg(Color::Yellow)
    };
    table.add_row(vec![Cell::new("Config file"), config_cell]);
    table.add_row(vec![
        Cell::new("Vision provider"),
        Cell::new(config.vision.provider),
    ]);
    table.add_row(vec![
        Cell::new("Vision model"),
        Cell::new(config.vision.model_or_default()),
    ]);
    table.add_row(vec![
        Cell::new("Base URL"),
        Cell::new(config.vision.base_url.as_deref().unwrap_or("(provider default)")),
    ]);
    table.add_row(vec![
        Cell::new("Target language"),
        Cell::new(config.target_language.as_deref().unwrap_or("(as printed)")),
    ]);
    table.add_row(vec![
        Cell::new("Rotation"),
        Cell::new(format!("{} deg", config.capture.rotation.degrees())),
    ]);
    table.add_row(vec![
        Cell::new("Context"),
        Cell::new(format!("{:?}", retention_policy(config))),
    ]);
    table.add_row(vec![
        Cell::new("Speech model"),
        Cell::new(&config.speech.model_id),
    ]);
    table.add_row(vec![
        Cell::new("Voice"),
        Cell::new(config.speech.voice_id.as_deref().unwrap_or("(unset)")),
    ]);

    for (name, set) in credentials {
        let cell = if set {
            Cell::new("set").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Red)
        };
        table.add_row(vec![Cell::new(name), cell]);
    }

    println!("{table}");
    Ok(())
}
