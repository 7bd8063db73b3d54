//! Welcome banner for reading sessions.

use console::style;

pub struct BannerInfo<'a> {
    pub source: &'a str,
    pub provider: &'a str,
    pub model: &'a str,
    pub language: Option<&'a str>,
    /// `None` when narration is on, otherwise why it is off.
    pub muted: Option<String>,
    pub session_id: &'a str,
}

pub fn print_welcome_banner(info: &BannerInfo<'_>) {
    println!();
    println!("  {}", style("readaloud").cyan().bold());
    println!("  {}", style(info.source).dim());
    println!();
    println!(
        "  {}     {}",
        style("Vision:").bold(),
        style(format!("{} / {}", info.provider, info.model)).dim()
    );
    println!(
        "  {}   {}",
        style("Language:").bold(),
        style(info.language.unwrap_or("as printed")).dim()
    );
    let voice = match &info.muted {
        None => "on".to_string(),
        Some(reason) => format!("off ({reason})"),
    };
    println!("  {}      {}", style("Voice:").bold(), style(voice).dim());
    println!(
        "  {}    {}",
        style("Session:").bold(),
        style(&info.session_id[..8.min(info.session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Press Enter to read the next page, q or Ctrl+D to stop").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
