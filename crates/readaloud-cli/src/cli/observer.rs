//! Session observers: styled terminal progress and JSON lines.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use readaloud_core::session::SessionObserver;
use readaloud_types::session::{CycleOutcome, CycleReport, SessionState};
use readaloud_types::speech::NarrationOutcome;

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Prints page text and cycle notes; shows a spinner while waiting.
pub struct TerminalObserver<W: Write> {
    out: W,
    spinner: Option<ProgressBar>,
    page: u32,
    muted: bool,
}

impl<W: Write> TerminalObserver<W> {
    pub fn new(out: W, muted: bool) -> Self {
        Self {
            out,
            spinner: None,
            page: 0,
            muted,
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl<W: Write> SessionObserver for TerminalObserver<W> {
    fn on_state(&mut self, state: SessionState) {
        match state {
            SessionState::Capturing => self.page += 1,
            SessionState::Extracting => {
                self.clear_spinner();
                self.spinner = Some(spinner(format!("Reading page {}...", self.page)));
            }
            SessionState::Speaking | SessionState::Idle | SessionState::Terminated => {
                self.clear_spinner()
            }
        }
    }

    fn on_text(&mut self, page: u32, text: &str) {
        self.clear_spinner();
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "  {}", style(format!("Page {page}")).cyan().bold());
        for line in text.trim().lines() {
            let _ = writeln!(self.out, "  {line}");
        }
        let _ = writeln!(self.out);
        if !self.muted {
            self.spinner = Some(spinner("Speaking...".to_string()));
        }
    }

    fn on_cycle(&mut self, report: &CycleReport) {
        self.clear_spinner();
        let note = match &report.outcome {
            CycleOutcome::Read {
                narration: NarrationOutcome::Failed(reason),
                ..
            } => format!("{} Narration failed: {reason}", style("!").yellow().bold()),
            CycleOutcome::Read { .. } => return,
            CycleOutcome::NoText => format!("{} No story text on this page.", style("-").dim()),
            CycleOutcome::AcquisitionFailed { reason } => {
                format!("{} Could not capture a page: {reason}", style("!").red().bold())
            }
            CycleOutcome::ExtractionFailed { reason } => {
                format!("{} Could not read the page: {reason}", style("!").red().bold())
            }
        };
        let _ = writeln!(self.out, "  {note}");
    }
}

/// One JSON object per finished cycle on `out`.
pub struct JsonObserver<W: Write> {
    out: W,
}

impl<W: Write> JsonObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SessionObserver for JsonObserver<W> {
    fn on_cycle(&mut self, report: &CycleReport) {
        match serde_json::to_string(report) {
            Ok(line) => {
                let _ = writeln!(self.out, "{line}");
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize cycle report"),
        }
    }
}
