//! Keyboard triggers for the reading session.
//!
//! Wraps `rustyline_async::Readline` and maps each submitted line to a
//! [`Trigger`]. Unrecognized input prints a hint and reads again.

use std::io::Write;

use console::style;
use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use readaloud_core::session::TriggerSource;
use readaloud_types::session::Trigger;

/// What a submitted line means.
#[derive(Debug, PartialEq, Eq)]
pub enum LineCommand {
    Trigger(Trigger),
    Help,
    Unknown(String),
}

/// Map one line of input to a command.
///
/// An empty line (just Enter) captures the next page.
pub fn parse_line(line: &str) -> LineCommand {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" | "c" | "n" | "next" | "/next" => LineCommand::Trigger(Trigger::Capture),
        "q" | "quit" | "exit" | "/q" | "/quit" | "/exit" => LineCommand::Trigger(Trigger::Quit),
        "?" | "h" | "help" | "/help" => LineCommand::Help,
        _ => LineCommand::Unknown(trimmed.to_string()),
    }
}

/// Interactive trigger source.
pub struct PageInput {
    rl: Readline,
    out: SharedWriter,
}

impl PageInput {
    /// Returns the input and a writer for printing without corrupting the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, out) = Readline::new(prompt)?;
        Ok((
            Self {
                rl,
                out: out.clone(),
            },
            out,
        ))
    }

    fn hint(&mut self, message: String) {
        let _ = writeln!(self.out, "  {}", style(message).dim());
    }
}

impl TriggerSource for PageInput {
    async fn next_trigger(&mut self) -> Trigger {
        loop {
            match self.rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => match parse_line(&line) {
                    LineCommand::Trigger(trigger) => return trigger,
                    LineCommand::Help => print_help(&mut self.out),
                    LineCommand::Unknown(text) => {
                        self.hint(format!("Unknown input '{text}'. Press Enter for the next page, q to quit."))
                    }
                },
                Ok(ReadlineEvent::Interrupted) => {
                    self.hint("Press q or Ctrl+D to stop reading.".to_string())
                }
                Ok(ReadlineEvent::Eof) | Err(_) => return Trigger::Quit,
            }
        }
    }
}

impl Drop for PageInput {
    fn drop(&mut self) {
        let _ = self.rl.flush();
    }
}

pub fn print_help(out: &mut impl Write) {
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", style("Controls:").bold());
    let _ = writeln!(out, "  {}   {}", style("Enter, c, next").cyan(), "Capture and read the next page");
    let _ = writeln!(out, "  {}   {}", style("q, quit, /exit").cyan(), "End the session (also Ctrl+D)");
    let _ = writeln!(out, "  {}        {}", style("?, help").cyan(), "Show this help");
    let _ = writeln!(out);
}
