//! Narration: text -> synthesized speech -> played audio.
//!
//! - `SpeechSynthesizer` / `BoxSpeechSynthesizer`: the text-to-speech port
//! - `AudioSink`: blocking playback port
//! - `Narrator`: combines both and folds every failure into a
//!   [`NarrationOutcome`] so narration can never end a session.

pub mod narrator;
pub mod synthesizer;

pub use narrator::{AudioSink, Narrator, VoiceSettings};
pub use synthesizer::{BoxSpeechSynthesizer, SpeechSynthesizer};
