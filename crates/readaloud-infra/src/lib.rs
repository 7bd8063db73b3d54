//! Infrastructure layer for readaloud.
//!
//! Implements the ports defined in `readaloud-core`: vision providers
//! (OpenAI-compatible, Ollama), ElevenLabs speech synthesis, rodio playback
//! and on-disk page sources. Also loads configuration and credentials.

pub mod audio;
pub mod capture;
pub mod config;
pub mod llm;
pub mod secret;
pub mod speech;
