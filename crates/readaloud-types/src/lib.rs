//! Shared domain types for readaloud.
//!
//! This crate contains the data shapes passed between the page capture,
//! extraction, narration and session layers, plus their error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod capture;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod speech;
