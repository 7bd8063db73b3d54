//! Page reading pipeline for readaloud.
//!
//! This crate defines the "ports" (provider, synthesizer, sink and frame
//! source traits) that the infrastructure layer implements, plus the logic
//! that ties them together: the conversation context, page extraction,
//! narration and the interactive session loop. It depends only on
//! `readaloud-types` -- never on `readaloud-infra` or any network crate.

pub mod capture;
pub mod context;
pub mod extract;
pub mod llm;
pub mod narrate;
pub mod session;
