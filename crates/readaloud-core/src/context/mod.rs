//! Conversation context used as grounding for every page analysis.
//!
//! The context always starts with the system instruction. Per-page user
//! turns are appended only for the duration of one vision call and are
//! retracted on every exit path (see [`store::TransientTurn`]).

pub mod store;

pub use store::{ContextEntry, ContextStore, ConversationContext, RetentionPolicy, TransientTurn};
