//! Interactive page-reading session.
//!
//! The session is an explicit state machine ([`state`]) driven by user
//! triggers from any front end ([`runner::TriggerSource`]). Front ends
//! watch progress through [`runner::SessionObserver`]; the core itself
//! never prints.

pub mod runner;
pub mod state;

pub use runner::{ScriptedTriggers, SessionLoop, SessionObserver, SessionSummary, TriggerSource};
pub use state::{SessionEvent, transition};
