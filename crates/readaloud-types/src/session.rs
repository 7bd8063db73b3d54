//! Session loop states, user triggers and per-cycle reports.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::speech::NarrationOutcome;

/// States of the page-reading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for the user; the frame source is open.
    Idle,
    Capturing,
    Extracting,
    Speaking,
    /// Terminal. The frame source has been released.
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Capturing => write!(f, "capturing"),
            SessionState::Extracting => write!(f, "extracting"),
            SessionState::Speaking => write!(f, "speaking"),
            SessionState::Terminated => write!(f, "terminated"),
        }
    }
}

/// User signals recognized by the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Capture and read the next page.
    Capture,
    /// End the session.
    Quit,
}

/// How one page cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Text was extracted and handed to the narrator.
    Read {
        text: String,
        narration: NarrationOutcome,
    },
    /// The model found no story text on the page.
    NoText,
    /// No frame could be acquired; the extractor was not called.
    AcquisitionFailed { reason: String },
    /// The vision call failed; nothing was narrated.
    ExtractionFailed { reason: String },
}

/// Summary of one capture -> extract -> narrate cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// 1-based page cycle counter within the session.
    pub page: u32,
    pub outcome: CycleOutcome,
    pub elapsed_ms: u64,
}

impl CycleReport {
    pub fn is_failure(&self) -> bool {
        matches!(
            self.outcome,
            CycleOutcome::AcquisitionFailed { .. } | CycleOutcome::ExtractionFailed { .. }
        )
    }
}
