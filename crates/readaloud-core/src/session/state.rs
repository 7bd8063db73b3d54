//! Transition table for the page-reading session.

use readaloud_types::session::{SessionState, Trigger};

/// Everything that can move the session from one state to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    User(Trigger),
    FrameAcquired,
    AcquisitionFailed,
    TextExtracted,
    NothingToSay,
    ExtractionFailed,
    NarrationFinished,
}

/// Next state for `event` in `state`, or `None` if the event is not valid there.
///
/// ```text
/// Idle --capture--> Capturing --frame--> Extracting --text--> Speaking --> Idle
///                   Capturing --no frame--> Idle
///                                         Extracting --empty/error--> Idle
/// Idle --quit--> Terminated
/// ```
pub fn transition(state: SessionState, event: SessionEvent) -> Option<SessionState> {
    use SessionEvent as E;
    use SessionState as S;

    match (state, event) {
        (S::Idle, E::User(Trigger::Capture)) => Some(S::Capturing),
        (S::Idle, E::User(Trigger::Quit)) => Some(S::Terminated),
        (S::Capturing, E::FrameAcquired) => Some(S::Extracting),
        (S::Capturing, E::AcquisitionFailed) => Some(S::Idle),
        (S::Extracting, E::TextExtracted) => Some(S::Speaking),
        (S::Extracting, E::NothingToSay | E::ExtractionFailed) => Some(S::Idle),
        (S::Speaking, E::NarrationFinished) => Some(S::Idle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_page_cycle() {
        let mut state = SessionState::Idle;
        for (event, expected) in [
            (SessionEvent::User(Trigger::Capture), SessionState::Capturing),
            (SessionEvent::FrameAcquired, SessionState::Extracting),
            (SessionEvent::TextExtracted, SessionState::Speaking),
            (SessionEvent::NarrationFinished, SessionState::Idle),
        ] {
            state = transition(state, event).unwrap();
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn test_failures_return_to_idle() {
        assert_eq!(
            transition(SessionState::Capturing, SessionEvent::AcquisitionFailed),
            Some(SessionState::Idle)
        );
        assert_eq!(
            transition(SessionState::Extracting, SessionEvent::ExtractionFailed),
            Some(SessionState::Idle)
        );
        assert_eq!(
            transition(SessionState::Extracting, SessionEvent::NothingToSay),
            Some(SessionState::Idle)
        );
    }

    #[test]
    fn test_quit_only_from_idle() {
        assert_eq!(
            transition(SessionState::Idle, SessionEvent::User(Trigger::Quit)),
            Some(SessionState::Terminated)
        );
        assert_eq!(
            transition(SessionState::Extracting, SessionEvent::User(Trigger::Quit)),
            None
        );
    }

    #[test]
    fn test_terminated_is_terminal() {
        for event in [
            SessionEvent::User(Trigger::Capture),
            SessionEvent::User(Trigger::Quit),
            SessionEvent::FrameAcquired,
            SessionEvent::NarrationFinished,
        ] {
            assert_eq!(transition(SessionState::Terminated, event), None);
        }
    }
}
