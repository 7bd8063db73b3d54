//! SessionLoop: capture -> extract -> narrate, one page per user trigger.
//!
//! Single task, sequential awaits: a page is fully extracted and narrated
//! before the next trigger is read. Failures end the cycle, never the session.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use readaloud_types::capture::CaptureError;
use readaloud_types::session::{CycleOutcome, CycleReport, SessionState, Trigger};

use crate::capture::FrameSource;
use crate::context::ContextStore;
use crate::extract::PageExtractor;
use crate::narrate::Narrator;

use super::state::{SessionEvent, transition};

/// Where user triggers come from (readline, GUI keypress, hardware button...).
pub trait TriggerSource {
    /// Wait for the next trigger. Implementations map end-of-input to `Quit`.
    fn next_trigger(&mut self) -> impl Future<Output = Trigger>;
}

/// A fixed sequence of triggers, followed by `Quit` once exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTriggers {
    queue: VecDeque<Trigger>,
}

impl ScriptedTriggers {
    pub fn new(triggers: impl IntoIterator<Item = Trigger>) -> Self {
        Self {
            queue: triggers.into_iter().collect(),
        }
    }

    /// `pages` capture triggers, then quit.
    pub fn captures(pages: usize) -> Self {
        Self::new(std::iter::repeat_n(Trigger::Capture, pages))
    }
}

impl TriggerSource for ScriptedTriggers {
    async fn next_trigger(&mut self) -> Trigger {
        self.queue.pop_front().unwrap_or(Trigger::Quit)
    }
}

/// Progress callbacks for front ends. All methods default to no-ops.
pub trait SessionObserver {
    fn on_state(&mut self, _state: SessionState) {}

    /// Called with the extracted text right before narration starts.
    fn on_text(&mut self, _page: u32, _text: &str) {}

    fn on_cycle(&mut self, _report: &CycleReport) {}
}

impl SessionObserver for () {}

/// Totals for a finished (or running) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub cycles: u32,
    pub pages_read: u32,
    pub failures: u32,
}

/// Drives the page-reading state machine.
///
/// Owns the frame source, the extractor, the narrator and the session's
/// conversation context. The frame source is opened by [`SessionLoop::start`]
/// and closed on quit (or on drop if the loop is abandoned).
pub struct SessionLoop<F: FrameSource> {
    id: Uuid,
    source: F,
    extractor: PageExtractor,
    narrator: Narrator,
    store: ContextStore,
    state: SessionState,
    cycles: u32,
    pages_read: u32,
    failures: u32,
}

impl<F: FrameSource> SessionLoop<F> {
    /// Open the frame source and enter `Idle`.
    pub fn start(
        mut source: F,
        extractor: PageExtractor,
        narrator: Narrator,
        store: ContextStore,
    ) -> Result<Self, CaptureError> {
        source.open()?;
        let id = Uuid::now_v7();

        info!(
            session_id = %id,
            source = %source.describe(),
            provider = extractor.provider_name(),
            model = %extractor.config().model,
            muted = narrator.is_muted(),
            "Reading session started"
        );

        Ok(Self {
            id,
            source,
            extractor,
            narrator,
            store,
            state: SessionState::Idle,
            cycles: 0,
            pages_read: 0,
            failures: 0,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            cycles: self.cycles,
            pages_read: self.pages_read,
            failures: self.failures,
        }
    }

    /// Read triggers until the user quits.
    pub async fn run<T, O>(&mut self, triggers: &mut T, observer: &mut O) -> SessionSummary
    where
        T: TriggerSource,
        O: SessionObserver,
    {
        while self.state != SessionState::Terminated {
            let trigger = triggers.next_trigger().await;
            self.handle(trigger, observer).await;
        }
        self.summary()
    }

    /// Apply one user trigger. Returns the cycle report for a capture.
    pub async fn handle<O: SessionObserver>(
        &mut self,
        trigger: Trigger,
        observer: &mut O,
    ) -> Option<CycleReport> {
        if self.state != SessionState::Idle {
            warn!(state = %self.state, ?trigger, "Trigger ignored outside idle state");
            return None;
        }

        match trigger {
            Trigger::Quit => {
                self.terminate(observer);
                None
            }
            Trigger::Capture => Some(self.run_cycle(observer).await),
        }
    }

    /// Quit from `Idle` and release the frame source.
    pub fn terminate<O: SessionObserver>(&mut self, observer: &mut O) {
        if self.advance(SessionEvent::User(Trigger::Quit), observer) {
            self.source.close();
            info!(
                session_id = %self.id,
                cycles = self.cycles,
                pages_read = self.pages_read,
                failures = self.failures,
                "Reading session ended"
            );
        }
    }

    async fn run_cycle<O: SessionObserver>(&mut self, observer: &mut O) -> CycleReport {
        self.cycles += 1;
        let page = self.cycles;
        let started = Instant::now();

        let span = info_span!("page_cycle", session_id = %self.id, page);
        let outcome = self.cycle_outcome(page, observer).instrument(span).await;

        match &outcome {
            CycleOutcome::Read { .. } => self.pages_read += 1,
            CycleOutcome::NoText => {}
            CycleOutcome::AcquisitionFailed { .. } | CycleOutcome::ExtractionFailed { .. } => {
                self.failures += 1
            }
        }

        let report = CycleReport {
            page,
            outcome,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        observer.on_cycle(&report);
        report
    }

    async fn cycle_outcome<O: SessionObserver>(&mut self, page: u32, observer: &mut O) -> CycleOutcome {
        self.advance(SessionEvent::User(Trigger::Capture), observer);

        let frame = match self.source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                warn!("Frame source returned no frame");
                self.advance(SessionEvent::AcquisitionFailed, observer);
                return CycleOutcome::AcquisitionFailed {
                    reason: "no frame available".to_string(),
                };
            }
            Err(e) => {
                warn!(error = %e, "Frame acquisition failed");
                self.advance(SessionEvent::AcquisitionFailed, observer);
                return CycleOutcome::AcquisitionFailed {
                    reason: e.to_string(),
                };
            }
        };
        self.advance(SessionEvent::FrameAcquired, observer);

        let text = match self.extractor.extract(Some(&frame), &mut self.store).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                info!("No story text on this page");
                self.advance(SessionEvent::NothingToSay, observer);
                return CycleOutcome::NoText;
            }
            Err(e) => {
                warn!(error = %e, "Page extraction failed");
                self.advance(SessionEvent::ExtractionFailed, observer);
                return CycleOutcome::ExtractionFailed {
                    reason: e.to_string(),
                };
            }
        };
        self.advance(SessionEvent::TextExtracted, observer);

        observer.on_text(page, &text);
        let narration = self.narrator.speak(&text).await;
        self.advance(SessionEvent::NarrationFinished, observer);

        CycleOutcome::Read { text, narration }
    }

    /// Move to the next state. Returns false (and stays put) on an invalid event.
    fn advance<O: SessionObserver>(&mut self, event: SessionEvent, observer: &mut O) -> bool {
        match transition(self.state, event) {
            Some(next) => {
                debug!(from = %self.state, to = %next, ?event, "Session transition");
                self.state = next;
                observer.on_state(next);
                true
            }
            None => {
                warn!(state = %self.state, ?event, "Ignoring invalid session transition");
                false
            }
        }
    }
}

impl<F: FrameSource> Drop for SessionLoop<F> {
    fn drop(&mut self) {
        if self.state != SessionState::Terminated {
            self.source.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use readaloud_types::speech::{NarrationError, NarrationOutcome, SpeechAudio, SpeechRequest};

    use crate::capture::Frame;
    use crate::extract::ExtractorConfig;
    use crate::extract::prompt::SYSTEM_INSTRUCTION;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::mock::MockProvider;
    use crate::narrate::{AudioSink, BoxSpeechSynthesizer, SpeechSynthesizer, VoiceSettings};

    /// Hands out scripted frames; `None` entries simulate a camera hiccup.
    struct ScriptedSource {
        frames: VecDeque<Option<Frame>>,
        opened: Arc<AtomicBool>,
        closed: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        fn new(frames: Vec<Option<Frame>>) -> Self {
            Self {
                frames: frames.into(),
                opened: Arc::new(AtomicBool::new(false)),
                closed: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn describe(&self) -> String {
            "scripted".to_string()
        }

        fn open(&mut self) -> Result<(), CaptureError> {
            self.opened.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
            if !self.opened.load(Ordering::SeqCst) {
                return Err(CaptureError::NotOpen);
            }
            Ok(self.frames.pop_front().flatten())
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    struct FlakySynth {
        calls: Arc<AtomicUsize>,
        fail_first: bool,
    }

    impl SpeechSynthesizer for FlakySynth {
        fn name(&self) -> &str {
            "flaky"
        }

        fn synthesize(
            &self,
            _request: &SpeechRequest,
        ) -> impl Future<Output = Result<SpeechAudio, NarrationError>> + Send {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail_first && call == 0;
            async move {
                if fail {
                    Err(NarrationError::Synthesis("voice not found".to_string()))
                } else {
                    Ok(SpeechAudio {
                        media_type: "audio/mpeg".to_string(),
                        bytes: vec![0xFF],
                    })
                }
            }
        }
    }

    struct NullSink;

    impl AudioSink for NullSink {
        fn play(&self, _audio: &SpeechAudio) -> Result<(), NarrationError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        states: Vec<SessionState>,
        texts: Vec<(u32, String)>,
        reports: Vec<CycleReport>,
    }

    impl SessionObserver for RecordingObserver {
        fn on_state(&mut self, state: SessionState) {
            self.states.push(state);
        }

        fn on_text(&mut self, page: u32, text: &str) {
            self.texts.push((page, text.to_string()));
        }

        fn on_cycle(&mut self, report: &CycleReport) {
            self.reports.push(report.clone());
        }
    }

    fn page() -> Option<Frame> {
        Frame::from_rgb8(8, 8, vec![255; 8 * 8 * 3])
    }

    fn extractor(provider: MockProvider) -> PageExtractor {
        PageExtractor::new(
            BoxLlmProvider::new(provider),
            ExtractorConfig {
                model: "gpt-4o-mini".to_string(),
                max_tokens: 512,
                temperature: None,
                target_language: None,
                jpeg_quality: 70,
            },
        )
    }

    fn narrator(fail_first: bool) -> (Narrator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let synth = FlakySynth {
            calls: Arc::clone(&calls),
            fail_first,
        };
        let narrator = Narrator::new(
            BoxSpeechSynthesizer::new(synth),
            Arc::new(NullSink),
            VoiceSettings {
                voice_id: "v".to_string(),
                model_id: "m".to_string(),
            },
        );
        (narrator, calls)
    }

    fn session(
        frames: Vec<Option<Frame>>,
        provider: MockProvider,
        narrator: Narrator,
    ) -> (SessionLoop<ScriptedSource>, Arc<AtomicBool>) {
        let source = ScriptedSource::new(frames);
        let closed = Arc::clone(&source.closed);
        let session = SessionLoop::start(
            source,
            extractor(provider),
            narrator,
            ContextStore::new(SYSTEM_INSTRUCTION),
        )
        .unwrap();
        (session, closed)
    }

    #[tokio::test]
    async fn test_capture_cycle_reads_and_returns_to_idle() {
        let (narrator, synth_calls) = narrator(false);
        let (mut session, _) = session(
            vec![page()],
            MockProvider::replying("In the light of the moon a little egg lay on a leaf."),
            narrator,
        );
        let mut observer = RecordingObserver::default();

        let report = session.handle(Trigger::Capture, &mut observer).await.unwrap();

        assert_eq!(report.page, 1);
        assert_eq!(
            report.outcome,
            CycleOutcome::Read {
                text: "In the light of the moon a little egg lay on a leaf.".to_string(),
                narration: NarrationOutcome::Spoken,
            }
        );
        assert_eq!(
            observer.states,
            vec![
                SessionState::Capturing,
                SessionState::Extracting,
                SessionState::Speaking,
                SessionState::Idle,
            ]
        );
        assert_eq!(observer.texts.len(), 1);
        assert_eq!(synth_calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.store().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_frame_skips_extraction() {
        let provider = MockProvider::replying("unused");
        let log = provider.request_log();
        let (narrator, _) = narrator(false);
        let (mut session, _) = session(vec![None], provider, narrator);
        let mut observer = RecordingObserver::default();

        let report = session.handle(Trigger::Capture, &mut observer).await.unwrap();

        assert!(matches!(report.outcome, CycleOutcome::AcquisitionFailed { .. }));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(
            observer.states,
            vec![SessionState::Capturing, SessionState::Idle]
        );
        assert_eq!(session.summary().failures, 1);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_isolated_to_its_cycle() {
        let provider = MockProvider::scripted(
            vec![Err("HTTP 502".to_string())],
            "The next day he ate through one apple.",
        );
        let (narrator, synth_calls) = narrator(false);
        let (mut session, _) = session(vec![page(), page()], provider, narrator);
        let mut observer = RecordingObserver::default();

        let first = session.handle(Trigger::Capture, &mut observer).await.unwrap();
        assert!(matches!(first.outcome, CycleOutcome::ExtractionFailed { ref reason } if reason.contains("HTTP 502")));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(synth_calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.store().len(), 1);

        let second = session.handle(Trigger::Capture, &mut observer).await.unwrap();
        assert!(matches!(second.outcome, CycleOutcome::Read { .. }));
        assert_eq!(second.page, 2);
        assert_eq!(session.store().len(), 1);

        let summary = session.summary();
        assert_eq!(summary.cycles, 2);
        assert_eq!(summary.pages_read, 1);
        assert_eq!(summary.failures, 1);
    }

    #[tokio::test]
    async fn test_narration_failure_does_not_stop_session() {
        let (narrator, synth_calls) = narrator(true);
        let (mut session, _) = session(
            vec![page(), page()],
            MockProvider::replying("On Monday he ate through one apple."),
            narrator,
        );
        let mut observer = RecordingObserver::default();

        let first = session.handle(Trigger::Capture, &mut observer).await.unwrap();
        match &first.outcome {
            CycleOutcome::Read { narration, .. } => {
                assert!(matches!(narration, NarrationOutcome::Failed(_)));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Idle);

        let second = session.handle(Trigger::Capture, &mut observer).await.unwrap();
        match &second.outcome {
            CycleOutcome::Read { narration, .. } => {
                assert_eq!(narration, &NarrationOutcome::Spoken);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(synth_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_text_skips_speaking() {
        let (narrator, synth_calls) = narrator(false);
        let (mut session, _) = session(vec![page()], MockProvider::replying(""), narrator);
        let mut observer = RecordingObserver::default();

        let report = session.handle(Trigger::Capture, &mut observer).await.unwrap();

        assert_eq!(report.outcome, CycleOutcome::NoText);
        assert!(!observer.states.contains(&SessionState::Speaking));
        assert_eq!(synth_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_until_quit_releases_source() {
        let (narrator, _) = narrator(false);
        let (mut session, closed) = session(
            vec![page(), page(), page()],
            MockProvider::replying("Page text."),
            narrator,
        );
        let mut triggers = ScriptedTriggers::captures(3);
        let mut observer = RecordingObserver::default();

        let summary = session.run(&mut triggers, &mut observer).await;

        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.pages_read, 3);
        assert_eq!(observer.reports.len(), 3);
        assert_eq!(session.state(), SessionState::Terminated);
        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(session.store().len(), 1);
    }

    #[tokio::test]
    async fn test_triggers_after_quit_are_ignored() {
        let (narrator, _) = narrator(false);
        let (mut session, _) = session(vec![page()], MockProvider::replying("x"), narrator);

        assert!(session.handle(Trigger::Quit, &mut ()).await.is_none());
        assert!(session.handle(Trigger::Capture, &mut ()).await.is_none());
        assert_eq!(session.summary().cycles, 0);
    }

    #[test]
    fn test_drop_closes_open_source() {
        let closed = Arc::new(AtomicBool::new(false));
        {
            let source = ScriptedSource {
                frames: VecDeque::new(),
                opened: Arc::new(AtomicBool::new(false)),
                closed: Arc::clone(&closed),
            };
            let (narrator, _) = narrator(false);
            let _session = SessionLoop::start(
                source,
                extractor(MockProvider::replying("x")),
                narrator,
                ContextStore::new(SYSTEM_INSTRUCTION),
            )
            .unwrap();
        }
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_scripted_triggers_end_with_quit() {
        let mut triggers = ScriptedTriggers::new([Trigger::Capture]);
        assert_eq!(triggers.next_trigger().await, Trigger::Capture);
        assert_eq!(triggers.next_trigger().await, Trigger::Quit);
        assert_eq!(triggers.next_trigger().await, Trigger::Quit);
    }
}
