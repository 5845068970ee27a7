//! Session orchestration.
//!
//! One [`SessionRecorder`] drives one interaction end to end: build the
//! prompt, make the single model call, extract the result, and persist
//! scored sessions. The caller is expected to hold off on a second run
//! until the first completes; the recorder itself is consumed by `run`.

use chrono::Local;

use crate::client::GenerativeBackend;
use crate::config::Config;
use crate::error::DebatifyError;
use crate::extract::{extract_coach, extract_feedback};
use crate::feedback::{JudgeFeedback, PracticeFeedback};
use crate::prompt::{build_prompt, PromptRequest};
use crate::session::{AggregateStats, SessionKind, SessionRecord};
use crate::store::SessionStore;

/// Chat reply shown when the model call fails in coach mode.
pub const COACH_FAILURE_MESSAGE: &str =
    "Sorry, I'm having trouble connecting. Please check your connection and try again.";

/// Phases of one recorder invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Building,
    AwaitingResponse,
    Extracting,
    Persisting,
    Done,
    Failed,
}

impl RecorderState {
    /// Legal forward edges of the state machine.
    fn can_advance(self, next: RecorderState) -> bool {
        use RecorderState::*;
        matches!(
            (self, next),
            (Idle, Building)
                | (Building, AwaitingResponse)
                | (AwaitingResponse, Extracting)
                | (AwaitingResponse, Failed)
                | (Extracting, Persisting)
                | (Extracting, Done)
                | (Persisting, Done)
        )
    }
}

/// What one invocation produced.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// A coach chat turn. Never persisted.
    CoachReply { text: String, failed: bool },
    /// A practice analysis.
    PracticeReport {
        feedback: PracticeFeedback,
        fallback_used: bool,
        failed: bool,
        /// Updated aggregate when the session was recorded.
        recorded: Option<AggregateStats>,
    },
    /// A transcript adjudication.
    JudgeReport {
        feedback: JudgeFeedback,
        fallback_used: bool,
        failed: bool,
        recorded: Option<AggregateStats>,
    },
}

impl SessionOutcome {
    /// Whether the model call itself failed (transport or HTTP status).
    pub fn failed(&self) -> bool {
        match self {
            SessionOutcome::CoachReply { failed, .. }
            | SessionOutcome::PracticeReport { failed, .. }
            | SessionOutcome::JudgeReport { failed, .. } => *failed,
        }
    }
}

/// Runs one interaction against the model and the store.
pub struct SessionRecorder<'a, B: GenerativeBackend> {
    backend: &'a B,
    store: &'a SessionStore,
    config: &'a Config,
    state: RecorderState,
}

impl<'a, B: GenerativeBackend> SessionRecorder<'a, B> {
    pub fn new(backend: &'a B, store: &'a SessionStore, config: &'a Config) -> Self {
        Self {
            backend,
            store,
            config,
            state: RecorderState::Idle,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    fn advance(&mut self, next: RecorderState) -> Result<(), DebatifyError> {
        if !self.state.can_advance(next) {
            return Err(DebatifyError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Run the interaction to completion.
    ///
    /// A failing model call is absorbed into a canned [`SessionOutcome`],
    /// not an `Err`; errors are reserved for unsendable requests and
    /// store write failures.
    pub async fn run(mut self, request: PromptRequest) -> Result<SessionOutcome, DebatifyError> {
        self.advance(RecorderState::Building)?;
        let prompt = build_prompt(self.config, &request)?;

        self.advance(RecorderState::AwaitingResponse)?;
        let raw = match self.backend.generate(&prompt).await {
            Ok(raw) => raw,
            Err(_) => {
                self.advance(RecorderState::Failed)?;
                return Ok(failure_outcome(&request));
            }
        };

        self.advance(RecorderState::Extracting)?;
        match request {
            PromptRequest::Coach { .. } => {
                let text = extract_coach(&raw);
                self.advance(RecorderState::Done)?;
                Ok(SessionOutcome::CoachReply {
                    text,
                    failed: false,
                })
            }
            PromptRequest::PracticeAnalysis {
                motion,
                duration_seconds,
                ..
            } => {
                let extraction = extract_feedback(&raw, PracticeFeedback::fallback());
                let fallback_used = extraction.is_fallback();
                let feedback = extraction.into_inner();

                self.advance(RecorderState::Persisting)?;
                let stats = self.store.record(SessionRecord {
                    kind: SessionKind::Practice,
                    score: feedback.overall,
                    date: today(),
                    duration_seconds,
                    subject_length: None,
                    motion: Some(motion),
                })?;

                self.advance(RecorderState::Done)?;
                Ok(SessionOutcome::PracticeReport {
                    feedback,
                    fallback_used,
                    failed: false,
                    recorded: Some(stats),
                })
            }
            PromptRequest::JudgeAnalysis { transcript } => {
                let extraction = extract_feedback(&raw, JudgeFeedback::fallback());
                let fallback_used = extraction.is_fallback();
                let feedback = extraction.into_inner();

                self.advance(RecorderState::Persisting)?;
                let stats = self.store.record(SessionRecord {
                    kind: SessionKind::Judge,
                    score: feedback.overall_score,
                    date: today(),
                    duration_seconds: None,
                    subject_length: Some(transcript.len()),
                    motion: None,
                })?;

                self.advance(RecorderState::Done)?;
                Ok(SessionOutcome::JudgeReport {
                    feedback,
                    fallback_used,
                    failed: false,
                    recorded: Some(stats),
                })
            }
        }
    }
}

/// Canned outcome for a failed model call. Nothing is persisted.
fn failure_outcome(request: &PromptRequest) -> SessionOutcome {
    match request {
        PromptRequest::Coach { .. } => SessionOutcome::CoachReply {
            text: COACH_FAILURE_MESSAGE.to_string(),
            failed: true,
        },
        PromptRequest::PracticeAnalysis { .. } => SessionOutcome::PracticeReport {
            feedback: PracticeFeedback::failed(),
            fallback_used: false,
            failed: true,
            recorded: None,
        },
        PromptRequest::JudgeAnalysis { .. } => SessionOutcome::JudgeReport {
            feedback: JudgeFeedback::failed(),
            fallback_used: false,
            failed: true,
            recorded: None,
        },
    }
}

fn today() -> String {
    Local::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::STORE_FILE;
    use async_trait::async_trait;
    use tempfile::TempDir;

    enum Canned {
        Text(&'static str),
        HttpError,
    }

    struct StubBackend(Canned);

    #[async_trait]
    impl GenerativeBackend for StubBackend {
        async fn generate(&self, _prompt: &str) -> Result<String, DebatifyError> {
            match &self.0 {
                Canned::Text(text) => Ok((*text).to_string()),
                Canned::HttpError => Err(DebatifyError::ApiStatus { status: 503 }),
            }
        }
    }

    fn harness(dir: &TempDir) -> (SessionStore, Config) {
        (
            SessionStore::open(dir.path().join(STORE_FILE)),
            Config::default(),
        )
    }

    fn practice_request() -> PromptRequest {
        PromptRequest::PracticeAnalysis {
            motion: "This house would test its software".to_string(),
            transcript: "We must test, for three reasons.".to_string(),
            duration_seconds: Some(95),
        }
    }

    const VALID_PRACTICE_JSON: &str = r#"Feedback follows.
        {"structure":80,"clarity":85,"logic":75,"tone":90,"overall":82,
         "strengths":["clash"],"improvements":["signposting"],
         "detailedFeedback":"strong speech"} Good luck!"#;

    #[test]
    fn test_transition_matrix() {
        use RecorderState::*;
        assert!(Idle.can_advance(Building));
        assert!(Building.can_advance(AwaitingResponse));
        assert!(AwaitingResponse.can_advance(Extracting));
        assert!(AwaitingResponse.can_advance(Failed));
        assert!(Extracting.can_advance(Done));
        assert!(Extracting.can_advance(Persisting));
        assert!(Persisting.can_advance(Done));

        assert!(!Idle.can_advance(Extracting));
        assert!(!Done.can_advance(Building));
        assert!(!Failed.can_advance(AwaitingResponse));
        assert!(!Building.can_advance(Failed));
        assert!(!Persisting.can_advance(Failed));
    }

    #[tokio::test]
    async fn test_practice_success_persists_session() {
        let dir = TempDir::new().unwrap();
        let (store, config) = harness(&dir);
        let backend = StubBackend(Canned::Text(VALID_PRACTICE_JSON));

        let recorder = SessionRecorder::new(&backend, &store, &config);
        let outcome = recorder.run(practice_request()).await.unwrap();

        match outcome {
            SessionOutcome::PracticeReport {
                feedback,
                fallback_used,
                failed,
                recorded,
            } => {
                assert!(!failed);
                assert!(!fallback_used);
                assert_eq!(feedback.overall, 82);
                let stats = recorded.unwrap();
                assert_eq!(stats.total_sessions, 1);
                assert_eq!(stats.total_minutes, 1);
                assert_eq!(stats.history[0].score, 82);
                assert_eq!(
                    stats.history[0].motion.as_deref(),
                    Some("This house would test its software")
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        assert_eq!(store.load().total_sessions, 1);
    }

    #[tokio::test]
    async fn test_practice_unparseable_reply_persists_tagged_fallback() {
        let dir = TempDir::new().unwrap();
        let (store, config) = harness(&dir);
        let backend = StubBackend(Canned::Text("I'd rather chat about the weather."));

        let recorder = SessionRecorder::new(&backend, &store, &config);
        let outcome = recorder.run(practice_request()).await.unwrap();

        match outcome {
            SessionOutcome::PracticeReport {
                feedback,
                fallback_used,
                recorded,
                ..
            } => {
                assert!(fallback_used);
                assert_eq!(feedback, PracticeFeedback::fallback());
                // Fallback results still enter the aggregate.
                assert_eq!(recorded.unwrap().history[0].score, 74);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_practice_transport_failure_not_persisted() {
        let dir = TempDir::new().unwrap();
        let (store, config) = harness(&dir);
        let backend = StubBackend(Canned::HttpError);

        let recorder = SessionRecorder::new(&backend, &store, &config);
        let outcome = recorder.run(practice_request()).await.unwrap();

        assert!(outcome.failed());
        match outcome {
            SessionOutcome::PracticeReport {
                feedback, recorded, ..
            } => {
                assert_eq!(feedback, PracticeFeedback::failed());
                assert!(recorded.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.load().total_sessions, 0);
    }

    #[tokio::test]
    async fn test_coach_turn_never_persisted() {
        let dir = TempDir::new().unwrap();
        let (store, config) = harness(&dir);
        let backend = StubBackend(Canned::Text("  Have you considered the base rate?  "));

        let recorder = SessionRecorder::new(&backend, &store, &config);
        let outcome = recorder
            .run(PromptRequest::Coach {
                topic: "any".to_string(),
                utterance: "My opening point.".to_string(),
            })
            .await
            .unwrap();

        match outcome {
            SessionOutcome::CoachReply { text, failed } => {
                assert!(!failed);
                assert_eq!(text, "Have you considered the base rate?");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.load().total_sessions, 0);
    }

    #[tokio::test]
    async fn test_coach_failure_gets_canned_apology() {
        let dir = TempDir::new().unwrap();
        let (store, config) = harness(&dir);
        let backend = StubBackend(Canned::HttpError);

        let recorder = SessionRecorder::new(&backend, &store, &config);
        let outcome = recorder
            .run(PromptRequest::Coach {
                topic: "any".to_string(),
                utterance: "My opening point.".to_string(),
            })
            .await
            .unwrap();

        match outcome {
            SessionOutcome::CoachReply { text, failed } => {
                assert!(failed);
                assert_eq!(text, COACH_FAILURE_MESSAGE);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.load().total_sessions, 0);
    }

    #[tokio::test]
    async fn test_blank_subject_is_an_error_before_any_call() {
        let dir = TempDir::new().unwrap();
        let (store, config) = harness(&dir);
        let backend = StubBackend(Canned::Text("unused"));

        let recorder = SessionRecorder::new(&backend, &store, &config);
        let result = recorder
            .run(PromptRequest::JudgeAnalysis {
                transcript: "   ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DebatifyError::EmptySubject)));
        assert_eq!(store.load().total_sessions, 0);
    }

    #[tokio::test]
    async fn test_judge_records_transcript_length() {
        let dir = TempDir::new().unwrap();
        let (store, config) = harness(&dir);
        let transcript = "PM: we affirm. LO: we negate.".to_string();
        let reply = r#"{"overallScore":66,"argumentStrength":60,
            "logicalConsistency":60,"evidenceQuality":60,"presentation":60,
            "fallacies":[],"strengths":[],"weaknesses":[],"speakerRoles":[],
            "detailedAnalysis":"thin","winnerPrediction":"Proposition"}"#;
        let backend = StubBackend(Canned::Text(reply));

        let recorder = SessionRecorder::new(&backend, &store, &config);
        let outcome = recorder
            .run(PromptRequest::JudgeAnalysis {
                transcript: transcript.clone(),
            })
            .await
            .unwrap();

        match outcome {
            SessionOutcome::JudgeReport { recorded, .. } => {
                let stats = recorded.unwrap();
                assert_eq!(stats.history[0].subject_length, Some(transcript.len()));
                assert_eq!(stats.history[0].duration_seconds, None);
                assert_eq!(stats.history[0].score, 66);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
