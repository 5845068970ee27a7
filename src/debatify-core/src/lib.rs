//! Debatify Core Library
//!
//! Provides the debate-practice engine: prompt construction, model
//! response extraction, session recording, and aggregate statistics.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod feedback;
pub mod prompt;
pub mod recorder;
pub mod session;
pub mod store;

pub use client::{GenerativeBackend, ModelClient};
pub use config::Config;
pub use error::DebatifyError;
pub use extract::{Extraction, COACH_APOLOGY};
pub use feedback::{JudgeFeedback, PracticeFeedback, SpeakerRole};
pub use prompt::PromptRequest;
pub use recorder::{RecorderState, SessionOutcome, SessionRecorder, COACH_FAILURE_MESSAGE};
pub use session::{AggregateStats, SessionKind, SessionRecord, HISTORY_LIMIT};
pub use store::SessionStore;
