//! Prompt construction for the three interaction modes.

use crate::config::Config;
use crate::error::DebatifyError;
use crate::session::SessionKind;

/// One interaction request, carrying the mode-specific context.
#[derive(Debug, Clone)]
pub enum PromptRequest {
    /// One conversational coach turn.
    Coach { topic: String, utterance: String },
    /// Practice speech analysis. `duration_seconds` is session metadata
    /// carried through to persistence; it does not appear in the prompt.
    PracticeAnalysis {
        motion: String,
        transcript: String,
        duration_seconds: Option<u32>,
    },
    /// Full-debate adjudication.
    JudgeAnalysis { transcript: String },
}

impl PromptRequest {
    pub fn kind(&self) -> SessionKind {
        match self {
            PromptRequest::Coach { .. } => SessionKind::Coach,
            PromptRequest::PracticeAnalysis { .. } => SessionKind::Practice,
            PromptRequest::JudgeAnalysis { .. } => SessionKind::Judge,
        }
    }

    /// The primary subject text; a blank subject makes the request
    /// unsendable.
    fn subject(&self) -> &str {
        match self {
            PromptRequest::Coach { utterance, .. } => utterance,
            PromptRequest::PracticeAnalysis { transcript, .. } => transcript,
            PromptRequest::JudgeAnalysis { transcript } => transcript,
        }
    }
}

/// Render the instruction text for a request, embedding its context
/// verbatim into the configured template.
pub fn build_prompt(config: &Config, request: &PromptRequest) -> Result<String, DebatifyError> {
    if request.subject().trim().is_empty() {
        return Err(DebatifyError::EmptySubject);
    }

    let prompt = match request {
        PromptRequest::Coach { topic, utterance } => config
            .prompts
            .coach
            .replace("{topic}", topic)
            .replace("{utterance}", utterance.trim()),
        PromptRequest::PracticeAnalysis {
            motion, transcript, ..
        } => config
            .prompts
            .practice
            .replace("{motion}", motion)
            .replace("{transcript}", transcript),
        PromptRequest::JudgeAnalysis { transcript } => {
            config.prompts.judge.replace("{transcript}", transcript)
        }
    };

    Ok(prompt)
}
