//! Feedback payloads returned by the model.
//!
//! Field names match the JSON shape the prompts ask the model to emit,
//! so these decode straight off the wire.

use serde::{Deserialize, Serialize};

/// Analysis of one practice speech.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PracticeFeedback {
    pub structure: u32,
    pub clarity: u32,
    pub logic: u32,
    pub tone: u32,
    pub overall: u32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
}

impl PracticeFeedback {
    /// Canned feedback used when the model's answer cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            structure: 70,
            clarity: 75,
            logic: 72,
            tone: 78,
            overall: 74,
            strengths: vec![
                "Good effort".to_string(),
                "Clear delivery".to_string(),
                "Relevant points".to_string(),
            ],
            improvements: vec![
                "Work on structure".to_string(),
                "Add more evidence".to_string(),
                "Improve conclusion".to_string(),
            ],
            detailed_feedback: "Your speech shows good potential. Focus on structuring \
                your arguments more clearly and supporting them with stronger evidence."
                .to_string(),
        }
    }

    /// Zero-score payload shown when the model call itself fails.
    pub fn failed() -> Self {
        Self {
            structure: 0,
            clarity: 0,
            logic: 0,
            tone: 0,
            overall: 0,
            strengths: Vec::new(),
            improvements: vec!["Please try again - analysis failed".to_string()],
            detailed_feedback: "Sorry, I couldn't analyze your speech. Please check \
                your connection and try again."
                .to_string(),
        }
    }
}

/// Per-speaker assessment within a judged debate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerRole {
    pub speaker: String,
    pub role: String,
    pub performance: u32,
    pub feedback: String,
}

/// Adjudication of a full debate transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JudgeFeedback {
    pub overall_score: u32,
    pub argument_strength: u32,
    pub logical_consistency: u32,
    pub evidence_quality: u32,
    pub presentation: u32,
    pub fallacies: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub speaker_roles: Vec<SpeakerRole>,
    pub detailed_analysis: String,
    pub winner_prediction: String,
}

impl JudgeFeedback {
    /// Canned judgment used when the model's answer cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            overall_score: 75,
            argument_strength: 78,
            logical_consistency: 72,
            evidence_quality: 70,
            presentation: 80,
            fallacies: vec!["Could not detect specific fallacies".to_string()],
            strengths: vec![
                "Good structure".to_string(),
                "Clear delivery".to_string(),
                "Relevant arguments".to_string(),
            ],
            weaknesses: vec![
                "Could use more evidence".to_string(),
                "Some weak rebuttals".to_string(),
                "Timing issues".to_string(),
            ],
            speaker_roles: vec![SpeakerRole {
                speaker: "Analysis unavailable".to_string(),
                role: "Unable to determine".to_string(),
                performance: 75,
                feedback: "Detailed speaker analysis could not be completed. Please \
                    try again with a clearer transcript."
                    .to_string(),
            }],
            detailed_analysis: "Your debate shows good potential overall. The arguments \
                presented were generally well-structured, though there's room for \
                improvement in evidence quality and logical consistency."
                .to_string(),
            winner_prediction: "Unable to determine winner from current analysis. Please \
                ensure the transcript includes clear speaker identification and complete \
                arguments."
                .to_string(),
        }
    }

    /// Zero-score payload shown when the model call itself fails.
    pub fn failed() -> Self {
        Self {
            overall_score: 0,
            argument_strength: 0,
            logical_consistency: 0,
            evidence_quality: 0,
            presentation: 0,
            fallacies: Vec::new(),
            strengths: Vec::new(),
            weaknesses: vec!["Analysis failed - please try again".to_string()],
            speaker_roles: Vec::new(),
            detailed_analysis: "Sorry, I couldn't analyze your debate. Please check \
                your connection and try again."
                .to_string(),
            winner_prediction: "Analysis failed".to_string(),
        }
    }
}
