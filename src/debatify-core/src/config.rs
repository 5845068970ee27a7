//! Configuration module for loading TOML config files.

use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::DebatifyError;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Practice Arena motions to draw from.
    #[serde(default = "default_motions")]
    pub motions: Vec<String>,
    /// Coach conversation topics to draw from.
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motions: default_motions(),
            topics: default_topics(),
            model: ModelSettings::default(),
            prompts: PromptsConfig::default(),
        }
    }
}

/// Settings for the generative-language API.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub name: String,
    pub api_base: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
            connect_timeout_secs: 30,
        }
    }
}

/// Prompt templates for the three modes.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    pub coach: String,
    pub practice: String,
    pub judge: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            coach: DEFAULT_COACH_PROMPT.to_string(),
            practice: DEFAULT_PRACTICE_PROMPT.to_string(),
            judge: DEFAULT_JUDGE_PROMPT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DebatifyError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| DebatifyError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DebatifyError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from string content.
    pub fn from_str(content: &str) -> Result<Self, DebatifyError> {
        toml::from_str(content)
            .map_err(|e| DebatifyError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Pick a random motion, avoiding `current` when possible.
    pub fn random_motion(&self, current: Option<&str>) -> Option<String> {
        pick_excluding(&self.motions, current)
    }

    /// Pick a random coach topic, avoiding `current` when possible.
    pub fn random_topic(&self, current: Option<&str>) -> Option<String> {
        pick_excluding(&self.topics, current)
    }
}

fn pick_excluding(pool: &[String], current: Option<&str>) -> Option<String> {
    let available: Vec<&String> = pool
        .iter()
        .filter(|candidate| Some(candidate.as_str()) != current)
        .collect();
    let pool = if available.is_empty() {
        pool.iter().collect()
    } else {
        available
    };
    pool.choose(&mut rand::thread_rng()).map(|s| (*s).clone())
}

fn default_motions() -> Vec<String> {
    [
        "This house believes that social media has done more harm than good",
        "This house would ban private schools",
        "This house believes that climate change is the greatest threat to humanity",
        "This house would implement a universal basic income",
        "This house believes that artificial intelligence poses a threat to human employment",
        "This house would ban all forms of advertising",
        "This house believes that democracy is the best form of government",
        "This house would legalize all drugs",
        "This house believes that space exploration is a waste of resources",
        "This house would ban animal testing for all purposes",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_topics() -> Vec<String> {
    [
        "This house believes that social media has done more harm than good",
        "This house would ban private ownership of firearms",
        "This house believes that climate change is the greatest threat to humanity",
        "This house would implement universal basic income",
        "This house believes that artificial intelligence poses a threat to human employment",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

const DEFAULT_COACH_PROMPT: &str = r#"You are an AI debate coach. The current debate topic is: "{topic}".

The user just said: "{utterance}"

Provide a thoughtful rebuttal or counter-argument. Keep your response engaging, challenging, and educational. Focus on:
1. Addressing their specific points
2. Introducing counter-evidence or alternative perspectives
3. Highlighting potential weaknesses in their argument
4. Maintaining a respectful but challenging tone

Keep your response under 150 words for natural conversation flow."#;

const DEFAULT_PRACTICE_PROMPT: &str = r#"You are a debate coach analyzing a practice speech. The motion was: "{motion}"

The speaker's transcript: "{transcript}"

Please provide detailed feedback in the following JSON format:
{
  "structure": [score 1-100],
  "clarity": [score 1-100],
  "logic": [score 1-100],
  "tone": [score 1-100],
  "overall": [average of all scores],
  "strengths": ["strength 1", "strength 2", "strength 3"],
  "improvements": ["improvement 1", "improvement 2", "improvement 3"],
  "detailedFeedback": "Comprehensive paragraph explaining the analysis"
}

Evaluate:
- Structure: Opening, body, conclusion, logical flow
- Clarity: Clear expression, easy to understand
- Logic: Sound reasoning, evidence, argument strength
- Tone: Confidence, persuasiveness, engagement

Provide constructive, specific feedback that helps improve debating skills."#;

const DEFAULT_JUDGE_PROMPT: &str = r#"You are an expert debate adjudicator. Analyze the following debate transcript and provide comprehensive judgment.

Transcript: "{transcript}"

Please provide detailed analysis in the following JSON format:
{
  "overallScore": [score 1-100],
  "argumentStrength": [score 1-100],
  "logicalConsistency": [score 1-100],
  "evidenceQuality": [score 1-100],
  "presentation": [score 1-100],
  "fallacies": ["fallacy 1", "fallacy 2", "fallacy 3"],
  "strengths": ["strength 1", "strength 2", "strength 3"],
  "weaknesses": ["weakness 1", "weakness 2", "weakness 3"],
  "speakerRoles": [
    {
      "speaker": "Speaker name or identifier",
      "role": "Government/Opposition/etc",
      "performance": [score 1-100],
      "feedback": "Specific feedback for this speaker"
    }
  ],
  "detailedAnalysis": "Comprehensive analysis paragraph",
  "winnerPrediction": "Which side likely won and why"
}

Analyze for:
- Logical fallacies (ad hominem, straw man, false dichotomy, etc.)
- Argument structure and strength
- Evidence quality and relevance
- Speaker performance and roles
- Overall debate quality
- Predict the likely winner based on debate merit

Be thorough, fair, and constructive in your analysis."#;
