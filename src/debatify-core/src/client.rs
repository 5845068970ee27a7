//! HTTP client for the generative-language API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ModelSettings;
use crate::error::DebatifyError;

/// The external model, seen as an opaque prompt-in/text-out collaborator.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// One generation attempt. No retry, no streaming.
    async fn generate(&self, prompt: &str) -> Result<String, DebatifyError>;
}

/// Client for a `generateContent`-style endpoint.
pub struct ModelClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ModelClient {
    pub fn new(settings: &ModelSettings, api_key: impl Into<String>) -> Result<Self, DebatifyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| DebatifyError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: settings.name.clone(),
        })
    }
}

#[async_trait]
impl GenerativeBackend for ModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, DebatifyError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(DebatifyError::ApiStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(response_text(&body))
    }
}

/// Pull the first candidate's first text part out of a response body.
///
/// Any envelope mismatch yields the empty string; downstream extraction
/// treats that as a fallback case rather than an error.
fn response_text(body: &str) -> String {
    let envelope: GenerateResponse = serde_json::from_str(body).unwrap_or_default();
    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .unwrap_or_default()
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_happy_path() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "first part"}, {"text": "second part"}]
                }
            }]
        }"#;
        assert_eq!(response_text(body), "first part");
    }

    #[test]
    fn test_response_text_tolerates_foreign_shapes() {
        assert_eq!(response_text("{}"), "");
        assert_eq!(response_text(r#"{"candidates": []}"#), "");
        assert_eq!(response_text(r#"{"candidates": [{}]}"#), "");
        assert_eq!(response_text("not json at all"), "");
        assert_eq!(response_text(r#"{"error": {"code": 400}}"#), "");
    }

    #[test]
    fn test_request_envelope_shape() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "hello".to_string(),
                }],
            }],
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["contents"][0]["parts"][0]["text"], "hello");
    }
}
