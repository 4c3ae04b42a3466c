//! Gemini `generateContent` client
//!
//! Sends the rendered prompt with a JSON response schema of
//! `{ "vastuInfo": string }` and reads the first candidate back.

use std::future::Future;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{render_prompt, VastuInsight, VastuOracle, VastuRequest};
use crate::core::config::LlmConfig;
use crate::core::error::{CompassError, Result};

/// HTTP oracle backed by a Gemini-compatible endpoint
#[derive(Debug, Clone)]
pub struct GeminiOracle {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiOracle {
    /// Build a client, reading the API key from the configured environment
    pub fn new(config: LlmConfig) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Request body carrying the prompt and the structured-output schema
    pub fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "vastuInfo": {
                            "type": "STRING",
                            "description": "Vastu Shastra information for the given direction."
                        }
                    },
                    "required": ["vastuInfo"]
                }
            }
        })
    }

    async fn send(&self, request: VastuRequest) -> Result<VastuInsight> {
        let body = Self::request_body(&render_prompt(request.heading()));
        log::debug!("consulting {} for {}°", self.config.model, request.direction);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(CompassError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_response(&text)
    }
}

impl VastuOracle for GeminiOracle {
    fn consult(&self, request: VastuRequest) -> impl Future<Output = Result<VastuInsight>> + Send {
        self.send(request)
    }
}

/// Extract the insight from a raw `generateContent` response body
pub fn parse_response(body: &str) -> Result<VastuInsight> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect();
    parse_insight_text(&text)
}

/// Decode the model's text as `{ "vastuInfo": ... }`.
///
/// Models occasionally wrap the JSON in a markdown fence or ignore the schema
/// entirely; plain text is accepted as the reading itself.
pub fn parse_insight_text(text: &str) -> Result<VastuInsight> {
    let trimmed = strip_code_fence(text.trim());
    if trimmed.is_empty() {
        return Err(CompassError::EmptyResponse);
    }

    match serde_json::from_str::<VastuInsight>(trimmed) {
        Ok(insight) if insight.vastu_info.trim().is_empty() => Err(CompassError::EmptyResponse),
        Ok(insight) => Ok(insight),
        Err(_) if trimmed.starts_with('{') => Err(CompassError::EmptyResponse),
        Err(_) => Ok(VastuInsight::new(trimmed)),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
