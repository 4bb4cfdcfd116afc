//! Gemini HTTP backend for the concierge.
//!
//! Talks to the `generateContent` endpoint of the generative language API:
//!
//! ```text
//! POST {endpoint}/models/{model}:generateContent
//! x-goog-api-key: <key>
//!
//! { "systemInstruction": { "parts": [{ "text": ... }] },
//!   "contents": [ { "role": "user", "parts": [...] }, { "role": "model", ... }, ... ],
//!   "generationConfig": { "temperature": 0.7 } }
//! ```
//!
//! The endpoint is stateless, so [`GeminiSession`] resends the accumulated
//! turns with every message.  Only exchanges with a non-empty reply are
//! recorded: the API rejects a model turn whose text part is empty.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::settings::AssistantSettings;
use crate::application::concierge::{AssistantError, ChatBackend, ChatSession, SYSTEM_INSTRUCTION};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── Wire format ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// One conversation turn.  `role` is `"user"` or `"model"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Turn {
    fn new(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new("model", text)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub system_instruction: SystemInstruction,
    pub contents: &'a [Turn],
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Turn>,
}

/// Builds the request body for `contents`.
pub fn build_request<'a>(
    system_instruction: &str,
    contents: &'a [Turn],
    temperature: f32,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        system_instruction: SystemInstruction {
            parts: vec![Part {
                text: system_instruction.to_string(),
            }],
        },
        contents,
        generation_config: GenerationConfig { temperature },
    }
}

/// Text of the first candidate, parts concatenated.  Empty when there is none.
pub fn reply_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default()
}

// ── Backend ───────────────────────────────────────────────────────────────────

/// [`ChatBackend`] backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    url: String,
    api_key: String,
    temperature: f32,
}

impl GeminiBackend {
    /// # Errors
    ///
    /// Returns [`AssistantError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn new(settings: &AssistantSettings, api_key: impl Into<String>) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: generate_content_url(&settings.endpoint, &settings.model),
            api_key: api_key.into(),
            temperature: settings.temperature,
        })
    }

    /// Reads the API key from the variable named by `settings.api_key_env`.
    ///
    /// Returns `Ok(None)` when the variable is unset or empty: the concierge
    /// then runs offline.
    pub fn from_env(settings: &AssistantSettings) -> Result<Option<Self>, AssistantError> {
        match std::env::var(&settings.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Self::new(settings, key).map(Some),
            _ => {
                debug!("{} not set; concierge offline", settings.api_key_env);
                Ok(None)
            }
        }
    }
}

fn generate_content_url(endpoint: &str, model: &str) -> String {
    format!("{}/models/{model}:generateContent", endpoint.trim_end_matches('/'))
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    async fn start_session(&self) -> Result<Box<dyn ChatSession>, AssistantError> {
        Ok(Box::new(GeminiSession {
            backend: self.clone(),
            history: Vec::new(),
        }))
    }
}

/// One conversation.  Holds every completed user/model turn.
pub struct GeminiSession {
    backend: GeminiBackend,
    history: Vec<Turn>,
}

impl GeminiSession {
    pub fn history(&self) -> &[Turn] {
        &self.history
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send(&mut self, message: &str) -> Result<String, AssistantError> {
        let mut contents = self.history.clone();
        contents.push(Turn::user(message));
        let request = build_request(SYSTEM_INSTRUCTION, &contents, self.backend.temperature);

        let response = self
            .backend
            .client
            .post(&self.backend.url)
            .header("x-goog-api-key", &self.backend.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| AssistantError::Decode(e.to_string()))?;
        let text = reply_text(&decoded);
        if text.is_empty() {
            debug!("assistant returned no text; exchange not recorded");
            return Ok(text);
        }

        contents.push(Turn::model(text.clone()));
        self.history = contents;
        debug!("concierge history now {} turns", self.history.len());
        Ok(text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
