//! Model interaction: the [`TableModel`] boundary and the Groq client.
//!
//! The hosted model is the one non-deterministic dependency in the pipeline,
//! so it sits behind a single-operation trait: text in, text out. Tests
//! substitute canned responses; production uses [`GroqClient`] against
//! Groq's OpenAI-compatible chat-completion endpoint.
//!
//! There is deliberately no retry and no backoff: the contract is exactly
//! one network call per page, and a failed page is logged and skipped by
//! [`request_tables`] rather than propagated.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::prompts::{page_prompt, DEFAULT_SYSTEM_PROMPT};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Endpoint for Groq's OpenAI-compatible chat-completion API.
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Errors from a single model call. These never escape
/// [`request_tables`]; they exist so [`TableModel`] implementations can
/// report *why* a call failed in the page diagnostic.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered 200 but the reply carried no usable content.
    #[error("response contained no completion content")]
    MissingContent,
}

/// The table-extraction capability: one operation, text in, text out.
///
/// Implementations must be `Send + Sync` so the client can be shared via
/// `Arc` between the config and the run.
#[async_trait]
pub trait TableModel: Send + Sync {
    /// Submit a (system, user) message pair and return the model's reply.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelError>;
}

// ── Groq client ──────────────────────────────────────────────────────────

/// Chat-completion client for Groq's hosted models.
///
/// Constructed explicitly and passed around — never a process-wide global.
/// Use [`GroqClient::from_env`] to read the key from `GROQ_API_KEY`, or
/// [`GroqClient::new`] when the caller manages credentials itself.
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    timeout: Duration,
}

impl GroqClient {
    /// Create a client with default model settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: defaults.model,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            timeout: Duration::from_secs(defaults.api_timeout_secs),
        }
    }

    /// Create a client from the `GROQ_API_KEY` environment variable,
    /// taking model settings from `config`.
    pub fn from_env(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ExtractError::MissingApiKey {
                var: API_KEY_VAR.to_string(),
            })?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.api_timeout_secs),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TableModel for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ModelError::MissingContent)?;

        debug!("Model returned {} chars", content.len());
        Ok(content)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

// ── Requester ────────────────────────────────────────────────────────────

/// Ask the model to extract tables from one page of text.
///
/// Makes exactly one call. On any failure the condition is logged with the
/// page number and `None` is returned — errors never cross this boundary,
/// so the orchestrator always continues with the next page.
pub async fn request_tables(
    model: &Arc<dyn TableModel>,
    page_number: usize,
    text: &str,
    system_override: Option<&str>,
) -> Option<String> {
    let system = system_override.unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let user = page_prompt(page_number, text);

    match model.complete(system, &user).await {
        Ok(reply) => Some(reply),
        Err(e) => {
            warn!("Model error on page {page_number}: {e}");
            None
        }
    }
}
