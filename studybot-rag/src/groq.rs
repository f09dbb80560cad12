//! Chat completions over Groq's OpenAI-compatible API.
//!
//! [`GroqChatClient`] sends one user message per call and turns the HTTP
//! response into a [`CompletionOutcome`]. There is no retry; every failure is
//! returned to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{API_KEY_ENV, DEFAULT_MODEL, GROQ_CHAT_COMPLETIONS_URL, StudyBotConfig};
use crate::error::{RagError, Result};

/// A chat model that answers a single prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as a user message and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Classification of a chat-completions HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// `choices[0].message.content` of a 200 response.
    Success(String),
    /// The body was not JSON.
    ParseFailure {
        /// The raw body.
        raw: String,
    },
    /// The API answered with a non-200 status.
    ApiFailure {
        /// HTTP status code.
        status: u16,
        /// Parsed body, usually an `{"error": {...}}` object.
        body: Value,
    },
    /// A 200 response without a reply where one was expected.
    ShapeMismatch {
        /// Parsed body.
        body: Value,
    },
}

impl CompletionOutcome {
    /// Classify a response from its status code and body text.
    ///
    /// The body is parsed first, so a non-JSON error page is reported as
    /// [`ParseFailure`](Self::ParseFailure) whatever its status.
    pub fn from_http(status: u16, body: &str) -> Self {
        let parsed: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return Self::ParseFailure { raw: body.to_string() },
        };

        if status != 200 {
            return Self::ApiFailure { status, body: parsed };
        }

        let reply = serde_json::from_value::<ChatCompletionResponse>(parsed.clone())
            .ok()
            .and_then(|response| response.choices.into_iter().next())
            .and_then(|choice| choice.message.content);

        match reply {
            Some(text) => Self::Success(text),
            None => Self::ShapeMismatch { body: parsed },
        }
    }

    /// Convert into the reply text or the matching [`RagError`].
    pub fn into_result(self) -> Result<String> {
        match self {
            Self::Success(text) => Ok(text),
            Self::ParseFailure { raw } => Err(RagError::ResponseParseError { raw }),
            Self::ApiFailure { status, body } => Err(RagError::ApiError { status, body }),
            Self::ShapeMismatch { body } => Err(RagError::MalformedResponseError { body }),
        }
    }
}

// ── Chat completions request/response types ────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// A [`ChatModel`] backed by the Groq chat-completions endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use studybot_rag::{ChatModel, GroqChatClient};
///
/// let client = GroqChatClient::new("gsk_...")?;
/// let reply = client.complete("Explain osmosis in one sentence.").await?;
/// ```
pub struct GroqChatClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    endpoint: String,
}

impl GroqChatClient {
    /// Create a client with the default model, temperature and endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::ConfigError(format!(
                "API key must not be empty; set the {API_KEY_ENV} environment variable"
            )));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            temperature: 0.2,
            endpoint: GROQ_CHAT_COMPLETIONS_URL.into(),
        })
    }

    /// Create a client from the assistant configuration.
    pub fn from_config(config: &StudyBotConfig) -> Result<Self> {
        Ok(Self::new(config.api_key.clone())?
            .with_model(config.model.clone())
            .with_temperature(config.temperature)
            .with_endpoint(config.endpoint.clone()))
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for GroqChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "sending chat completion");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "request failed");
                RagError::RequestError(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!(%status, error = %e, "failed to read response body");
            RagError::RequestError(format!("failed to read response body: {e}"))
        })?;

        match CompletionOutcome::from_http(status, &body) {
            CompletionOutcome::Success(text) => {
                info!(model = %self.model, %status, reply_len = text.len(), "chat completion received");
                Ok(text)
            }
            failure => {
                error!(model = %self.model, %status, "chat completion failed");
                failure.into_result()
            }
        }
    }
}
