//! Configuration for the StudyBot assistant.
//!
//! A [`StudyBotConfig`] is built once at startup and handed to the
//! components that need it; nothing reads the environment afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// The Groq OpenAI-compatible chat-completions endpoint.
pub const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The default chat model.
pub const DEFAULT_MODEL: &str = "deepseek-r1-distill-llama-70b";

/// Environment variable holding the Groq API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

const MODEL_ENV: &str = "STUDYBOT_MODEL";
const STORE_DIR_ENV: &str = "STUDYBOT_STORE_DIR";

/// Configuration parameters for the assistant.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyBotConfig {
    /// Bearer token for the chat-completions API.
    pub api_key: String,
    /// Chat model identifier.
    pub model: String,
    /// Sampling temperature; kept low for focused answers.
    pub temperature: f32,
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Number of pages retrieved per question.
    pub top_k: usize,
    /// Directory of the persistent vector store.
    pub store_dir: PathBuf,
    /// Collection that holds ingested pages.
    pub collection: String,
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for StudyBotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyBotConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("endpoint", &self.endpoint)
            .field("top_k", &self.top_k)
            .field("store_dir", &self.store_dir)
            .field("collection", &self.collection)
            .finish()
    }
}

impl Default for StudyBotConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            endpoint: GROQ_CHAT_COMPLETIONS_URL.to_string(),
            top_k: 3,
            store_dir: PathBuf::from("./studybot_db"),
            collection: "study_docs".to_string(),
        }
    }
}

impl StudyBotConfig {
    /// Create a new builder for constructing a [`StudyBotConfig`].
    pub fn builder() -> StudyBotConfigBuilder {
        StudyBotConfigBuilder::default()
    }

    /// Start a builder from the process environment.
    ///
    /// `GROQ_API_KEY`, `STUDYBOT_MODEL` and `STUDYBOT_STORE_DIR` override the
    /// defaults when set. A missing key is only an error once a chat client is
    /// created from the configuration, so ingestion works without one.
    pub fn builder_from_env() -> StudyBotConfigBuilder {
        Self::builder_from_vars(|name| std::env::var(name).ok())
    }

    fn builder_from_vars(var: impl Fn(&str) -> Option<String>) -> StudyBotConfigBuilder {
        let mut builder = Self::builder();
        if let Some(api_key) = var(API_KEY_ENV) {
            builder = builder.api_key(api_key);
        }
        if let Some(model) = var(MODEL_ENV) {
            builder = builder.model(model);
        }
        if let Some(dir) = var(STORE_DIR_ENV) {
            builder = builder.store_dir(dir);
        }
        builder
    }
}

/// Builder for constructing a validated [`StudyBotConfig`].
#[derive(Debug, Clone, Default)]
pub struct StudyBotConfigBuilder {
    config: StudyBotConfig,
}

impl StudyBotConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the chat model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the chat-completions endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the number of pages retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the vector store directory.
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.store_dir = dir.into();
        self
    }

    /// Set the collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Build the [`StudyBotConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - the model or collection is empty
    /// - `top_k == 0`
    /// - `temperature` is outside `0.0..=2.0`
    pub fn build(self) -> Result<StudyBotConfig> {
        let config = self.config;
        if config.model.trim().is_empty() {
            return Err(RagError::ConfigError("model must not be empty".to_string()));
        }
        if config.collection.trim().is_empty() {
            return Err(RagError::ConfigError("collection must not be empty".to_string()));
        }
        if config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(RagError::ConfigError(format!(
                "temperature ({}) must be between 0.0 and 2.0",
                config.temperature
            )));
        }
        Ok(config)
    }
}
