//! Error types for the `studybot-rag` crate.

use thiserror::Error;

/// Errors that can occur while ingesting documents or answering questions.
#[derive(Debug, Error)]
pub enum RagError {
    /// The PDF could not be opened or parsed.
    #[error("Failed to extract text from '{path}': {message}")]
    ExtractionError {
        /// Path of the document that failed.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The chat-completion response body was not valid JSON.
    #[error("Failed to parse chat completion response: {raw}")]
    ResponseParseError {
        /// The raw response body.
        raw: String,
    },

    /// The chat-completion API answered with a non-success status.
    #[error("Chat completion API error {status}: {body}")]
    ApiError {
        /// The HTTP status code.
        status: u16,
        /// The parsed JSON body.
        body: serde_json::Value,
    },

    /// The chat-completion API answered 200 but without `choices[0].message.content`.
    #[error("Unexpected chat completion response format: {body}")]
    MalformedResponseError {
        /// The parsed JSON body.
        body: serde_json::Value,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Chat completion request failed: {0}")]
    RequestError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filesystem error outside of PDF parsing.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for StudyBot operations.
pub type Result<T> = std::result::Result<T, RagError>;
