//! # studybot-rag
//!
//! Retrieval-augmented question answering over PDF study material.
//!
//! PDFs are split into pages, each page with text is embedded and stored in a
//! vector store, and questions are answered by the Groq chat-completions API
//! using the most similar pages as context.
//!
//! ## Feature flags
//!
//! - `fastembed` (default) — local `all-MiniLM-L6-v2` embeddings via
//!   [`FastEmbedProvider`] and [`StudyAssistant::open`].

pub mod assistant;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod groq;
pub mod ingest;
pub mod inmemory;
#[cfg(feature = "fastembed")]
pub mod minilm;
pub mod pdf;
pub mod persistent;
pub mod prompt;
pub mod retriever;
pub mod vectorstore;

pub use assistant::{Answer, StudyAssistant, StudyAssistantBuilder};
pub use config::{StudyBotConfig, StudyBotConfigBuilder};
pub use document::{Chunk, ChunkMetadata, Page, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use groq::{ChatModel, CompletionOutcome, GroqChatClient};
pub use ingest::{DocumentIngestor, IngestReport};
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "fastembed")]
pub use minilm::FastEmbedProvider;
pub use pdf::{PageExtractor, PdfPageExtractor};
pub use persistent::FileVectorStore;
pub use prompt::compose_prompt;
pub use retriever::{ContextRetriever, DEFAULT_TOP_K, RetrievedContext};
pub use vectorstore::VectorStore;
