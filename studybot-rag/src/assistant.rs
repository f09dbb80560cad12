//! The StudyBot assistant.
//!
//! [`StudyAssistant`] wires the ingestor, retriever, prompt and chat model
//! together around a single embedding provider and vector store.
//!
//! # Example
//!
//! ```rust,ignore
//! use studybot_rag::{StudyAssistant, StudyBotConfig};
//!
//! let config = StudyBotConfig::builder_from_env().build()?;
//! let assistant = StudyAssistant::open(&config).await?;
//!
//! assistant.ingest_pdf("notes/bio.pdf".as_ref()).await?;
//! let answer = assistant.answer_question("What is the mitochondria?").await?;
//! println!("{}", answer.text);
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::StudyBotConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::groq::ChatModel;
use crate::ingest::{DocumentIngestor, IngestReport};
use crate::pdf::{PageExtractor, PdfPageExtractor};
use crate::prompt::compose_prompt;
use crate::retriever::{ContextRetriever, DEFAULT_TOP_K, RetrievedContext};
use crate::vectorstore::VectorStore;

/// A model reply together with the pages it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// The model's reply.
    pub text: String,
    /// The pages placed in the prompt, for citation display.
    pub context: RetrievedContext,
}

/// Ingests PDFs and answers questions about them.
///
/// Construct one via [`StudyAssistant::builder()`] or, with the default
/// backends, [`StudyAssistant::open`].
pub struct StudyAssistant {
    ingestor: DocumentIngestor,
    retriever: ContextRetriever,
    chat_model: Arc<dyn ChatModel>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
    top_k: usize,
}

impl StudyAssistant {
    /// Create a new [`StudyAssistantBuilder`].
    pub fn builder() -> StudyAssistantBuilder {
        StudyAssistantBuilder::default()
    }

    /// Build an assistant with the default backends: the on-disk store in
    /// `config.store_dir`, the local MiniLM embedder, and the Groq client.
    #[cfg(feature = "fastembed")]
    pub async fn open(config: &StudyBotConfig) -> Result<Self> {
        use crate::groq::GroqChatClient;
        use crate::minilm::FastEmbedProvider;
        use crate::persistent::FileVectorStore;

        let vector_store = FileVectorStore::open(config.store_dir.clone()).await?;
        let embedding_provider = FastEmbedProvider::new()?;
        let chat_model = GroqChatClient::from_config(config)?;

        Self::builder()
            .config(config)
            .embedding_provider(Arc::new(embedding_provider))
            .vector_store(Arc::new(vector_store))
            .chat_model(Arc::new(chat_model))
            .build()
            .await
    }

    /// Number of pages retrieved per question by default.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Ingest a PDF into the knowledge base.
    pub async fn ingest_pdf(&self, path: &Path) -> Result<IngestReport> {
        self.ingestor.ingest(path).await
    }

    /// Retrieve up to `top_k` pages for `query`.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievedContext> {
        self.retriever.retrieve(query, top_k).await
    }

    /// Retrieve up to `top_k` pages for `query` and render the context block.
    pub async fn retrieve_context(&self, query: &str, top_k: usize) -> Result<String> {
        self.retriever.retrieve_context(query, top_k).await
    }

    /// Answer a question using the configured `top_k`.
    pub async fn answer_question(&self, question: &str) -> Result<Answer> {
        self.answer_question_with(question, self.top_k).await
    }

    /// Answer a question grounded on up to `top_k` retrieved pages.
    ///
    /// Errors from retrieval and from the chat model are returned unchanged.
    pub async fn answer_question_with(&self, question: &str, top_k: usize) -> Result<Answer> {
        let context = self.retriever.retrieve(question, top_k).await?;
        let prompt = compose_prompt(&context.to_string(), question);
        let text = self.chat_model.complete(&prompt).await?;

        info!(context_pages = context.len(), answer_len = text.len(), "answered question");
        Ok(Answer { text, context })
    }

    /// Number of pages currently in the knowledge base.
    pub async fn indexed_pages(&self) -> Result<usize> {
        self.vector_store.count(&self.collection).await
    }
}

/// Builder for constructing a [`StudyAssistant`].
///
/// The embedding provider, vector store and chat model are required; the
/// page extractor defaults to [`PdfPageExtractor`].
///
/// # Example
///
/// ```rust,ignore
/// let assistant = StudyAssistant::builder()
///     .config(&config)
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(InMemoryVectorStore::new()))
///     .chat_model(Arc::new(GroqChatClient::from_config(&config)?))
///     .build()
///     .await?;
/// ```
pub struct StudyAssistantBuilder {
    collection: String,
    top_k: usize,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chat_model: Option<Arc<dyn ChatModel>>,
    page_extractor: Option<Arc<dyn PageExtractor>>,
}

impl Default for StudyAssistantBuilder {
    fn default() -> Self {
        Self {
            collection: StudyBotConfig::default().collection,
            top_k: DEFAULT_TOP_K,
            embedding_provider: None,
            vector_store: None,
            chat_model: None,
            page_extractor: None,
        }
    }
}

impl StudyAssistantBuilder {
    /// Take the collection name and `top_k` from a configuration.
    pub fn config(mut self, config: &StudyBotConfig) -> Self {
        self.collection = config.collection.clone();
        self.top_k = config.top_k;
        self
    }

    /// Set the collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = name.into();
        self
    }

    /// Set the default number of pages retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the embedding provider used for both pages and questions.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the chat model.
    pub fn chat_model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.chat_model = Some(model);
        self
    }

    /// Replace the PDF page extractor.
    pub fn page_extractor(mut self, extractor: Arc<dyn PageExtractor>) -> Self {
        self.page_extractor = Some(extractor);
        self
    }

    /// Build the [`StudyAssistant`] and make sure its collection exists.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required component is missing
    /// or `top_k` is zero, and store errors from creating the collection.
    pub async fn build(self) -> Result<StudyAssistant> {
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chat_model = self
            .chat_model
            .ok_or_else(|| RagError::ConfigError("chat_model is required".to_string()))?;
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        let page_extractor: Arc<dyn PageExtractor> =
            self.page_extractor.unwrap_or_else(|| Arc::new(PdfPageExtractor::new()));

        vector_store.create_collection(&self.collection, embedding_provider.dimensions()).await?;

        Ok(StudyAssistant {
            ingestor: DocumentIngestor::new(
                page_extractor,
                Arc::clone(&embedding_provider),
                Arc::clone(&vector_store),
                self.collection.clone(),
            ),
            retriever: ContextRetriever::new(
                embedding_provider,
                Arc::clone(&vector_store),
                self.collection.clone(),
            ),
            chat_model,
            vector_store,
            collection: self.collection,
            top_k: self.top_k,
        })
    }
}
