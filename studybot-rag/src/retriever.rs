//! Top-k retrieval and rendering of the context block.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Number of pages retrieved when the caller does not say otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Pages retrieved for one question, best match first.
///
/// Displays as the context block placed in the prompt: one
/// `(Page {page} - {source}): {text}` entry per page, separated by a blank line.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetrievedContext {
    results: Vec<SearchResult>,
}

impl RetrievedContext {
    /// Wrap results that are already in rank order.
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }

    /// The retrieved pages in rank order.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Number of retrieved pages.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// `true` when nothing was retrieved.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl fmt::Display for RetrievedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{result}")?;
        }
        Ok(())
    }
}

/// Finds the pages most similar to a question.
///
/// Must share its [`EmbeddingProvider`] with the
/// [`DocumentIngestor`](crate::ingest::DocumentIngestor) that filled the store;
/// vectors from a different model are comparable in shape only.
pub struct ContextRetriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
}

impl ContextRetriever {
    /// Create a retriever reading from `collection`.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self { embedding_provider, vector_store, collection: collection.into() }
    }

    /// Retrieve at most `top_k` pages for `query`, in the store's rank order.
    ///
    /// An empty store yields an empty context, not an error.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievedContext> {
        if top_k == 0 {
            return Ok(RetrievedContext::default());
        }

        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            e
        })?;

        let results = self
            .vector_store
            .search(&self.collection, &query_embedding, top_k)
            .await
            .map_err(|e| {
                error!(collection = %self.collection, error = %e, "vector store search failed");
                e
            })?;

        for result in &results {
            debug!(chunk.id = %result.chunk.id, score = result.score, "retrieved page");
        }
        info!(result_count = results.len(), top_k, "retrieval completed");

        Ok(RetrievedContext::new(results))
    }

    /// Retrieve and render the context block in one step.
    pub async fn retrieve_context(&self, query: &str, top_k: usize) -> Result<String> {
        Ok(self.retrieve(query, top_k).await?.to_string())
    }
}
