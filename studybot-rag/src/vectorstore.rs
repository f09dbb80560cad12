//! Vector store trait for storing and searching page embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for page embeddings with similarity search.
///
/// Implementations manage named collections of [`Chunk`]s. Writes are
/// upserts keyed by [`Chunk::id`], so re-ingesting a document replaces the
/// pages it had before. There is no delete path.
///
/// # Example
///
/// ```rust,ignore
/// use studybot_rag::{VectorStore, InMemoryVectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("study_docs", 384).await?;
/// store.upsert("study_docs", &chunks).await?;
/// let results = store.search("study_docs", &query_embedding, 3).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Insert chunks, replacing any stored chunk with the same id.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Number of chunks stored in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}
