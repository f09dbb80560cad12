//! In-memory vector store using cosine similarity.
//!
//! [`InMemoryVectorStore`] keeps every collection in a `HashMap` behind a
//! `tokio::sync::RwLock`. It backs the on-disk
//! [`FileVectorStore`](crate::persistent::FileVectorStore) and is used
//! directly in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

#[derive(Debug, Default, Clone)]
pub(crate) struct Collection {
    pub(crate) dimensions: usize,
    pub(crate) chunks: HashMap<String, Chunk>,
}

/// An in-memory vector store using cosine similarity for search.
///
/// Collections are stored as nested `HashMap`s: collection name → chunk ID → chunk.
///
/// # Example
///
/// ```rust,ignore
/// use studybot_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("study_docs", 384).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_collections(collections: HashMap<String, Collection>) -> Self {
        Self { collections: RwLock::new(collections) }
    }

    /// Contents `name` would have after upserting `chunks`, sorted by id.
    /// The store itself is left unchanged.
    pub(crate) async fn preview_upsert(
        &self,
        name: &str,
        chunks: &[Chunk],
    ) -> Result<(usize, Vec<Chunk>)> {
        let collections = self.collections.read().await;
        let collection = collections.get(name).ok_or_else(|| missing_collection(name))?;
        check_dimensions(collection, name, chunks)?;

        let mut merged = collection.chunks.clone();
        for chunk in chunks {
            merged.insert(chunk.id.clone(), chunk.clone());
        }
        let mut merged: Vec<Chunk> = merged.into_values().collect();
        merged.sort_by(|a, b| a.id.cmp(&b.id));
        Ok((collection.dimensions, merged))
    }
}

fn check_dimensions(store: &Collection, collection: &str, chunks: &[Chunk]) -> Result<()> {
    for chunk in chunks {
        if store.dimensions != 0 && chunk.embedding.len() != store.dimensions {
            return Err(RagError::VectorStoreError {
                backend: "InMemory".to_string(),
                message: format!(
                    "chunk '{}' has {} dimensions, collection '{collection}' expects {}",
                    chunk.id,
                    chunk.embedding.len(),
                    store.dimensions
                ),
            });
        }
    }
    Ok(())
}

fn missing_collection(name: &str) -> RagError {
    RagError::VectorStoreError {
        backend: "InMemory".to_string(),
        message: format!("collection '{name}' does not exist"),
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(name.to_string())
            .or_insert_with(|| Collection { dimensions, chunks: HashMap::new() });
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        check_dimensions(store, collection, chunks)?;
        for chunk in chunks {
            store.chunks.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| missing_collection(collection))?;

        let mut scored: Vec<SearchResult> = store
            .chunks
            .values()
            .map(|chunk| {
                let score = cosine_similarity(&chunk.embedding, embedding);
                SearchResult { chunk: chunk.clone(), score }
            })
            .collect();

        // Ties fall back to id order so identical queries rank identically.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        Ok(store.chunks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_similarity_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[2.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn upsert_replaces_chunk_with_same_id() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        store.upsert("docs", &[Chunk::for_page("a.pdf", 1, "old", vec![1.0, 0.0])]).await.unwrap();
        store.upsert("docs", &[Chunk::for_page("a.pdf", 1, "new", vec![0.0, 1.0])]).await.unwrap();

        assert_eq!(store.count("docs").await.unwrap(), 1);
        let results = store.search("docs", &[0.0, 1.0], 5).await.unwrap();
        assert_eq!(results[0].chunk.text, "new");
    }

    #[tokio::test]
    async fn rejects_mismatched_dimensions() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 3).await.unwrap();
        let err = store
            .upsert("docs", &[Chunk::for_page("a.pdf", 1, "x", vec![1.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
        assert_eq!(store.count("docs").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_on_missing_collection_fails() {
        let store = InMemoryVectorStore::new();
        assert!(store.search("nope", &[1.0], 1).await.is_err());
    }

    #[tokio::test]
    async fn empty_collection_returns_no_results() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        assert!(store.search("docs", &[1.0, 0.0], 3).await.unwrap().is_empty());
    }
}
