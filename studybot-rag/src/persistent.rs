//! On-disk vector store.
//!
//! [`FileVectorStore`] keeps each collection as `<dir>/<collection>.json` and
//! serves searches from memory. Every upsert rewrites the collection file
//! before the new chunks become searchable, so memory never holds pages the
//! file lacks.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::inmemory::{Collection, InMemoryVectorStore};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "File";

#[derive(Serialize, Deserialize)]
struct CollectionFile {
    dimensions: usize,
    chunks: Vec<Chunk>,
}

/// A [`VectorStore`] persisted as JSON files under a directory.
///
/// # Example
///
/// ```rust,ignore
/// use studybot_rag::{FileVectorStore, VectorStore};
///
/// let store = FileVectorStore::open("./studybot_db").await?;
/// store.create_collection("study_docs", 384).await?;
/// ```
#[derive(Debug)]
pub struct FileVectorStore {
    dir: PathBuf,
    inner: InMemoryVectorStore,
    /// Held from building a collection file until memory reflects it.
    writes: Mutex<()>,
}

impl FileVectorStore {
    /// Open the store at `dir`, creating the directory if needed and loading
    /// every collection file found in it.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let mut collections = HashMap::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let bytes = tokio::fs::read(&path).await?;
            let file: CollectionFile = serde_json::from_slice(&bytes).map_err(|e| {
                error!(path = %path.display(), error = %e, "corrupt collection file");
                store_error(format!("failed to read '{}': {e}", path.display()))
            })?;
            debug!(collection = %name, chunk_count = file.chunks.len(), "loaded collection");

            let chunks = file.chunks.into_iter().map(|c| (c.id.clone(), c)).collect();
            collections.insert(name, Collection { dimensions: file.dimensions, chunks });
        }

        info!(dir = %dir.display(), collections = collections.len(), "opened vector store");
        Ok(Self {
            dir,
            inner: InMemoryVectorStore::from_collections(collections),
            writes: Mutex::new(()),
        })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    async fn write_collection(&self, name: &str, file: &CollectionFile) -> Result<()> {
        let bytes = serde_json::to_vec(file)
            .map_err(|e| store_error(format!("failed to serialize collection '{name}': {e}")))?;

        // Write to a sibling file first so a crash never leaves a truncated collection.
        let path = self.collection_path(name);
        let tmp = path.with_extension("json.tmp");
        let written = match tokio::fs::write(&tmp, bytes).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        written.map_err(|e| {
            error!(collection = %name, path = %path.display(), error = %e, "failed to write collection file");
            store_error(format!("failed to write '{}': {e}", path.display()))
        })
    }
}

fn store_error(message: String) -> RagError {
    RagError::VectorStoreError { backend: BACKEND.to_string(), message }
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(store_error(format!(
            "collection name '{name}' may only contain ASCII letters, digits, '_' and '-'"
        )))
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        validate_name(name)?;
        let _writes = self.writes.lock().await;
        if !self.collection_path(name).exists() {
            self.write_collection(name, &CollectionFile { dimensions, chunks: Vec::new() }).await?;
        }
        self.inner.create_collection(name, dimensions).await
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let _writes = self.writes.lock().await;
        let (dimensions, merged) = self.inner.preview_upsert(collection, chunks).await?;
        self.write_collection(collection, &CollectionFile { dimensions, chunks: merged }).await?;
        self.inner.upsert(collection, chunks).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.inner.search(collection, embedding, top_k).await
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        self.inner.count(collection).await
    }
}
