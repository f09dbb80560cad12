//! Document ingestion: extract pages → embed → upsert.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

#[cfg(feature = "fastembed")]
use crate::config::StudyBotConfig;
use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::pdf::PageExtractor;
use crate::vectorstore::VectorStore;

/// What a call to [`DocumentIngestor::ingest`] stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// File name the chunks were recorded under.
    pub source: String,
    /// Pages the extractor returned.
    pub pages_total: usize,
    /// Pages without extractable text.
    pub pages_skipped: usize,
    /// Ids of the stored chunks, in page order.
    pub chunk_ids: Vec<String>,
}

impl IngestReport {
    /// Number of pages that were embedded and stored.
    pub fn chunks_indexed(&self) -> usize {
        self.chunk_ids.len()
    }
}

/// Turns documents on disk into one indexed chunk per non-empty page.
pub struct DocumentIngestor {
    extractor: Arc<dyn PageExtractor>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    collection: String,
}

impl DocumentIngestor {
    /// Create an ingestor writing into `collection`.
    pub fn new(
        extractor: Arc<dyn PageExtractor>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self { extractor, embedding_provider, vector_store, collection: collection.into() }
    }

    /// Open an ingestor over the on-disk store with the local embedding
    /// model, creating the collection if needed. Needs no API key.
    #[cfg(feature = "fastembed")]
    pub async fn open(config: &StudyBotConfig) -> Result<Self> {
        use crate::minilm::FastEmbedProvider;
        use crate::pdf::PdfPageExtractor;
        use crate::persistent::FileVectorStore;

        let vector_store = FileVectorStore::open(config.store_dir.clone()).await?;
        let embedding_provider = FastEmbedProvider::new()?;
        vector_store.create_collection(&config.collection, embedding_provider.dimensions()).await?;

        Ok(Self::new(
            Arc::new(PdfPageExtractor::new()),
            Arc::new(embedding_provider),
            Arc::new(vector_store),
            config.collection.clone(),
        ))
    }

    /// Ingest the document at `path`.
    ///
    /// Each page with text becomes a chunk with id `<file name>_page_<n>`.
    /// Chunks are upserted, so ingesting a file with the same name again
    /// replaces the pages stored for it. Pages without text are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ExtractionError`] when the file cannot be parsed,
    /// and propagates embedding and store failures unchanged.
    pub async fn ingest(&self, path: &Path) -> Result<IngestReport> {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| RagError::ExtractionError {
                path: path.display().to_string(),
                message: "path has no file name".to_string(),
            })?;

        // Parsing is CPU-bound and synchronous.
        let extractor = Arc::clone(&self.extractor);
        let owned_path = path.to_path_buf();
        let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&owned_path))
            .await
            .map_err(|e| {
                error!(document.id = %source, error = %e, "extraction task failed");
                RagError::ExtractionError {
                    path: path.display().to_string(),
                    message: format!("extraction task failed: {e}"),
                }
            })??;
        let pages_total = pages.len();

        let indexable: Vec<(u32, &str)> =
            pages.iter().filter_map(|p| p.indexable_text().map(|t| (p.number, t))).collect();
        let pages_skipped = pages_total - indexable.len();
        for page in pages.iter().filter(|p| p.indexable_text().is_none()) {
            debug!(document.id = %source, page = page.number, "skipping page without text");
        }

        if indexable.is_empty() {
            info!(document.id = %source, pages_total, chunk_count = 0, "ingested document (no text)");
            return Ok(IngestReport { source, pages_total, pages_skipped, chunk_ids: Vec::new() });
        }

        let texts: Vec<&str> = indexable.iter().map(|(_, text)| *text).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %source, error = %e, "embedding failed during ingestion");
            e
        })?;
        if embeddings.len() != indexable.len() {
            return Err(RagError::EmbeddingError {
                provider: "ingest".to_string(),
                message: format!(
                    "expected {} embeddings, provider returned {}",
                    indexable.len(),
                    embeddings.len()
                ),
            });
        }

        let chunks: Vec<Chunk> = indexable
            .iter()
            .zip(embeddings)
            .map(|((page, text), embedding)| Chunk::for_page(&source, *page, *text, embedding))
            .collect();

        self.vector_store.upsert(&self.collection, &chunks).await.map_err(|e| {
            error!(document.id = %source, error = %e, "upsert failed during ingestion");
            e
        })?;

        let chunk_ids: Vec<String> = chunks.into_iter().map(|c| c.id).collect();
        info!(
            document.id = %source,
            pages_total,
            pages_skipped,
            chunk_count = chunk_ids.len(),
            "ingested document"
        );

        Ok(IngestReport { source, pages_total, pages_skipped, chunk_ids })
    }
}
