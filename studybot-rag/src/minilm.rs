//! Local sentence embeddings with `fastembed`.
//!
//! This module is only available when the `fastembed` feature is enabled
//! (on by default). The model runs on the CPU through ONNX Runtime, so every
//! call is moved to a blocking thread.

use std::sync::Arc;

use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, error, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Output size of `all-MiniLM-L6-v2`.
const MINILM_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] backed by a local `all-MiniLM-L6-v2` model.
///
/// # Example
///
/// ```rust,ignore
/// use studybot_rag::minilm::FastEmbedProvider;
///
/// let provider = FastEmbedProvider::new()?;
/// let vectors = provider.embed_batch(&["page one", "page two"]).await?;
/// ```
pub struct FastEmbedProvider {
    model: Arc<TextEmbedding>,
}

impl FastEmbedProvider {
    /// Load the model, downloading it into fastembed's cache on first use.
    pub fn new() -> Result<Self> {
        let mut options = InitOptions::default();
        options.model_name = EmbeddingModel::AllMiniLML6V2;
        options.show_download_progress = false;

        info!(model = "all-MiniLM-L6-v2", "loading embedding model");
        let model = TextEmbedding::try_new(options).map_err(|e| {
            error!(provider = "fastembed", error = %e, "failed to load model");
            RagError::EmbeddingError {
                provider: "fastembed".into(),
                message: format!("failed to load model: {e}"),
            }
        })?;

        Ok(Self { model: Arc::new(model) })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::EmbeddingError {
            provider: "fastembed".into(),
            message: "model returned no embedding".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "fastembed", batch_size = texts.len(), "embedding batch");

        let model = Arc::clone(&self.model);
        let owned: Vec<String> = texts.iter().map(|t| (*t).to_string()).collect();

        tokio::task::spawn_blocking(move || model.embed(owned, None))
            .await
            .map_err(|e| RagError::EmbeddingError {
                provider: "fastembed".into(),
                message: format!("embedding task panicked: {e}"),
            })?
            .map_err(|e| {
                error!(provider = "fastembed", error = %e, "embedding failed");
                RagError::EmbeddingError {
                    provider: "fastembed".into(),
                    message: format!("embedding failed: {e}"),
                }
            })
    }

    fn dimensions(&self) -> usize {
        MINILM_DIMENSIONS
    }
}
