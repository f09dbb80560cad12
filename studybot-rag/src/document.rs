//! Data types for pages, indexed chunks, and search results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One page of a source document as produced by a
/// [`PageExtractor`](crate::pdf::PageExtractor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Extracted text, `None` when the parser produced nothing for the page.
    pub text: Option<String>,
}

impl Page {
    /// Create a page with extracted text.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self { number, text: Some(text.into()) }
    }

    /// Create a page the parser could not get any text out of.
    pub fn blank(number: u32) -> Self {
        Self { number, text: None }
    }

    /// The page text if it contains anything other than whitespace.
    pub fn indexable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Where an indexed chunk came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// 1-based page number inside the source document.
    pub page: u32,
    /// File name (no directory) of the source document.
    pub source: String,
}

/// A page of text stored in the index together with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, `{source}_page_{page}`.
    pub id: String,
    /// The page text.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Page number and source file.
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Build the identifier for page `page` of `source`.
    pub fn page_id(source: &str, page: u32) -> String {
        format!("{source}_page_{page}")
    }

    /// Create a chunk for a page, deriving its identifier from the metadata.
    pub fn for_page(
        source: impl Into<String>,
        page: u32,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        let source = source.into();
        Self {
            id: Self::page_id(&source, page),
            text: text.into(),
            embedding,
            metadata: ChunkMetadata { page, source },
        }
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

impl fmt::Display for SearchResult {
    /// Renders the citation line used in prompts: `(Page 3 - notes.pdf): text`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = &self.chunk.metadata;
        write!(f, "(Page {} - {}): {}", meta.page, meta.source, self.chunk.text)
    }
}
