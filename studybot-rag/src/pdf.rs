//! Page-level text extraction from PDF files.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, warn};

use crate::document::Page;
use crate::error::{RagError, Result};

/// Splits a document on disk into its ordered pages.
pub trait PageExtractor: Send + Sync {
    /// Extract every page of the document at `path`, numbered from 1.
    ///
    /// Pages the parser gets no text out of are returned as
    /// [`Page::blank`]; only an unreadable document is an error.
    fn extract_pages(&self, path: &Path) -> Result<Vec<Page>>;
}

/// [`PageExtractor`] for PDF files.
///
/// Uses `pdf-extract`, which handles ToUnicode maps and custom font
/// encodings. Some malformed files make it fail or panic; those are retried
/// with `lopdf`'s simpler per-page text extraction before giving up.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageExtractor;

impl PdfPageExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for PdfPageExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Page>> {
        if !path.is_file() {
            return Err(extraction_error(path, "file does not exist or is not a regular file"));
        }

        let primary = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_by_pages(path)
        }));

        let reason = match primary {
            Ok(Ok(texts)) => {
                debug!(path = %path.display(), page_count = texts.len(), "extracted pages");
                return Ok(texts
                    .into_iter()
                    .zip(1u32..)
                    .map(|(text, number)| page_from_text(number, &text))
                    .collect());
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        warn!(path = %path.display(), reason = %reason, "pdf-extract failed, trying lopdf");
        extract_with_lopdf(path)
            .map_err(|fallback| extraction_error(path, &format!("{reason}; lopdf: {fallback}")))
    }
}

fn extract_with_lopdf(path: &Path) -> std::result::Result<Vec<Page>, String> {
    let doc = lopdf::Document::load(path).map_err(|e| e.to_string())?;
    let pages = doc
        .get_pages()
        .keys()
        .map(|&number| match doc.extract_text(&[number]) {
            Ok(text) => page_from_text(number, &text),
            Err(_) => Page::blank(number),
        })
        .collect::<Vec<_>>();
    debug!(path = %path.display(), page_count = pages.len(), "extracted pages with lopdf");
    Ok(pages)
}

/// Both parsers pad page text with line breaks; stored text starts and ends
/// with content.
fn page_from_text(number: u32, text: &str) -> Page {
    let text = text.trim();
    if text.is_empty() { Page::blank(number) } else { Page::new(number, text) }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "parser panicked".to_string()
    }
}

fn extraction_error(path: &Path, message: &str) -> RagError {
    RagError::ExtractionError { path: path.display().to_string(), message: message.to_string() }
}
