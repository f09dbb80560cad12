//! Deterministic stand-ins for the embedding model, PDF parser and chat API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use studybot_rag::{
    ChatModel, CompletionOutcome, EmbeddingProvider, InMemoryVectorStore, Page, PageExtractor,
    RagError, StudyAssistant,
};

pub const DIM: usize = 64;

/// Bag-of-words embedding: every lowercase word adds 1.0 to a hashed bucket.
///
/// Texts sharing words point in similar directions, which is enough to make
/// retrieval results meaningful in tests.
pub struct WordHashEmbedder;

fn bucket(word: &str) -> usize {
    let hash = word.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
        (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
    });
    (hash % DIM as u64) as usize
}

pub fn embed_words(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        v[bucket(&word.to_lowercase())] += 1.0;
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

#[async_trait]
impl EmbeddingProvider for WordHashEmbedder {
    async fn embed(&self, text: &str) -> studybot_rag::Result<Vec<f32>> {
        Ok(embed_words(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Serves fixed pages per file name instead of parsing PDFs.
#[derive(Default)]
pub struct StaticPages {
    documents: HashMap<String, Vec<Page>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: &str, pages: Vec<Page>) -> Self {
        self.documents.insert(name.to_string(), pages);
        self
    }
}

impl PageExtractor for StaticPages {
    fn extract_pages(&self, path: &Path) -> studybot_rag::Result<Vec<Page>> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        self.documents.get(name).cloned().ok_or_else(|| RagError::ExtractionError {
            path: path.display().to_string(),
            message: "not a PDF".to_string(),
        })
    }
}

/// Answers every prompt by classifying a canned HTTP response, recording the prompts.
pub struct CannedChat {
    status: u16,
    body: String,
    prompts: Mutex<Vec<String>>,
}

impl CannedChat {
    pub fn new(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), prompts: Mutex::new(Vec::new()) }
    }

    pub fn replying(text: &str) -> Self {
        let body = serde_json::json!({"choices": [{"message": {"content": text}}]});
        Self::new(200, &body.to_string())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for CannedChat {
    async fn complete(&self, prompt: &str) -> studybot_rag::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        CompletionOutcome::from_http(self.status, &self.body).into_result()
    }
}

pub async fn assistant_with(
    pages: StaticPages,
    chat: Arc<CannedChat>,
) -> (StudyAssistant, Arc<InMemoryVectorStore>) {
    let store = Arc::new(InMemoryVectorStore::new());
    let assistant = StudyAssistant::builder()
        .embedding_provider(Arc::new(WordHashEmbedder))
        .vector_store(store.clone())
        .chat_model(chat)
        .page_extractor(Arc::new(pages))
        .build()
        .await
        .unwrap();
    (assistant, store)
}

pub fn pdf_path(name: &str) -> PathBuf {
    PathBuf::from("/uploads").join(name)
}
