//! Upload → ask → answer, with canned PDF pages and a canned chat reply.

mod common;

use std::path::Path;
use std::sync::Arc;

use common::{CannedChat, StaticPages, WordHashEmbedder, assistant_with, pdf_path};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use studybot_rag::{
    FileVectorStore, InMemoryVectorStore, Page, PageExtractor, PdfPageExtractor, RagError,
    StudyAssistant, compose_prompt,
};

const MITOCHONDRIA: &str = "The mitochondria is the powerhouse of the cell.";

#[tokio::test]
async fn bio_pdf_question_is_answered_from_page_one() {
    let pages = StaticPages::new().with_document("bio.pdf", vec![Page::new(1, MITOCHONDRIA)]);
    let chat = Arc::new(CannedChat::new(
        200,
        r#"{"choices":[{"message":{"content":"It's the cell's energy producer."}}]}"#,
    ));
    let (assistant, _) = assistant_with(pages, chat.clone()).await;

    assistant.ingest_pdf(&pdf_path("bio.pdf")).await.unwrap();

    let context = assistant.retrieve_context("What is the mitochondria?", 1).await.unwrap();
    assert!(context.contains("(Page 1 - bio.pdf): The mitochondria is the powerhouse of the cell."));

    let answer = assistant.answer_question_with("What is the mitochondria?", 1).await.unwrap();
    assert_eq!(answer.text, "It's the cell's energy producer.");
    assert_eq!(answer.context.to_string(), context);

    let prompts = chat.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("(Page 1 - bio.pdf): The mitochondria is the powerhouse of the cell."));
    assert!(prompts[0].contains("What is the mitochondria?"));
    assert_eq!(prompts[0], compose_prompt(&context, "What is the mitochondria?"));
}

#[tokio::test]
async fn gateway_failure_reaches_the_caller_unchanged() {
    let pages = StaticPages::new().with_document("bio.pdf", vec![Page::new(1, MITOCHONDRIA)]);
    let chat = Arc::new(CannedChat::new(500, r#"{"error":{"message":"overloaded"}}"#));
    let (assistant, _) = assistant_with(pages, chat).await;
    assistant.ingest_pdf(&pdf_path("bio.pdf")).await.unwrap();

    let err = assistant.answer_question("What is the mitochondria?").await.unwrap_err();

    assert!(matches!(err, RagError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn question_without_documents_still_reaches_the_model() {
    let chat = Arc::new(CannedChat::replying("Upload a PDF first!"));
    let (assistant, _) = assistant_with(StaticPages::new(), chat.clone()).await;

    let answer = assistant.answer_question("What is osmosis?").await.unwrap();

    assert_eq!(answer.text, "Upload a PDF first!");
    assert!(answer.context.is_empty());
    assert!(chat.prompts()[0].contains("Retrieved Context:\n\n"));
}

#[tokio::test]
async fn builder_requires_a_chat_model() {
    let err = StudyAssistant::builder()
        .embedding_provider(Arc::new(WordHashEmbedder))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .await
        .err()
        .expect("missing chat model must fail");
    assert!(matches!(err, RagError::ConfigError(_)));
}

// ── Real PDF files ──────────────────────────────────────────────────

/// Write a PDF with one page per entry; `None` produces a page without text.
fn write_pdf(path: &Path, pages: &[Option<&str>]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => Vec::new(),
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn pdf_pages_are_numbered_from_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bio.pdf");
    write_pdf(&path, &[Some(MITOCHONDRIA), None]);

    let pages = PdfPageExtractor::new().extract_pages(&path).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].number, 1);
    assert_eq!(pages[0].text.as_deref(), Some(MITOCHONDRIA));
    assert_eq!(pages[1].number, 2);
    assert!(pages[1].indexable_text().is_none());
}

#[tokio::test]
async fn real_pdf_is_ingested_into_persistent_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bio.pdf");
    write_pdf(&path, &[Some(MITOCHONDRIA), None]);
    let store_dir = dir.path().join("db");

    let chat = Arc::new(CannedChat::replying("It's the cell's energy producer."));
    let assistant = StudyAssistant::builder()
        .embedding_provider(Arc::new(WordHashEmbedder))
        .vector_store(Arc::new(FileVectorStore::open(&store_dir).await.unwrap()))
        .chat_model(chat.clone())
        .build()
        .await
        .unwrap();

    let report = assistant.ingest_pdf(&path).await.unwrap();
    assert_eq!(report.chunk_ids, vec!["bio.pdf_page_1"]);
    assert_eq!(report.pages_skipped, 1);
    drop(assistant);

    // A fresh process sees the page that was ingested before.
    let reopened = StudyAssistant::builder()
        .embedding_provider(Arc::new(WordHashEmbedder))
        .vector_store(Arc::new(FileVectorStore::open(&store_dir).await.unwrap()))
        .chat_model(chat)
        .build()
        .await
        .unwrap();
    assert_eq!(reopened.indexed_pages().await.unwrap(), 1);
    let context = reopened.retrieve_context("What is the mitochondria?", 1).await.unwrap();
    assert_eq!(context, "(Page 1 - bio.pdf): The mitochondria is the powerhouse of the cell.");

    let answer = reopened.answer_question_with("What is the mitochondria?", 1).await.unwrap();
    assert_eq!(answer.text, "It's the cell's energy producer.");
}
