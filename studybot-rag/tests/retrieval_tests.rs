//! Context retrieval: bounded, ordered, and rendered as citation lines.

mod common;

use std::sync::Arc;

use common::{CannedChat, StaticPages, assistant_with, pdf_path};
use proptest::prelude::*;
use studybot_rag::Page;

const TOPICS: [&str; 6] = [
    "Mitochondria produce energy for the cell.",
    "Photosynthesis turns light into chemical energy.",
    "The French Revolution began in 1789.",
    "Newton's second law relates force and acceleration.",
    "Enzymes lower the activation energy of reactions.",
    "Plate tectonics explains earthquakes and mountains.",
];

fn library() -> StaticPages {
    let pages: Vec<Page> = TOPICS.iter().zip(1u32..).map(|(t, n)| Page::new(n, *t)).collect();
    StaticPages::new()
        .with_document("science.pdf", pages[..4].to_vec())
        .with_document("extra.pdf", pages[4..].to_vec())
}

/// Split `(Page <n> - <source>): <text>` into its parts.
fn parse_entry(entry: &str) -> Option<(u32, &str, &str)> {
    let rest = entry.strip_prefix("(Page ")?;
    let (page, rest) = rest.split_once(" - ")?;
    let (source, text) = rest.split_once("): ")?;
    Some((page.parse().ok()?, source, text))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn context_has_at_most_k_well_formed_entries(
        query in "[a-z]{3,10}( [a-z]{3,10}){0,4}",
        top_k in 1usize..10,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (context, results) = rt.block_on(async {
            let (assistant, _) =
                assistant_with(library(), Arc::new(CannedChat::replying("ok"))).await;
            assistant.ingest_pdf(&pdf_path("science.pdf")).await.unwrap();
            assistant.ingest_pdf(&pdf_path("extra.pdf")).await.unwrap();
            let results = assistant.retrieve(&query, top_k).await.unwrap();
            let context = assistant.retrieve_context(&query, top_k).await.unwrap();
            (context, results)
        });

        let entries: Vec<&str> = context.split("\n\n").collect();
        prop_assert!(entries.len() <= top_k);
        prop_assert_eq!(entries.len(), results.len());

        for (entry, result) in entries.iter().zip(results.results()) {
            let (page, source, text) = parse_entry(entry).expect("well-formed entry");
            prop_assert_eq!(page, result.chunk.metadata.page);
            prop_assert_eq!(source, result.chunk.metadata.source.as_str());
            prop_assert_eq!(text, result.chunk.text.as_str());
        }
    }
}

#[tokio::test]
async fn best_match_comes_first() {
    let (assistant, _) = assistant_with(library(), Arc::new(CannedChat::replying("ok"))).await;
    assistant.ingest_pdf(&pdf_path("science.pdf")).await.unwrap();
    assistant.ingest_pdf(&pdf_path("extra.pdf")).await.unwrap();

    let context = assistant.retrieve_context("When did the French Revolution begin?", 2).await.unwrap();

    let first = context.split("\n\n").next().unwrap();
    assert_eq!(first, "(Page 3 - science.pdf): The French Revolution began in 1789.");
}

#[tokio::test]
async fn empty_store_gives_empty_context() {
    let (assistant, _) = assistant_with(StaticPages::new(), Arc::new(CannedChat::replying("ok"))).await;

    let context = assistant.retrieve_context("anything", 3).await.unwrap();

    assert_eq!(context, "");
}

#[tokio::test]
async fn zero_top_k_gives_empty_context() {
    let (assistant, _) = assistant_with(library(), Arc::new(CannedChat::replying("ok"))).await;
    assistant.ingest_pdf(&pdf_path("science.pdf")).await.unwrap();

    assert!(assistant.retrieve("energy", 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn default_top_k_is_three() {
    let (assistant, _) = assistant_with(library(), Arc::new(CannedChat::replying("ok"))).await;
    assistant.ingest_pdf(&pdf_path("science.pdf")).await.unwrap();
    assistant.ingest_pdf(&pdf_path("extra.pdf")).await.unwrap();

    assert_eq!(assistant.top_k(), 3);
    let answer = assistant.answer_question("energy").await.unwrap();
    assert_eq!(answer.context.len(), 3);
}
