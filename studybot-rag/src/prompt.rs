//! The StudyBot tutoring prompt.

/// Build the prompt sent to the chat model.
///
/// Places the retrieved `context` block and the user's `question` into the
/// fixed StudyBot template. Pure: the same inputs always give the same prompt.
pub fn compose_prompt(context: &str, question: &str) -> String {
    format!(
        "\
You are StudyBot, an educational chatbot using Retrieval-Augmented Generation (RAG) to help users learn from unstructured documents (PDFs, textbooks, articles).

Retrieved Context:
{context}

User Question:
{question}

Guidelines:
- Retrieve information and cite sources (page numbers, file names).
- Summarize or explain concepts simply.
- Offer quizzes, flashcards, or mnemonics if relevant.
- Keep responses motivational and engaging.
- Ask the user what they'd like to do next (e.g., \"Quiz or summary next?\").

Now respond to the user.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_context_and_question() {
        let prompt = compose_prompt("(Page 1 - bio.pdf): Cells.", "What is a cell?");
        assert!(prompt.starts_with("You are StudyBot"));
        assert!(prompt.contains("Retrieved Context:\n(Page 1 - bio.pdf): Cells.\n"));
        assert!(prompt.contains("User Question:\nWhat is a cell?\n"));
        assert!(prompt.trim_end().ends_with("Now respond to the user."));
    }

    #[test]
    fn guidelines_ask_for_citations_and_follow_up() {
        let prompt = compose_prompt("", "q");
        assert!(prompt.contains("cite sources"));
        assert!(prompt.contains("quizzes"));
        assert!(prompt.contains("Quiz or summary next?"));
    }

    #[test]
    fn braces_in_inputs_are_kept_verbatim() {
        let prompt = compose_prompt("{context}", "{question}");
        assert!(prompt.contains("Retrieved Context:\n{context}\n"));
        assert!(prompt.contains("User Question:\n{question}\n"));
    }
}
