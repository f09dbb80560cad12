//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use studybot_rag::StudyBotConfigBuilder;

/// StudyBot: ask questions about your PDFs.
#[derive(Parser, Debug)]
#[command(name = "studybot", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the knowledge base
    #[arg(long, global = true, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Groq chat model identifier
    #[arg(long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Number of pages retrieved per question
    #[arg(long, global = true, value_name = "K")]
    pub top_k: Option<usize>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add PDFs to the knowledge base
    Ingest {
        #[arg(required = true, value_name = "PDF")]
        files: Vec<PathBuf>,
    },
    /// Answer a single question and exit
    Ask {
        #[arg(required = true, value_name = "QUESTION")]
        question: Vec<String>,

        /// Print the retrieved pages before the answer
        #[arg(long)]
        show_context: bool,
    },
    /// Interactive session (default)
    Chat,
}

/// The words of an `ask` question joined by spaces, or `None` if they hold no text.
pub fn question_text(words: &[String]) -> Option<String> {
    let question = words.join(" ");
    let question = question.trim();
    (!question.is_empty()).then(|| question.to_string())
}

impl Cli {
    /// The selected subcommand, falling back to [`Command::Chat`].
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }

    /// Overlay the flags that were given on top of `builder`.
    pub fn apply(&self, mut builder: StudyBotConfigBuilder) -> StudyBotConfigBuilder {
        if let Some(dir) = &self.store_dir {
            builder = builder.store_dir(dir.clone());
        }
        if let Some(model) = &self.model {
            builder = builder.model(model.clone());
        }
        if let Some(k) = self.top_k {
            builder = builder.top_k(k);
        }
        builder
    }
}
