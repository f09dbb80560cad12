//! The interactive StudyBot session.
//!
//! Each input line becomes a [`ShellCommand`], which [`execute`] runs against
//! the assistant. Failures are reported as warnings and the session goes on.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use studybot_rag::{IngestReport, StudyAssistant};
use tracing::debug;

/// Reply to a question that has no text.
pub const EMPTY_QUESTION: &str = "Please enter a question.";

const BANNER: &str = "\
📚 StudyBot: your AI study assistant
Upload a PDF with /upload <path>, then ask anything about it. Type /help for commands.";

const HELP: &str = "\
Commands:
  /upload <path>       add a PDF to the knowledge base
  /context <question>  show the pages that would be used to answer
  /help                show this message
  /quit, /exit         leave StudyBot
Anything else is sent to StudyBot as a question.";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// `/upload <path>`: ingest a PDF.
    Upload(PathBuf),
    /// `/context <question>`: show the retrieved pages without asking the model.
    Context(String),
    /// Any line not starting with `/`.
    Ask(String),
    /// `/help`.
    Help,
    /// `/quit` or `/exit`.
    Quit,
    /// Blank line, or a command that needs a question but got none.
    Empty,
    /// Unknown command or missing argument, with the message to show.
    Invalid(String),
}

impl ShellCommand {
    /// Interpret one input line. Surrounding whitespace is ignored and
    /// anything after the command name is its argument.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "upload" => {
                // Paths dragged into a terminal often arrive quoted.
                let path = arg.trim_matches(|c| c == '"' || c == '\'');
                if path.is_empty() {
                    Self::Invalid("Usage: /upload <path-to-pdf>".to_string())
                } else {
                    Self::Upload(PathBuf::from(path))
                }
            }
            "context" if arg.is_empty() => Self::Empty,
            "context" => Self::Context(arg.to_string()),
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("Unknown command /{other}. Type /help for commands.")),
        }
    }
}

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// The user asked to leave.
    Exit,
}

/// Confirmation printed after a PDF was ingested.
pub fn ingested_message(report: &IngestReport) -> String {
    format!(
        "✅ {} added to knowledge base! ({} pages indexed)",
        report.source,
        report.chunks_indexed()
    )
}

fn warning(err: &dyn Display) -> String {
    format!("⚠️ Error: {err}")
}

/// Run one command, writing everything the user sees to `out`.
pub async fn execute<W: Write>(
    assistant: &StudyAssistant,
    command: ShellCommand,
    out: &mut W,
) -> io::Result<Flow> {
    match command {
        ShellCommand::Empty => writeln!(out, "{EMPTY_QUESTION}")?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Invalid(message) => writeln!(out, "⚠️ {message}")?,
        ShellCommand::Quit => {
            writeln!(out, "Goodbye! Keep studying! 📚")?;
            return Ok(Flow::Exit);
        }
        ShellCommand::Upload(path) => match assistant.ingest_pdf(&path).await {
            Ok(report) => writeln!(out, "{}", ingested_message(&report))?,
            Err(err) => writeln!(out, "{}", warning(&err))?,
        },
        ShellCommand::Context(question) => {
            match assistant.retrieve_context(&question, assistant.top_k()).await {
                Ok(context) if context.is_empty() => {
                    writeln!(out, "No matching pages in the knowledge base yet.")?
                }
                Ok(context) => writeln!(out, "{context}")?,
                Err(err) => writeln!(out, "{}", warning(&err))?,
            }
        }
        ShellCommand::Ask(question) => match assistant.answer_question(&question).await {
            Ok(answer) => writeln!(out, "StudyBot: {}", answer.text)?,
            Err(err) => writeln!(out, "{}", warning(&err))?,
        },
    }
    Ok(Flow::Continue)
}

/// Read commands from the terminal until `/quit` or end of input.
pub async fn run(assistant: &StudyAssistant) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut stdout = io::stdout();
    writeln!(stdout, "{BANNER}")?;

    loop {
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.trim())?;
        }

        let command = ShellCommand::parse(&line);
        debug!(?command, "shell input");
        if execute(assistant, command, &mut stdout).await? == Flow::Exit {
            break;
        }
    }
    Ok(())
}
