//! The `studybot` command-line study assistant.
//!
//! Upload PDFs, ask questions about them, and get answers grounded in the
//! pages that were retrieved.

pub mod cli;
pub mod shell;
pub mod telemetry;

pub use cli::{Cli, Command};
pub use shell::{Flow, ShellCommand};
