use anyhow::Context;
use clap::Parser;
use studybot_cli::cli::question_text;
use studybot_cli::shell::{self, EMPTY_QUESTION, ingested_message};
use studybot_cli::telemetry::init_tracing;
use studybot_cli::{Cli, Command};
use studybot_rag::{DocumentIngestor, StudyAssistant, StudyBotConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = cli
        .apply(StudyBotConfig::builder_from_env())
        .build()
        .context("invalid StudyBot configuration")?;
    info!(model = %config.model, store_dir = %config.store_dir.display(), "starting StudyBot");

    match cli.command() {
        Command::Ingest { files } => {
            // No API key is required for ingestion.
            let ingestor = DocumentIngestor::open(&config).await.with_context(|| {
                format!("failed to open knowledge base in {}", config.store_dir.display())
            })?;
            for file in files {
                let report = ingestor
                    .ingest(&file)
                    .await
                    .with_context(|| format!("failed to ingest {}", file.display()))?;
                println!("{}", ingested_message(&report));
            }
        }
        Command::Ask { question, show_context } => {
            let Some(question) = question_text(&question) else {
                println!("{EMPTY_QUESTION}");
                return Ok(());
            };
            let assistant = StudyAssistant::open(&config).await.context("failed to start StudyBot")?;
            let answer = assistant.answer_question(&question).await?;
            if show_context {
                println!("{}\n", answer.context);
            }
            println!("StudyBot: {}", answer.text);
        }
        Command::Chat => {
            let assistant = StudyAssistant::open(&config).await.context("failed to start StudyBot")?;
            shell::run(&assistant).await?;
        }
    }
    Ok(())
}
