use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ragassist_cli::{AppConfig, TerminalInput, bootstrap, run_loop};
use ragassist_model::EnvCredentials;
use ragassist_rag::load_documents;
use ragassist_telemetry::{LogConfig, init_logging};
use tracing::{error, info};

const KEY_GUIDANCE: &str = "Make sure you have set up your .env file with at least one API key:
- OPENAI_API_KEY (OpenAI GPT models)
- GROQ_API_KEY (Groq Llama models)
- GOOGLE_API_KEY (Google Gemini models)";

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();
    let config = AppConfig::parse();

    let _guard = match init_logging(&LogConfig::new(&config.log_dir)) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e}");
            None
        }
    };

    println!("Initializing RAG Assistant...");
    let assistant = match bootstrap(&config, &EnvCredentials).await {
        Ok(assistant) => assistant,
        Err(e) => {
            error!(error = %e, "startup failed");
            eprintln!("Error running RAG assistant: {e:#}");
            eprintln!("{KEY_GUIDANCE}");
            return ExitCode::FAILURE;
        }
    };

    match session(&config, &assistant).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session failed");
            eprintln!("Error running RAG assistant: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn session(config: &AppConfig, assistant: &ragassist_agent::RagAssistant) -> Result<()> {
    println!("\nLoading documents...");
    let documents = load_documents(&config.data_dir)
        .with_context(|| format!("loading documents from {}", config.data_dir.display()))?;
    let chunks = assistant.add_documents(&documents).await?;
    println!("Loaded {} documents", documents.len());
    info!(documents = documents.len(), chunks = chunks.len(), "documents indexed");

    println!("Welcome to the RAG-based AI Assistant! Type 'exit' to quit.");
    let mut input = TerminalInput::new()?;
    let mut stdout = std::io::stdout();
    run_loop(&mut input, assistant, config.on_error, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}
