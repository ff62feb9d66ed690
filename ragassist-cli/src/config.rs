//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ragassist_rag::RagConfig;
use ragassist_rag::fastembed::DEFAULT_EMBEDDING_MODEL;

/// What the interactive loop does when answering a question fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ErrorPolicy {
    /// Report the error and end the session.
    #[default]
    Terminate,
    /// Report the error and prompt for the next question.
    Continue,
}

/// Ask questions about a folder of text and markdown documents.
///
/// Every option can also be set through the environment variable shown, or in
/// a `.env` file in the working directory. The language model is chosen from
/// whichever of OPENAI_API_KEY, GROQ_API_KEY, or GOOGLE_API_KEY is set first.
#[derive(Parser, Debug, Clone)]
#[command(name = "ragassist", version, about)]
pub struct AppConfig {
    /// Directory of .txt and .md documents to load
    #[arg(long, value_name = "DIR", env = "DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Directory of the persistent vector database
    #[arg(long, value_name = "DIR", env = "VECTOR_DB_PATH", default_value = "./vector_db")]
    pub db_path: PathBuf,

    /// Vector collection holding the document chunks
    #[arg(long, value_name = "NAME", env = "COLLECTION_NAME", default_value = "rag_documents")]
    pub collection: String,

    /// Sentence-embedding model
    #[arg(long, value_name = "MODEL", env = "EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    pub embedding_model: String,

    /// YAML prompt template with {context} and {question} placeholders
    #[arg(
        long = "prompt",
        value_name = "FILE",
        env = "SYSTEM_PROMPT_PATH",
        default_value = "./configuration/system_prompt.yaml"
    )]
    pub prompt_path: PathBuf,

    /// Directory for daily log files
    #[arg(long, value_name = "DIR", env = "LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Number of chunks retrieved per question
    #[arg(long, value_name = "INT", env = "TOP_K", default_value_t = 3)]
    pub top_k: usize,

    /// Maximum chunk length in characters
    #[arg(long, value_name = "INT", env = "CHUNK_SIZE", default_value_t = 250)]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[arg(long, value_name = "INT", env = "CHUNK_OVERLAP", default_value_t = 100)]
    pub chunk_overlap: usize,

    /// Behaviour when a question cannot be answered
    #[arg(long, value_enum, env = "ON_ERROR", default_value_t = ErrorPolicy::Terminate)]
    pub on_error: ErrorPolicy,

    /// Clear the collection before loading documents
    #[arg(long)]
    pub reset: bool,
}

impl AppConfig {
    /// The validated retrieval settings.
    pub fn rag_config(&self) -> ragassist_rag::Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .collection(self.collection.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        AppConfig::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let config = AppConfig::try_parse_from([
            "ragassist",
            "--data-dir",
            "docs",
            "--top-k",
            "5",
            "--chunk-size",
            "400",
            "--chunk-overlap",
            "50",
            "--on-error",
            "continue",
            "--reset",
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("docs"));
        assert_eq!(config.on_error, ErrorPolicy::Continue);
        assert!(config.reset);

        let rag = config.rag_config().unwrap();
        assert_eq!((rag.chunk_size, rag.chunk_overlap, rag.top_k), (400, 50, 5));
    }

    #[test]
    fn inconsistent_chunking_is_rejected() {
        let config = AppConfig::try_parse_from([
            "ragassist",
            "--chunk-size",
            "100",
            "--chunk-overlap",
            "100",
        ])
        .unwrap();
        assert!(config.rag_config().is_err());
    }

    #[test]
    fn unknown_error_policy_is_a_parse_error() {
        assert!(AppConfig::try_parse_from(["ragassist", "--on-error", "retry"]).is_err());
    }
}
