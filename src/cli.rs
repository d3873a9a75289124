use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K};
use crate::qa_log::DEFAULT_LOG_PATH;

pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "Does this contract include a termination clause?",
    "What are the payment terms?",
    "Who are the signing parties?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbedderKind {
    Openai,
    Hashing,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "contract-qa",
    version,
    about = "Answer questions about a contract PDF with retrieval-augmented generation"
)]
pub struct Args {
    /// Path to contract PDF
    #[arg(long)]
    pub pdf: PathBuf,

    /// Path to save Q&A log
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    pub log: PathBuf,

    /// List of questions to ask
    #[arg(long, num_args = 1..)]
    pub questions: Vec<String>,

    /// Number of chunks retrieved per question
    #[arg(long, env = "CONTRACT_QA_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Maximum words per indexed chunk
    #[arg(long, env = "CONTRACT_QA_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Index into Qdrant instead of memory
    #[arg(long, env = "QDRANT_URL")]
    pub qdrant_url: Option<String>,

    #[arg(long, value_enum, default_value_t = EmbedderKind::Openai)]
    pub embedder: EmbedderKind,

    /// OpenAI API key (falls back to OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Keep going when a question fails instead of aborting the run
    #[arg(long)]
    pub skip_failures: bool,

    /// Print the pages each answer was grounded on
    #[arg(long)]
    pub show_sources: bool,
}

impl Args {
    /// Questions from the command line, or the defaults when none were given.
    pub fn questions(&self) -> Vec<String> {
        if self.questions.is_empty() {
            DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
        } else {
            self.questions.clone()
        }
    }
}
