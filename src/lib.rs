pub mod cli;
pub mod config;
pub mod database;
pub mod diagram;
pub mod document;
pub mod error;
pub mod graph;
pub mod llm;
pub mod pipeline;
pub mod providers;
pub mod qa_log;
pub mod runner;

// Re-export commonly used items
pub use error::PipelineError;
pub use graph::{AgentState, Message, StepOutcome};
pub use llm::{ConversationalRetrievalChain, QaChain};
pub use runner::{BatchRunner, FailurePolicy};
