use thiserror::Error;

use crate::database::VectorDBError;
use crate::document::DocumentError;
use crate::graph::GraphError;
use crate::llm::embeddings::IndexError;
use crate::qa_log::LogError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
    #[error("Indexing error: {0}")]
    Index(#[from] IndexError),
    #[error("Vector database error: {0}")]
    VectorDB(#[from] VectorDBError),
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("Log error: {0}")]
    Log(#[from] LogError),
}
