use std::path::Path;
use std::sync::Arc;

use crate::database::VectorStore;
use crate::document::{create_chunks, DocumentLoader};
use crate::error::PipelineError;
use crate::graph::{AgentNode, CompiledGraph, GraphError, StateGraph};
use crate::llm::{EmbeddingGenerator, QaChain};
use crate::qa_log::write_log;
use crate::runner::{BatchRunner, RunReport};

pub const AGENT_NODE: &str = "agent";

/// One node, which is both entry and finish.
pub fn build_graph(chain: Arc<dyn QaChain>) -> Result<CompiledGraph, GraphError> {
    let mut graph = StateGraph::new();
    graph.add_node(AGENT_NODE, Arc::new(AgentNode::new(chain)))?;
    graph.set_entry_point(AGENT_NODE).set_finish_point(AGENT_NODE);
    graph.compile()
}

/// Loads `pdf`, splits it and fills `store`. Returns the number of chunks indexed.
pub async fn index_document(
    loader: &dyn DocumentLoader,
    pdf: &Path,
    chunk_size: usize,
    generator: &EmbeddingGenerator,
    store: &dyn VectorStore,
) -> Result<usize, PipelineError> {
    let pages = loader.load(pdf)?;
    let chunks = create_chunks(&pages, chunk_size);
    log::info!("Split {} pages into {} chunks", pages.len(), chunks.len());
    Ok(generator.index_documents(&chunks, store).await?)
}

/// Asks every question, then writes the answers to `log_path` in one go.
/// Nothing is written if the run fails.
pub async fn answer_questions(
    runner: &BatchRunner,
    questions: &[String],
    log_path: &Path,
) -> Result<RunReport, PipelineError> {
    let report = runner.run(questions).await?;
    write_log(log_path, &report.entries)?;
    Ok(report)
}
