use std::sync::Arc;

use crate::database::{ScoredDocument, VectorDBError, VectorStore};
use crate::providers::traits::{EmbeddingError, EmbeddingProvider};

#[derive(thiserror::Error, Debug)]
pub enum RetrievalError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    VectorStore(#[from] VectorDBError),
}

/// Embeds a query and looks up its nearest chunks.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>, top_k: usize) -> Self {
        Self {
            embedder,
            store,
            top_k: top_k.max(1),
        }
    }

    pub async fn get_relevant_documents(&self, query: &str) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let query_embedding = self.embedder.embed_query(query).await?;
        let results = self.store.similarity_search(&query_embedding, self.top_k).await?;
        log::debug!("Retrieved {} chunks for {:?}", results.len(), query);
        Ok(results)
    }
}
