use async_trait::async_trait;
use std::sync::RwLock;

use crate::database::vector_db::{ScoredDocument, VectorDBError, VectorStore};
use crate::document::Document;

/// Brute-force cosine index held in process memory. Lives for one run.
#[derive(Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<(Document, Vec<f32>)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, VectorDBError> {
        self.entries
            .read()
            .map(|e| e.len())
            .map_err(|e| VectorDBError::Operation(format!("Lock error: {}", e)))
    }

    pub fn is_empty(&self) -> Result<bool, VectorDBError> {
        Ok(self.len()? == 0)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_documents(
        &self,
        documents: &[Document],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<(), VectorDBError> {
        if documents.len() != embeddings.len() {
            return Err(VectorDBError::LengthMismatch {
                documents: documents.len(),
                embeddings: embeddings.len(),
            });
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| VectorDBError::Operation(format!("Lock error: {}", e)))?;

        let expected = entries.first().map(|(_, v)| v.len()).or_else(|| embeddings.first().map(Vec::len));
        if let Some(expected) = expected {
            if let Some(bad) = embeddings.iter().find(|v| v.len() != expected) {
                return Err(VectorDBError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        entries.extend(documents.iter().cloned().zip(embeddings));
        Ok(())
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, VectorDBError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| VectorDBError::Operation(format!("Lock error: {}", e)))?;

        if let Some((_, first)) = entries.first() {
            if first.len() != query.len() {
                return Err(VectorDBError::DimensionMismatch {
                    expected: first.len(),
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<ScoredDocument> = entries
            .iter()
            .map(|(document, vector)| ScoredDocument {
                document: document.clone(),
                score: cosine_similarity(query, vector),
            })
            .collect();

        // Stable sort keeps insertion order among ties
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }
}
