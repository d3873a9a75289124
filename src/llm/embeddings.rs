use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

use crate::database::{VectorDBError, VectorStore};
use crate::document::Document;
use crate::providers::traits::{EmbeddingError, EmbeddingProvider};

pub const DEFAULT_BATCH_SIZE: usize = 32;

#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    VectorStore(#[from] VectorDBError),
}

pub struct EmbeddingGenerator {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    show_progress: bool,
}

impl EmbeddingGenerator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: true,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub async fn generate_batch_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let embeddings = self.provider.embed_documents(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        Ok(embeddings)
    }

    /// Embeds every chunk and adds it to `store`, one batch at a time.
    /// Returns the number of chunks indexed.
    pub async fn index_documents(
        &self,
        documents: &[Document],
        store: &dyn VectorStore,
    ) -> Result<usize, IndexError> {
        let pb = if self.show_progress {
            let pb = ProgressBar::new(documents.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:30} {pos}/{len} {msg}")
            {
                pb.set_style(style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(format!("embedding with {}", self.provider.model_name()));

        for batch in documents.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
            let embeddings = self.generate_batch_embeddings(&texts).await?;
            store.add_documents(batch, embeddings).await?;
            pb.inc(batch.len() as u64);
        }

        pb.finish_and_clear();
        log::info!("Indexed {} chunks", documents.len());
        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryVectorStore;
    use crate::providers::HashingEmbedder;
    use async_trait::async_trait;

    struct ShortEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ShortEmbedder {
        async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(vec![vec![1.0]])
        }

        fn model_name(&self) -> &str {
            "short"
        }
    }

    fn docs(n: usize) -> Vec<Document> {
        (0..n).map(|i| Document::new(format!("clause {}", i), "c.pdf", i)).collect()
    }

    #[tokio::test]
    async fn indexes_all_documents_across_batches() {
        let store = InMemoryVectorStore::new();
        let generator = EmbeddingGenerator::new(Arc::new(HashingEmbedder::new(16)))
            .with_batch_size(2)
            .quiet();

        let indexed = generator.index_documents(&docs(5), &store).await.unwrap();
        assert_eq!(indexed, 5);
        assert_eq!(store.len().unwrap(), 5);
    }

    #[tokio::test]
    async fn short_provider_response_is_an_error() {
        let store = InMemoryVectorStore::new();
        let generator = EmbeddingGenerator::new(Arc::new(ShortEmbedder)).quiet();

        let err = generator.index_documents(&docs(3), &store).await.unwrap_err();
        assert!(matches!(
            err,
            IndexError::Embedding(EmbeddingError::CountMismatch { expected: 3, actual: 1 })
        ));
        assert!(store.is_empty().unwrap());
    }
}
