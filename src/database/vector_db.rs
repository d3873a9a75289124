use async_trait::async_trait;
use thiserror::Error;
use qdrant_client::{
    qdrant::{
        point_id::PointIdOptions, value::Kind, with_payload_selector::SelectorOptions,
        CreateCollection, DeleteCollection, Distance, PointId, PointStruct, SearchPoints, UpsertPoints, Value,
        VectorParams, VectorsConfig, WithPayloadSelector,
    },
    Qdrant,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::database::qdrant_config::create_qdrant_client;
use crate::document::Document;

#[derive(Error, Debug)]
pub enum VectorDBError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Operation failed: {0}")]
    Operation(String),
    #[error("Got {embeddings} embeddings for {documents} documents")]
    LengthMismatch { documents: usize, embeddings: usize },
    #[error("Vector has dimension {actual}, store expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Nearest-neighbour index over embedded document chunks.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn add_documents(
        &self,
        documents: &[Document],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<(), VectorDBError>;

    /// Highest scoring documents first.
    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, VectorDBError>;
}

pub struct QdrantVectorStore {
    client: Arc<Qdrant>,
    collection_name: String,
    collection_ready: OnceCell<()>,
}

impl QdrantVectorStore {
    /// Connects and drops any collection left behind by an earlier run, so the
    /// store only ever holds chunks indexed by this process.
    pub async fn new(url: &str, collection_name: &str) -> Result<Self, VectorDBError> {
        let client = create_qdrant_client(url).await?;
        let store = Self {
            client: Arc::new(client),
            collection_name: collection_name.to_string(),
            collection_ready: OnceCell::new(),
        };
        store.drop_collection().await?;
        Ok(store)
    }

    fn delete_request(collection_name: &str) -> DeleteCollection {
        DeleteCollection {
            collection_name: collection_name.to_string(),
            ..Default::default()
        }
    }

    fn create_request(collection_name: &str, vector_size: u64) -> CreateCollection {
        let vectors_config = VectorParams {
            size: vector_size,
            distance: Distance::Cosine.into(),
            ..Default::default()
        };

        CreateCollection {
            collection_name: collection_name.to_string(),
            vectors_config: Some(VectorsConfig {
                config: Some(qdrant_client::qdrant::vectors_config::Config::Params(vectors_config)),
            }),
            ..Default::default()
        }
    }

    async fn drop_collection(&self) -> Result<(), VectorDBError> {
        match self
            .client
            .delete_collection(Self::delete_request(&self.collection_name))
            .await
        {
            Ok(_) => {
                log::info!("Cleared collection {}", self.collection_name);
                Ok(())
            }
            Err(e) if e.to_string().contains("Not found") || e.to_string().contains("doesn't exist") => Ok(()),
            Err(e) => Err(VectorDBError::Operation(e.to_string())),
        }
    }

    /// Sized from the first batch of embeddings.
    async fn create_collection(&self, vector_size: u64) -> Result<(), VectorDBError> {
        self.client
            .create_collection(Self::create_request(&self.collection_name, vector_size))
            .await
            .map_err(|e| VectorDBError::Operation(e.to_string()))?;
        log::info!("Created collection {} with {} dimensions", self.collection_name, vector_size);
        Ok(())
    }

    fn payload_for(document: &Document) -> HashMap<String, Value> {
        let mut payload = HashMap::new();
        payload.insert("text".to_string(), Value::from(document.content.clone()));
        payload.insert("source".to_string(), Value::from(document.source.clone()));
        payload.insert("page".to_string(), Value::from(document.page as i64));
        payload.insert("chunk".to_string(), Value::from(document.chunk_index as i64));
        payload
    }

    fn document_from(payload: &HashMap<String, Value>) -> Option<Document> {
        let string_field = |key: &str| match payload.get(key)?.kind.as_ref()? {
            Kind::StringValue(s) => Some(s.clone()),
            _ => None,
        };
        let int_field = |key: &str| match payload.get(key)?.kind.as_ref()? {
            Kind::IntegerValue(i) => usize::try_from(*i).ok(),
            _ => None,
        };

        Some(Document {
            content: string_field("text")?,
            source: string_field("source").unwrap_or_default(),
            page: int_field("page").unwrap_or_default(),
            chunk_index: int_field("chunk").unwrap_or_default(),
        })
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
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
        let Some(dimension) = embeddings.first().map(Vec::len) else {
            return Ok(());
        };

        self.collection_ready
            .get_or_try_init(|| self.create_collection(dimension as u64))
            .await?;

        let points = documents
            .iter()
            .zip(embeddings)
            .map(|(document, vector)| PointStruct {
                id: Some(PointId {
                    point_id_options: Some(PointIdOptions::Uuid(Uuid::new_v4().to_string())),
                }),
                vectors: Some(vector.into()),
                payload: Self::payload_for(document),
            })
            .collect();

        let upsert_points = UpsertPoints {
            collection_name: self.collection_name.clone(),
            wait: Some(true),
            points,
            ..Default::default()
        };

        self.client
            .upsert_points(upsert_points)
            .await
            .map_err(|e| VectorDBError::Operation(e.to_string()))?;

        Ok(())
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, VectorDBError> {
        let request = SearchPoints {
            collection_name: self.collection_name.clone(),
            vector: query.to_vec(),
            limit: k as u64,
            with_payload: Some(WithPayloadSelector {
                selector_options: Some(SelectorOptions::Enable(true)),
            }),
            ..Default::default()
        };

        let results = self
            .client
            .search_points(request)
            .await
            .map_err(|e| VectorDBError::Operation(e.to_string()))?;

        Ok(results
            .result
            .into_iter()
            .filter_map(|point| {
                let document = Self::document_from(&point.payload)?;
                Some(ScoredDocument {
                    document,
                    score: point.score,
                })
            })
            .collect())
    }
}
