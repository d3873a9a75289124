pub mod memory_store;
pub mod qdrant_config;
pub mod vector_db;

pub use memory_store::InMemoryVectorStore;
pub use vector_db::{QdrantVectorStore, ScoredDocument, VectorDBError, VectorStore};
