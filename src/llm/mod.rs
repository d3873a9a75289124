pub mod chain;
pub mod embeddings;
pub mod prompts;
pub mod retriever;

pub use chain::{ChainError, ChainInput, ChainOutput, ConversationalRetrievalChain, QaChain};
pub use embeddings::EmbeddingGenerator;
pub use retriever::Retriever;
