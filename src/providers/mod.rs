pub mod openai;
pub mod traits;
pub mod utils;

pub use openai::openai::OpenAIProvider;
pub use traits::{
    ChatError, ChatMessage, ChatRole, CompletionProvider, EmbeddingError, EmbeddingProvider,
};
pub use utils::HashingEmbedder;
