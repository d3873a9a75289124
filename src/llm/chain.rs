use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::document::Document;
use crate::llm::prompts::{condense_question_prompt, qa_system_prompt};
use crate::llm::retriever::{RetrievalError, Retriever};
use crate::providers::traits::{ChatError, ChatMessage, CompletionProvider};

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("Generation failed: {0}")]
    Generation(#[from] ChatError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainInput {
    pub question: String,
    /// Prior `(human, ai)` turns, oldest first.
    pub chat_history: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOutput {
    pub answer: String,
    pub source_documents: Vec<Document>,
}

/// Question in, grounded answer out.
#[async_trait]
pub trait QaChain: Send + Sync {
    async fn invoke(&self, input: ChainInput) -> Result<ChainOutput, ChainError>;
}

/// Retrieval-augmented chain: optionally condenses the question against the
/// chat history, retrieves the nearest chunks and "stuffs" them into a single
/// answering prompt.
pub struct ConversationalRetrievalChain {
    llm: Arc<dyn CompletionProvider>,
    retriever: Retriever,
}

impl ConversationalRetrievalChain {
    pub fn from_llm(llm: Arc<dyn CompletionProvider>, retriever: Retriever) -> Self {
        Self { llm, retriever }
    }

    async fn standalone_question(&self, input: &ChainInput) -> Result<String, ChatError> {
        if input.chat_history.is_empty() {
            return Ok(input.question.clone());
        }

        let prompt = condense_question_prompt(&input.question, &input.chat_history);
        let condensed = self.llm.complete(&[ChatMessage::user(prompt)]).await?;
        log::debug!("Condensed {:?} into {:?}", input.question, condensed);
        Ok(condensed.trim().to_string())
    }
}

#[async_trait]
impl QaChain for ConversationalRetrievalChain {
    async fn invoke(&self, input: ChainInput) -> Result<ChainOutput, ChainError> {
        let question = self.standalone_question(&input).await?;

        let source_documents: Vec<Document> = self
            .retriever
            .get_relevant_documents(&question)
            .await?
            .into_iter()
            .map(|scored| scored.document)
            .collect();

        let messages = [
            ChatMessage::system(qa_system_prompt(&source_documents)),
            ChatMessage::user(question),
        ];
        let answer = self.llm.complete(&messages).await?;

        Ok(ChainOutput {
            answer,
            source_documents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InMemoryVectorStore, VectorStore};
    use crate::providers::traits::{ChatRole, EmbeddingProvider};
    use crate::providers::HashingEmbedder;
    use std::sync::Mutex;

    /// Records every call and answers with a canned reply per call.
    struct ScriptedLlm {
        replies: Mutex<Vec<String>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedLlm {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedLlm {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies.lock().unwrap().pop().ok_or(ChatError::EmptyResponse)
        }

        fn get_model_info(&self) -> String {
            "scripted".to_string()
        }
    }

    async fn retriever() -> Retriever {
        let embedder = Arc::new(HashingEmbedder::default());
        let store = Arc::new(InMemoryVectorStore::new());
        let docs = vec![
            Document::new("Invoices are payable within thirty days of receipt.", "c.pdf", 0),
            Document::new("This agreement is signed by Acme Corp and Globex Ltd.", "c.pdf", 1),
        ];
        let texts: Vec<String> = docs.iter().map(|d| d.content.clone()).collect();
        store
            .add_documents(&docs, embedder.embed_documents(&texts).await.unwrap())
            .await
            .unwrap();
        Retriever::new(embedder, store, 1)
    }

    #[tokio::test]
    async fn answers_from_retrieved_context_without_condensing() {
        let llm = Arc::new(ScriptedLlm::new(&["Thirty days."]));
        let chain = ConversationalRetrievalChain::from_llm(llm.clone(), retriever().await);

        let output = chain
            .invoke(ChainInput {
                question: "When are invoices payable?".to_string(),
                chat_history: vec![],
            })
            .await
            .unwrap();

        assert_eq!(output.answer, "Thirty days.");
        assert_eq!(output.source_documents.len(), 1);
        assert_eq!(output.source_documents[0].page, 0);

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, ChatRole::System);
        assert!(calls[0][0].content.contains("payable within thirty days"));
        assert_eq!(calls[0][1].content, "When are invoices payable?");
    }

    #[tokio::test]
    async fn history_triggers_a_condense_call() {
        let llm = Arc::new(ScriptedLlm::new(&[
            "  Who signed the agreement?  ",
            "Acme Corp and Globex Ltd.",
        ]));
        let chain = ConversationalRetrievalChain::from_llm(llm.clone(), retriever().await);

        let output = chain
            .invoke(ChainInput {
                question: "And who signed it?".to_string(),
                chat_history: vec![("What are the payment terms?".to_string(), String::new())],
            })
            .await
            .unwrap();

        assert_eq!(output.answer, "Acme Corp and Globex Ltd.");
        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[0][0].content.contains("Human: What are the payment terms?"));
        assert_eq!(calls[1][1].content, "Who signed the agreement?");
        assert_eq!(output.source_documents[0].page, 1);
    }

    #[tokio::test]
    async fn llm_failure_propagates() {
        let llm = Arc::new(ScriptedLlm::new(&[]));
        let chain = ConversationalRetrievalChain::from_llm(llm, retriever().await);

        let err = chain
            .invoke(ChainInput {
                question: "Anything?".to_string(),
                chat_history: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Generation(ChatError::EmptyResponse)));
    }
}
