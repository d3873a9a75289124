use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::graph::state::{AgentState, Message};
use crate::llm::{ChainError, ChainInput, QaChain};

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("State has no trailing user message to answer")]
    NoQuestion,
    #[error(transparent)]
    Chain(#[from] ChainError),
}

#[async_trait]
pub trait Node: Send + Sync {
    async fn run(&self, state: AgentState) -> Result<AgentState, NodeError>;
}

/// Answers the newest user message through the retrieval chain and appends
/// the reply as an assistant turn.
pub struct AgentNode {
    chain: Arc<dyn QaChain>,
}

impl AgentNode {
    pub fn new(chain: Arc<dyn QaChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl Node for AgentNode {
    async fn run(&self, mut state: AgentState) -> Result<AgentState, NodeError> {
        let question = state.latest_question().ok_or(NodeError::NoQuestion)?.to_string();
        let input = ChainInput {
            question,
            chat_history: state.history_pairs(),
        };

        let output = self.chain.invoke(input).await?;
        state.messages.push(Message::Assistant(output.answer));
        state.sources = output.source_documents;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::state::StepOutcome;
    use crate::llm::ChainOutput;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChain {
        inputs: Mutex<Vec<ChainInput>>,
    }

    #[async_trait]
    impl QaChain for RecordingChain {
        async fn invoke(&self, input: ChainInput) -> Result<ChainOutput, ChainError> {
            let answer = format!("answer to {}", input.question);
            self.inputs.lock().unwrap().push(input);
            Ok(ChainOutput {
                answer,
                source_documents: vec![],
            })
        }
    }

    #[tokio::test]
    async fn appends_assistant_turn() {
        let chain = Arc::new(RecordingChain::default());
        let node = AgentNode::new(chain.clone());

        let state = node.run(AgentState::new("Who signed?")).await.unwrap();
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.outcome(), StepOutcome::Answered("answer to Who signed?".into()));

        let inputs = chain.inputs.lock().unwrap();
        assert_eq!(inputs[0].question, "Who signed?");
        assert!(inputs[0].chat_history.is_empty());
    }

    #[tokio::test]
    async fn passes_prior_user_turns_as_history() {
        let chain = Arc::new(RecordingChain::default());
        let node = AgentNode::new(chain.clone());

        let mut state = AgentState::new("first");
        state.messages.push(Message::Assistant("one".into()));
        state.messages.push(Message::User("second".into()));
        node.run(state).await.unwrap();

        let inputs = chain.inputs.lock().unwrap();
        assert_eq!(inputs[0].question, "second");
        assert_eq!(inputs[0].chat_history, vec![("first".to_string(), String::new())]);
    }

    #[tokio::test]
    async fn refuses_state_without_question() {
        let node = AgentNode::new(Arc::new(RecordingChain::default()));
        let mut state = AgentState::new("q");
        state.messages.push(Message::Assistant("a".into()));

        assert!(matches!(node.run(state).await, Err(NodeError::NoQuestion)));
    }
}
