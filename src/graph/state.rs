use serde::{Deserialize, Serialize};

use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Message {
    User(String),
    Assistant(String),
}

impl Message {
    pub fn content(&self) -> &str {
        match self {
            Message::User(content) | Message::Assistant(content) => content,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }
}

/// Result of running one question through the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Answered(String),
    NoAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<Message>,
    pub action: String,
    /// Chunks the latest answer was grounded on.
    #[serde(default)]
    pub sources: Vec<Document>,
}

impl AgentState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::User(question.into())],
            action: "init".to_string(),
            sources: Vec::new(),
        }
    }

    /// The newest message, if it is a user turn.
    pub fn latest_question(&self) -> Option<&str> {
        match self.messages.last() {
            Some(Message::User(question)) => Some(question),
            _ => None,
        }
    }

    /// Earlier user turns as `(question, "")` pairs; the newest message is excluded.
    pub fn history_pairs(&self) -> Vec<(String, String)> {
        let Some((_, earlier)) = self.messages.split_last() else {
            return Vec::new();
        };
        earlier
            .iter()
            .filter(|m| m.is_user())
            .map(|m| (m.content().to_string(), String::new()))
            .collect()
    }

    pub fn outcome(&self) -> StepOutcome {
        match self.messages.last() {
            Some(Message::Assistant(answer)) => StepOutcome::Answered(answer.clone()),
            _ => StepOutcome::NoAnswer,
        }
    }
}
