//! Prompt templates for the conversational retrieval chain.

use crate::document::Document;

macro_rules! condense_question_template {
    () => {
        "Given the following conversation and a follow up question, \
rephrase the follow up question to be a standalone question, in its original language.\n\n\
Chat History:\n{chat_history}\nFollow Up Input: {question}\nStandalone question:"
    };
}

pub const QA_SYSTEM_TEMPLATE: &str = "Use the following pieces of context to answer the user's question. \n\
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
----------------\n{context}";

/// Renders `(human, ai)` turns the way the condense prompt expects them.
pub fn format_chat_history(chat_history: &[(String, String)]) -> String {
    chat_history
        .iter()
        .map(|(human, ai)| format!("\nHuman: {}\nAssistant: {}", human, ai))
        .collect()
}

pub fn condense_question_prompt(question: &str, chat_history: &[(String, String)]) -> String {
    format!(
        condense_question_template!(),
        chat_history = format_chat_history(chat_history),
        question = question
    )
}

pub fn qa_system_prompt(documents: &[Document]) -> String {
    let context = documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    QA_SYSTEM_TEMPLATE.replace("{context}", &context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_rendered_as_human_assistant_turns() {
        let history = vec![("Who signed?".to_string(), String::new())];
        assert_eq!(format_chat_history(&history), "\nHuman: Who signed?\nAssistant: ");
    }

    #[test]
    fn condense_prompt_embeds_question() {
        let prompt = condense_question_prompt("And the fees?", &[]);
        assert!(prompt.ends_with("Follow Up Input: And the fees?\nStandalone question:"));
    }

    #[test]
    fn placeholders_in_history_are_left_alone() {
        let history = vec![("What does {question} mean here?".to_string(), String::new())];
        let prompt = condense_question_prompt("And the fees?", &history);
        assert!(prompt.contains("Human: What does {question} mean here?"));
        assert_eq!(prompt.matches("And the fees?").count(), 1);
    }

    #[test]
    fn qa_prompt_joins_context_blocks() {
        let docs = vec![
            Document::new("First clause.", "c.pdf", 0),
            Document::new("Second clause.", "c.pdf", 1),
        ];
        assert!(qa_system_prompt(&docs).ends_with("----------------\nFirst clause.\n\nSecond clause."));
    }
}
