use colored::Colorize;

use crate::graph::{AgentState, CompiledGraph, GraphError, StepOutcome};
use crate::qa_log::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failing question ends the run.
    #[default]
    Abort,
    /// Failing questions are reported and left out of the log.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub entries: Vec<LogEntry>,
    pub unanswered: Vec<String>,
    pub failed: Vec<String>,
}

/// Feeds each question through the compiled graph with a fresh state.
pub struct BatchRunner {
    graph: CompiledGraph,
    policy: FailurePolicy,
    show_sources: bool,
    echo: bool,
}

impl BatchRunner {
    pub fn new(graph: CompiledGraph) -> Self {
        Self {
            graph,
            policy: FailurePolicy::default(),
            show_sources: false,
            echo: true,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sources(mut self, show_sources: bool) -> Self {
        self.show_sources = show_sources;
        self
    }

    /// Suppress stdout; results are still collected.
    pub fn silent(mut self) -> Self {
        self.echo = false;
        self
    }

    pub async fn run(&self, questions: &[String]) -> Result<RunReport, GraphError> {
        let mut report = RunReport::default();

        for question in questions {
            if self.echo {
                println!("\n{}\n{}", "--- Question ---".bright_cyan(), question);
            }

            let state = match self.graph.invoke(AgentState::new(question.as_str())).await {
                Ok(state) => state,
                Err(e) => match self.policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => {
                        log::warn!("Skipping question {:?}: {}", question, e);
                        report.failed.push(question.clone());
                        continue;
                    }
                },
            };

            match state.outcome() {
                StepOutcome::Answered(answer) => {
                    let entry = LogEntry::new(question.as_str(), answer);
                    if self.echo {
                        println!("\n{}\n{}", "--- AI Response ---".bright_green(), entry.answer);
                        if self.show_sources {
                            for source in &state.sources {
                                println!("  {} {}", "source:".dimmed(), source);
                            }
                        }
                    }
                    report.entries.push(entry);
                }
                StepOutcome::NoAnswer => {
                    log::debug!("No assistant reply for {:?}", question);
                    report.unanswered.push(question.clone());
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AgentNode, Node, NodeError, StateGraph};
    use crate::llm::{ChainError, ChainInput, ChainOutput, QaChain};
    use crate::providers::ChatError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoChain;

    #[async_trait]
    impl QaChain for EchoChain {
        async fn invoke(&self, input: ChainInput) -> Result<ChainOutput, ChainError> {
            if input.question.contains("explode") {
                return Err(ChainError::Generation(ChatError::EmptyResponse));
            }
            Ok(ChainOutput {
                answer: input.question,
                source_documents: vec![],
            })
        }
    }

    /// Leaves the state untouched, so there is never an assistant turn.
    struct Mute;

    #[async_trait]
    impl Node for Mute {
        async fn run(&self, state: AgentState) -> Result<AgentState, NodeError> {
            Ok(state)
        }
    }

    fn graph_with(node: Arc<dyn Node>) -> CompiledGraph {
        let mut graph = StateGraph::new();
        graph.add_node("agent", node).unwrap();
        graph.set_entry_point("agent").set_finish_point("agent");
        graph.compile().unwrap()
    }

    fn questions(qs: &[&str]) -> Vec<String> {
        qs.iter().map(|q| q.to_string()).collect()
    }

    #[tokio::test]
    async fn entries_follow_question_order() {
        let runner = BatchRunner::new(graph_with(Arc::new(AgentNode::new(Arc::new(EchoChain))))).silent();
        let report = runner.run(&questions(&["one", "two", "three"])).await.unwrap();

        let asked: Vec<&str> = report.entries.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(asked, vec!["one", "two", "three"]);
        assert!(report.entries.iter().all(|e| e.question == e.answer));
    }

    #[tokio::test]
    async fn unanswered_questions_are_not_logged() {
        let runner = BatchRunner::new(graph_with(Arc::new(Mute))).silent();
        let report = runner.run(&questions(&["one", "two"])).await.unwrap();

        assert!(report.entries.is_empty());
        assert_eq!(report.unanswered, questions(&["one", "two"]));
    }

    #[tokio::test]
    async fn abort_policy_discards_everything() {
        let runner = BatchRunner::new(graph_with(Arc::new(AgentNode::new(Arc::new(EchoChain))))).silent();
        let result = runner.run(&questions(&["fine", "explode", "never asked"])).await;

        assert!(matches!(result, Err(GraphError::Node { .. })));
    }

    #[tokio::test]
    async fn skip_policy_keeps_going() {
        let runner = BatchRunner::new(graph_with(Arc::new(AgentNode::new(Arc::new(EchoChain)))))
            .with_policy(FailurePolicy::Skip)
            .silent();
        let report = runner.run(&questions(&["fine", "explode", "also fine"])).await.unwrap();

        let asked: Vec<&str> = report.entries.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(asked, vec!["fine", "also fine"]);
        assert_eq!(report.failed, questions(&["explode"]));
    }

    #[tokio::test]
    async fn empty_question_list_is_empty_report() {
        let runner = BatchRunner::new(graph_with(Arc::new(Mute))).silent();
        assert_eq!(runner.run(&[]).await.unwrap(), RunReport::default());
    }
}
