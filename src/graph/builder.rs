use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use crate::graph::node::{Node, NodeError};
use crate::graph::state::AgentState;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node {0} is already defined")]
    DuplicateNode(String),
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("Node {0} already has an outgoing edge")]
    DuplicateEdge(String),
    #[error("Graph has no entry point")]
    MissingEntryPoint,
    #[error("Graph has no finish point")]
    MissingFinishPoint,
    #[error("Finish point {finish} is not reachable from {entry}")]
    Unreachable { entry: String, finish: String },
    #[error("Node {node} failed: {source}")]
    Node {
        node: String,
        #[source]
        source: NodeError,
    },
}

#[derive(Default)]
pub struct StateGraph {
    nodes: HashMap<String, Arc<dyn Node>>,
    edges: HashMap<String, String>,
    entry_point: Option<String>,
    finish_point: Option<String>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, node: Arc<dyn Node>) -> Result<&mut Self, GraphError> {
        if self.nodes.contains_key(name) {
            return Err(GraphError::DuplicateNode(name.to_string()));
        }
        self.nodes.insert(name.to_string(), node);
        Ok(self)
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<&mut Self, GraphError> {
        if self.edges.contains_key(from) {
            return Err(GraphError::DuplicateEdge(from.to_string()));
        }
        self.edges.insert(from.to_string(), to.to_string());
        Ok(self)
    }

    pub fn set_entry_point(&mut self, name: &str) -> &mut Self {
        self.entry_point = Some(name.to_string());
        self
    }

    pub fn set_finish_point(&mut self, name: &str) -> &mut Self {
        self.finish_point = Some(name.to_string());
        self
    }

    /// Validates the wiring and resolves the execution path from entry to finish.
    pub fn compile(&self) -> Result<CompiledGraph, GraphError> {
        let entry = self.entry_point.clone().ok_or(GraphError::MissingEntryPoint)?;
        let finish = self.finish_point.clone().ok_or(GraphError::MissingFinishPoint)?;

        for name in [&entry, &finish]
            .into_iter()
            .chain(self.edges.keys())
            .chain(self.edges.values())
        {
            if !self.nodes.contains_key(name) {
                return Err(GraphError::UnknownNode(name.clone()));
            }
        }

        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = entry.clone();
        loop {
            if !visited.insert(current.clone()) {
                return Err(GraphError::Unreachable { entry, finish });
            }
            path.push((current.clone(), Arc::clone(&self.nodes[&current])));
            if current == finish {
                break;
            }
            match self.edges.get(&current) {
                Some(next) => current = next.clone(),
                None => return Err(GraphError::Unreachable { entry, finish }),
            }
        }

        Ok(CompiledGraph { path })
    }
}

/// An executable graph: the nodes from entry to finish in call order.
#[derive(Clone)]
pub struct CompiledGraph {
    path: Vec<(String, Arc<dyn Node>)>,
}

impl CompiledGraph {
    pub fn node_names(&self) -> Vec<&str> {
        self.path.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub async fn invoke(&self, mut state: AgentState) -> Result<AgentState, GraphError> {
        for (name, node) in &self.path {
            log::debug!("Entering node {}", name);
            state = node.run(state).await.map_err(|source| GraphError::Node {
                node: name.clone(),
                source,
            })?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::state::Message;
    use async_trait::async_trait;

    struct Tag(&'static str);

    #[async_trait]
    impl Node for Tag {
        async fn run(&self, mut state: AgentState) -> Result<AgentState, NodeError> {
            state.messages.push(Message::Assistant(self.0.to_string()));
            Ok(state)
        }
    }

    struct Refuse;

    #[async_trait]
    impl Node for Refuse {
        async fn run(&self, _state: AgentState) -> Result<AgentState, NodeError> {
            Err(NodeError::NoQuestion)
        }
    }

    #[tokio::test]
    async fn single_node_graph_runs_once() {
        let mut graph = StateGraph::new();
        graph.add_node("agent", Arc::new(Tag("done"))).unwrap();
        graph.set_entry_point("agent").set_finish_point("agent");
        let compiled = graph.compile().unwrap();

        assert_eq!(compiled.node_names(), vec!["agent"]);
        let state = compiled.invoke(AgentState::new("q")).await.unwrap();
        assert_eq!(state.messages.len(), 2);
    }

    #[tokio::test]
    async fn linear_edges_run_in_order() {
        let mut graph = StateGraph::new();
        graph
            .add_node("a", Arc::new(Tag("a")))
            .unwrap()
            .add_node("b", Arc::new(Tag("b")))
            .unwrap()
            .add_edge("a", "b")
            .unwrap();
        graph.set_entry_point("a").set_finish_point("b");

        let state = graph.compile().unwrap().invoke(AgentState::new("q")).await.unwrap();
        let contents: Vec<&str> = state.messages.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["q", "a", "b"]);
    }

    #[test]
    fn missing_entry_point_is_rejected() {
        let mut graph = StateGraph::new();
        graph.add_node("agent", Arc::new(Tag("x"))).unwrap();
        graph.set_finish_point("agent");
        assert!(matches!(graph.compile(), Err(GraphError::MissingEntryPoint)));
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut graph = StateGraph::new();
        graph.add_node("agent", Arc::new(Tag("x"))).unwrap();
        assert!(matches!(
            graph.add_node("agent", Arc::new(Tag("y"))),
            Err(GraphError::DuplicateNode(_))
        ));
    }

    #[test]
    fn unknown_finish_point_is_rejected() {
        let mut graph = StateGraph::new();
        graph.add_node("agent", Arc::new(Tag("x"))).unwrap();
        graph.set_entry_point("agent").set_finish_point("nowhere");
        assert!(matches!(graph.compile(), Err(GraphError::UnknownNode(n)) if n == "nowhere"));
    }

    #[test]
    fn cycles_without_finish_are_rejected() {
        let mut graph = StateGraph::new();
        graph
            .add_node("a", Arc::new(Tag("a")))
            .unwrap()
            .add_node("b", Arc::new(Tag("b")))
            .unwrap()
            .add_node("c", Arc::new(Tag("c")))
            .unwrap()
            .add_edge("a", "b")
            .unwrap()
            .add_edge("b", "a")
            .unwrap();
        graph.set_entry_point("a").set_finish_point("c");
        assert!(matches!(graph.compile(), Err(GraphError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn node_failure_names_the_node() {
        let mut graph = StateGraph::new();
        graph.add_node("agent", Arc::new(Refuse)).unwrap();
        graph.set_entry_point("agent").set_finish_point("agent");

        let err = graph.compile().unwrap().invoke(AgentState::new("q")).await.unwrap_err();
        assert!(matches!(err, GraphError::Node { ref node, .. } if node == "agent"));
    }
}
