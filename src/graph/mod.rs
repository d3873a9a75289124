//! Minimal state graph: named nodes, straight-line edges, one entry point
//! and one finish point. Each node takes the conversation state by value and
//! hands back the updated state.

mod builder;
mod node;
mod state;

pub use builder::{CompiledGraph, GraphError, StateGraph};
pub use node::{AgentNode, Node, NodeError};
pub use state::{AgentState, Message, StepOutcome};
