//! Static architecture diagram of the question-answering pipeline.
//!
//! The topology is built as a petgraph `DiGraph`, written out as Graphviz DOT
//! and rendered by the `dot` executable.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

pub const DIAGRAM_TITLE: &str = "Contract QA Assistant";
pub const DEFAULT_OUTPUT: &str = "outputs/architecture_diagram";

const FLOW_COLOR: &str = "#2E86AB";
const TOOL_COLOR: &str = "#E67E22";
const ANSWER_COLOR: &str = "#27AE60";
const LEGEND_COLOR: &str = "#EAF6FB";
const RANKDIR: &str = "TB";

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Graphviz `dot` executable not found; install graphviz or use --dot-only")]
    GraphvizMissing,
    #[error("Graphviz failed with {status}: {stderr}")]
    Graphviz { status: String, stderr: String },
    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    User,
    InputOutput,
    Decision,
    Tool,
    Result,
    Blank,
}

impl NodeKind {
    fn attrs(self) -> &'static str {
        match self {
            NodeKind::User => r##"shape="egg", style="filled", fillcolor="#D6EAF8""##,
            NodeKind::InputOutput => r##"shape="parallelogram", style="filled", fillcolor="#FDEBD0""##,
            NodeKind::Decision => r##"shape="diamond", style="filled", fillcolor="#FCF3CF""##,
            NodeKind::Tool => r##"shape="box", style="rounded,filled", fillcolor="#E8DAEF""##,
            NodeKind::Result => r##"shape="box3d", style="filled", fillcolor="#FADBD8""##,
            NodeKind::Blank => r##"shape="plaintext""##,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: NodeKind,
    pub in_legend: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    pub label: Option<&'static str>,
    pub color: &'static str,
}

pub struct ArchitectureDiagram {
    pub title: String,
    graph: DiGraph<DiagramNode, DiagramEdge>,
}

impl ArchitectureDiagram {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            graph: DiGraph::new(),
        }
    }

    /// user → input → agent → tool → result → agent → answer, plus a legend.
    pub fn pipeline() -> Self {
        let mut diagram = Self::new(DIAGRAM_TITLE);

        diagram.legend("l_user", "User", NodeKind::User);
        diagram.legend("l_input", "Input", NodeKind::InputOutput);
        diagram.legend("l_agent", "Agent", NodeKind::Decision);
        diagram.legend("l_tool", "Tool", NodeKind::Tool);
        diagram.legend("l_result", "Result", NodeKind::Result);

        let user = diagram.node("user", "User Input", NodeKind::User);
        let question = diagram.node("question", "Input:\nContract Question", NodeKind::InputOutput);
        let agent = diagram.node("agent", "Chat Agent\n(LLM Decision)", NodeKind::Decision);
        let tool = diagram.node("tool", "Tool Node\n(Retriever)", NodeKind::Tool);
        let result = diagram.node("result", "Return Context\nContract QA Assistant", NodeKind::Result);
        let answer = diagram.node("answer", "Grounded Answer", NodeKind::Blank);

        diagram.edge(user, question, None, FLOW_COLOR);
        diagram.edge(question, agent, None, FLOW_COLOR);
        diagram.edge(agent, tool, Some("1. Calls Tool"), TOOL_COLOR);
        diagram.edge(tool, result, Some("2. Returns Context"), TOOL_COLOR);
        diagram.edge(result, agent, Some("3. Sends Back to Agent"), TOOL_COLOR);
        diagram.edge(agent, answer, Some("4. Final Answer"), ANSWER_COLOR);

        diagram
    }

    pub fn node(&mut self, id: &'static str, label: &'static str, kind: NodeKind) -> NodeIndex {
        self.graph.add_node(DiagramNode {
            id,
            label,
            kind,
            in_legend: false,
        })
    }

    pub fn legend(&mut self, id: &'static str, label: &'static str, kind: NodeKind) -> NodeIndex {
        self.graph.add_node(DiagramNode {
            id,
            label,
            kind,
            in_legend: true,
        })
    }

    pub fn edge(&mut self, from: NodeIndex, to: NodeIndex, label: Option<&'static str>, color: &'static str) {
        self.graph.add_edge(from, to, DiagramEdge { label, color });
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        let _ = writeln!(dot, "digraph \"{}\" {{", escape(&self.title));
        let _ = writeln!(
            dot,
            "    graph [label=\"{}\", labelloc=\"t\", fontsize=\"15\", rankdir=\"{}\", pad=\"2.0\", nodesep=\"0.60\", ranksep=\"0.75\"];",
            escape(&self.title),
            RANKDIR
        );
        let _ = writeln!(dot, "    node [fontsize=\"13\", fontname=\"Sans-Serif\"];");
        let _ = writeln!(dot, "    edge [fontname=\"Sans-Serif\"];");

        let _ = writeln!(dot, "    subgraph cluster_legend {{");
        let _ = writeln!(
            dot,
            "        graph [label=\"Legend\", fontsize=\"9\", style=\"filled\", color=\"{c}\", pencolor=\"{c}\", bgcolor=\"{c}\", margin=\"10\"];",
            c = LEGEND_COLOR
        );
        for node in self.graph.node_weights().filter(|n| n.in_legend) {
            let _ = writeln!(dot, "        {}", node_line(node));
        }
        let _ = writeln!(dot, "    }}");

        for node in self.graph.node_weights().filter(|n| !n.in_legend) {
            let _ = writeln!(dot, "    {}", node_line(node));
        }

        for edge in self.graph.edge_references() {
            let from = &self.graph[edge.source()];
            let to = &self.graph[edge.target()];
            let weight = edge.weight();
            let mut attrs = format!("color=\"{}\", minlen=\"2\"", weight.color);
            if let Some(label) = weight.label {
                let _ = write!(attrs, ", label=\"{}\", fontsize=\"10\"", escape(label));
            }
            let _ = writeln!(dot, "    {} -> {} [{}];", from.id, to.id, attrs);
        }

        dot.push_str("}\n");
        dot
    }

    /// Writes `<output>.dot`, then renders `<output>.<format>` with Graphviz.
    pub fn render(&self, output: &Path, format: &str) -> Result<PathBuf, DiagramError> {
        let dot_path = self.write_dot(output)?;
        let image_path = output.with_extension(format);

        let result = Command::new("dot")
            .arg(format!("-T{}", format))
            .arg(&dot_path)
            .arg("-o")
            .arg(&image_path)
            .output();

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(DiagramError::GraphvizMissing),
            Err(source) => {
                return Err(DiagramError::Io {
                    path: image_path.display().to_string(),
                    source,
                })
            }
        };

        if !out.status.success() {
            return Err(DiagramError::Graphviz {
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        log::info!("Rendered {}", image_path.display());
        Ok(image_path)
    }

    pub fn write_dot(&self, output: &Path) -> Result<PathBuf, DiagramError> {
        let dot_path = output.with_extension("dot");
        let io_err = |source| DiagramError::Io {
            path: dot_path.display().to_string(),
            source,
        };

        if let Some(parent) = dot_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&dot_path, self.to_dot()).map_err(io_err)?;
        log::info!("Wrote {}", dot_path.display());
        Ok(dot_path)
    }
}

pub fn open(path: &Path) -> Result<(), DiagramError> {
    webbrowser::open(&path.display().to_string()).map_err(|e| DiagramError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn node_line(node: &DiagramNode) -> String {
    format!("{} [label=\"{}\", {}];", node.id, escape(node.label), node.kind.attrs())
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
