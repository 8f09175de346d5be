//! Graph model: the flat node/edge collections an editing session mutates.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::error::DomainError;

/// Label of the node every new graph starts with.
pub const INITIAL_ROOT_LABEL: &str = "Root Node";

/// Upper bound of the random placement assigned to new nodes.
const PLACEMENT_RANGE: f64 = 250.0;

/// Whether a node is the designated entry point of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Internal,
}

/// Explicit child position carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRole {
    Left,
    Right,
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeRole::Left => write!(f, "left"),
            EdgeRole::Right => write!(f, "right"),
        }
    }
}

/// Canvas coordinates. Presentation only, never read by the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub(crate) fn random() -> Self {
        let mut rng = rand::rng();
        Self {
            x: rng.random_range(0.0..PLACEMENT_RANGE),
            y: rng.random_range(0.0..PLACEMENT_RANGE),
        }
    }
}

/// A node as authored in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    /// Feature name for decisions, name for leaves
    pub label: String,
    pub threshold: f64,
    #[serde(default)]
    pub position: Position,
}

impl GraphNode {
    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, threshold {})", self.id, self.label, self.threshold)
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Child position; unset edges fall back to insertion order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<EdgeRole>,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: EdgeRole) -> Self {
        self.role = Some(role);
        self
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Some(role) => write!(f, "{} -> {} [{}]", self.source, self.target, role),
            None => write!(f, "{} -> {}", self.source, self.target),
        }
    }
}

/// Flat, ordered node and edge collections.
///
/// Insertion order of `edges` is significant: it decides child positions for
/// edges without an explicit role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphModel {
    /// New graph holding only the initial root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![GraphNode {
                id: "1".to_string(),
                kind: NodeKind::Root,
                label: INITIAL_ROOT_LABEL.to_string(),
                threshold: 1.0,
                position: Position { x: 250.0, y: 5.0 },
            }],
            edges: Vec::new(),
        }
    }

    /// Snapshot constructor. No validation: loaded graphs may be irregular.
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Outgoing edges of `id` in insertion order.
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Append a node with a fresh id, default label and zero threshold.
    #[instrument(level = "debug", skip(self))]
    pub fn add_node(&mut self) -> &GraphNode {
        let mut n = self.nodes.len() + 1;
        while self.node(&n.to_string()).is_some() {
            n += 1;
        }
        let id = n.to_string();
        debug!("add_node: id={}", id);
        self.nodes.push(GraphNode {
            label: format!("Node {}", id),
            id,
            kind: NodeKind::Internal,
            threshold: 0.0,
            position: Position::random(),
        });
        &self.nodes[self.nodes.len() - 1]
    }

    /// Replace label and threshold of `id`. Returns false when no such node exists.
    #[instrument(level = "debug", skip(self))]
    pub fn update_node(&mut self, id: &str, label: &str, threshold: f64) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.label = label.to_string();
                node.threshold = threshold;
                true
            }
            None => {
                debug!("update_node: no node {}", id);
                false
            }
        }
    }

    /// Append an edge. Endpoints must exist; duplicates and cycles are accepted.
    #[instrument(level = "debug", skip(self))]
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        role: Option<EdgeRole>,
    ) -> Result<&GraphEdge, DomainError> {
        for id in [source, target] {
            if self.node(id).is_none() {
                return Err(DomainError::UnknownNode(id.to_string()));
            }
        }
        self.edges.push(GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            role,
        });
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// First node of kind root. Additional roots are ignored with a warning.
    pub fn find_root(&self) -> Result<&GraphNode, DomainError> {
        let mut roots = self.nodes.iter().filter(|n| n.is_root());
        let root = roots.next().ok_or(DomainError::MissingRoot)?;
        let extra = roots.count();
        if extra > 0 {
            warn!(
                "graph has {} root nodes, using the first: {}",
                extra + 1,
                root.id
            );
        }
        Ok(root)
    }
}
