//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::graph::EdgeRole;

/// Domain errors represent violations of the tree-shape assumptions.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("no root node in graph")]
    MissingRoot,

    #[error("node is not a root: {0}")]
    NotARoot(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("dangling edge {from} -> {to}: target node does not exist")]
    DanglingReference { from: String, to: String },

    #[error("cycle detected in graph: {}", .path.join(" -> "))]
    CycleDetected { path: Vec<String> },

    #[error("tree depth exceeds limit of {limit} at node {node}")]
    DepthExceeded { node: String, limit: usize },

    #[error("node {node} already has {limit} outgoing edges")]
    OutDegreeExceeded { node: String, limit: usize },

    #[error("edge already exists: {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    #[error("node {node} already has a {role} child")]
    RoleTaken { node: String, role: EdgeRole },

    #[error("invalid tree document: {message}")]
    InvalidDocument { message: String },

    #[error("cannot serialize tree document: {message}")]
    Serialize { message: String },
}
