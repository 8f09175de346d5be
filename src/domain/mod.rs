//! Domain layer: graph model, child resolution, tree derivation and serialization
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod graph;
pub mod resolver;
pub mod serializer;
pub mod tree;

pub use builder::{TreeBuilder, TreeResult, DEFAULT_MAX_DEPTH};
pub use error::DomainError;
pub use graph::{EdgeRole, GraphEdge, GraphModel, GraphNode, NodeKind, Position};
pub use resolver::{ChildEdges, EdgeResolver};
pub use serializer::{from_yaml, to_yaml, DEFAULT_ARTIFACT_NAME, MIME_TYPE};
pub use tree::{DecisionTreeDocument, TreeNode, TreeNodeConvert};
