//! Graph editing service
//!
//! Stands in for the interactive editor: every operation loads the persisted
//! graph snapshot, applies one mutation and writes it back.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DomainError, EdgeRole, GraphEdge, GraphModel, GraphNode};
use crate::infrastructure::traits::FileSystem;

/// Maximum number of children a decision node can use.
pub const MAX_CHILDREN: usize = 2;

/// Service for creating and mutating the persisted graph.
pub struct GraphService {
    fs: Arc<dyn FileSystem>,
    strict_edges: bool,
}

impl GraphService {
    /// Create a new graph service.
    ///
    /// With `strict_edges`, edges the resolver would ignore are rejected at
    /// creation time instead.
    pub fn new(fs: Arc<dyn FileSystem>, strict_edges: bool) -> Self {
        Self { fs, strict_edges }
    }

    /// Write a fresh single-root graph.
    #[instrument(level = "debug", skip(self))]
    pub fn init(&self, path: &Path, force: bool) -> ApplicationResult<GraphModel> {
        if self.fs.exists(path) && !force {
            return Err(ApplicationError::GraphExists(path.to_path_buf()));
        }
        let graph = GraphModel::new();
        self.fs
            .ensure_parent(path)
            .with_path_context("create graph directory", path)?;
        self.save(path, &graph)?;
        Ok(graph)
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<GraphModel> {
        debug!("load: path={}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::GraphNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read graph", path)?;
        toml::from_str(&content).map_err(|e| ApplicationError::InvalidGraph {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path, graph: &GraphModel) -> ApplicationResult<()> {
        debug!(
            "save: path={} nodes={} edges={}",
            path.display(),
            graph.nodes().len(),
            graph.edges().len()
        );
        let content = toml::to_string_pretty(graph).map_err(|e| ApplicationError::InvalidGraph {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.fs
            .write_atomic(path, &content)
            .with_path_context("write graph", path)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_node(&self, path: &Path) -> ApplicationResult<GraphNode> {
        let mut graph = self.load(path)?;
        let node = graph.add_node().clone();
        self.save(path, &graph)?;
        Ok(node)
    }

    /// Edit label and/or threshold. Omitted fields keep their value.
    ///
    /// Returns false (and writes nothing) when `id` does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn update_node(
        &self,
        path: &Path,
        id: &str,
        label: Option<&str>,
        threshold: Option<f64>,
    ) -> ApplicationResult<bool> {
        let mut graph = self.load(path)?;
        let Some(current) = graph.node(id) else {
            debug!("update_node: no node {}", id);
            return Ok(false);
        };
        let label = label.unwrap_or(&current.label).to_string();
        let threshold = threshold.unwrap_or(current.threshold);

        let updated = graph.update_node(id, &label, threshold);
        if updated {
            self.save(path, &graph)?;
        }
        Ok(updated)
    }

    /// Connect `source` to `target`, optionally pinning the child position.
    #[instrument(level = "debug", skip(self))]
    pub fn connect(
        &self,
        path: &Path,
        source: &str,
        target: &str,
        role: Option<EdgeRole>,
    ) -> ApplicationResult<GraphEdge> {
        let mut graph = self.load(path)?;
        if self.strict_edges {
            Self::check_edge(&graph, source, target, role)?;
        }
        let edge = graph.add_edge(source, target, role)?.clone();
        self.save(path, &graph)?;
        Ok(edge)
    }

    /// Reject edges that would be ignored when resolving children.
    pub fn check_edge(
        graph: &GraphModel,
        source: &str,
        target: &str,
        role: Option<EdgeRole>,
    ) -> Result<(), DomainError> {
        let outgoing: Vec<&GraphEdge> = graph.outgoing(source).collect();
        if outgoing.iter().any(|e| e.target == target) {
            return Err(DomainError::DuplicateEdge {
                from: source.to_string(),
                to: target.to_string(),
            });
        }
        if let Some(role) = role {
            if outgoing.iter().any(|e| e.role == Some(role)) {
                return Err(DomainError::RoleTaken {
                    node: source.to_string(),
                    role,
                });
            }
        }
        if outgoing.len() >= MAX_CHILDREN {
            return Err(DomainError::OutDegreeExceeded {
                node: source.to_string(),
                limit: MAX_CHILDREN,
            });
        }
        Ok(())
    }
}
