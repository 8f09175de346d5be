//! Tree builder: walks the graph from the root and derives the decision tree.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::graph::{GraphModel, GraphNode};
use crate::domain::resolver::EdgeResolver;
use crate::domain::tree::{DecisionTreeDocument, TreeNode};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Default limit on root-to-leaf path length.
///
/// serde_yaml stops parsing at 128 nested mappings, so deeper trees would
/// export fine but never load again. Keep well below that.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Ids on the current root-to-node path.
#[derive(Debug, Default)]
struct Visit<'g> {
    path: Vec<&'g str>,
    on_path: HashSet<&'g str>,
}

impl<'g> Visit<'g> {
    fn enter(&mut self, id: &'g str) -> TreeResult<()> {
        self.path.push(id);
        if !self.on_path.insert(id) {
            return Err(DomainError::CycleDetected {
                path: self.path.iter().map(|s| s.to_string()).collect(),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        if let Some(id) = self.path.pop() {
            self.on_path.remove(id);
        }
    }
}

/// Derives a [`DecisionTreeDocument`] from a [`GraphModel`].
///
/// Reads the graph only. A node reachable along two paths is emitted twice;
/// a node reachable from itself aborts the build with `CycleDetected`.
pub struct TreeBuilder<'g> {
    graph: &'g GraphModel,
    resolver: EdgeResolver<'g>,
    max_depth: usize,
}

impl<'g> TreeBuilder<'g> {
    pub fn new(graph: &'g GraphModel) -> Self {
        Self {
            graph,
            resolver: EdgeResolver::new(graph.edges()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build from the first node of kind root.
    pub fn build_from_root(&self) -> TreeResult<DecisionTreeDocument> {
        let root = self.graph.find_root()?;
        self.build(&root.id)
    }

    /// Build from an explicitly designated root.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, root_id: &str) -> TreeResult<DecisionTreeDocument> {
        let root = self
            .graph
            .node(root_id)
            .ok_or_else(|| DomainError::UnknownNode(root_id.to_string()))?;
        if !root.is_root() {
            return Err(DomainError::NotARoot(root_id.to_string()));
        }

        let mut visit = Visit::default();
        let tree = self.build_node(root, true, &mut visit)?;
        debug!(
            "build: root={} nodes={} depth={}",
            root_id,
            tree.size(),
            tree.depth()
        );
        Ok(DecisionTreeDocument::new(tree))
    }

    fn build_node(
        &self,
        node: &'g GraphNode,
        is_root: bool,
        visit: &mut Visit<'g>,
    ) -> TreeResult<TreeNode> {
        visit.enter(&node.id)?;
        if visit.path.len() > self.max_depth {
            return Err(DomainError::DepthExceeded {
                node: node.id.clone(),
                limit: self.max_depth,
            });
        }

        let children = self.resolver.resolve(&node.id);
        if !children.ignored.is_empty() {
            warn!(
                "node {}: ignoring {} extra outgoing edge(s): {}",
                node.id,
                children.ignored.len(),
                children
                    .ignored
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let tree = if is_root || children.has_children() {
            let left = self.build_child(node, children.left, visit)?;
            let right = self.build_child(node, children.right, visit)?;
            TreeNode::Decision {
                feature: node.label.clone(),
                threshold: node.threshold,
                left: left.map(Box::new),
                right: right.map(Box::new),
            }
        } else {
            TreeNode::Leaf {
                name: node.label.clone(),
                threshold: node.threshold,
            }
        };

        visit.leave();
        Ok(tree)
    }

    fn build_child(
        &self,
        parent: &GraphNode,
        target: Option<&'g str>,
        visit: &mut Visit<'g>,
    ) -> TreeResult<Option<TreeNode>> {
        let Some(target) = target else {
            return Ok(None);
        };
        let child = self
            .graph
            .node(target)
            .ok_or_else(|| DomainError::DanglingReference {
                from: parent.id.clone(),
                to: target.to_string(),
            })?;
        self.build_node(child, false, visit).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{GraphEdge, NodeKind, Position};

    fn node(id: &str, kind: NodeKind, label: &str, threshold: f64) -> GraphNode {
        GraphNode {
            id: id.into(),
            kind,
            label: label.into(),
            threshold,
            position: Position::default(),
        }
    }

    fn graph(labels: &[&str], pairs: &[(&str, &str)]) -> GraphModel {
        let nodes = labels
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let kind = if i == 0 {
                    NodeKind::Root
                } else {
                    NodeKind::Internal
                };
                node(&(i + 1).to_string(), kind, l, i as f64)
            })
            .collect();
        let edges = pairs.iter().map(|(s, t)| GraphEdge::new(*s, *t)).collect();
        GraphModel::from_parts(nodes, edges)
    }

    #[test]
    fn given_root_only_when_building_then_decision_without_children() {
        let g = graph(&["A"], &[]);
        let doc = TreeBuilder::new(&g).build("1").unwrap();
        assert_eq!(doc.root, TreeNode::decision("A", 0.0, None, None));
    }

    #[test]
    fn given_two_children_when_building_then_leaves_under_root() {
        let g = graph(&["A", "B", "C"], &[("1", "2"), ("1", "3")]);
        let doc = TreeBuilder::new(&g).build_from_root().unwrap();
        assert_eq!(
            doc.root,
            TreeNode::decision(
                "A",
                0.0,
                Some(TreeNode::leaf("B", 1.0)),
                Some(TreeNode::leaf("C", 2.0))
            )
        );
    }

    #[test]
    fn given_single_outgoing_edge_when_building_then_right_is_none() {
        let g = graph(&["A", "B", "C"], &[("1", "2"), ("2", "3")]);
        let doc = TreeBuilder::new(&g).build("1").unwrap();
        let TreeNode::Decision { left, right, .. } = doc.root else {
            panic!("root must be a decision");
        };
        assert!(right.is_none());
        assert_eq!(
            *left.unwrap(),
            TreeNode::decision("B", 1.0, Some(TreeNode::leaf("C", 2.0)), None)
        );
    }

    #[test]
    fn given_shared_child_when_building_then_duplicated_by_value() {
        let g = graph(
            &["A", "B", "C", "D"],
            &[("1", "2"), ("1", "3"), ("2", "4"), ("3", "4")],
        );
        let doc = TreeBuilder::new(&g).build("1").unwrap();
        assert_eq!(doc.root.leaf_names(), vec!["D", "D"]);
    }

    #[test]
    fn given_cycle_when_building_then_cycle_detected() {
        let g = graph(&["A", "B", "C"], &[("1", "2"), ("2", "3"), ("3", "2")]);
        let err = TreeBuilder::new(&g).build("1").unwrap_err();
        assert_eq!(
            err,
            DomainError::CycleDetected {
                path: vec!["1".into(), "2".into(), "3".into(), "2".into()]
            }
        );
    }

    #[test]
    fn given_self_loop_on_root_when_building_then_cycle_detected() {
        let g = graph(&["A"], &[("1", "1")]);
        let err = TreeBuilder::new(&g).build("1").unwrap_err();
        assert!(matches!(err, DomainError::CycleDetected { .. }));
    }

    #[test]
    fn given_dangling_edge_when_building_then_errors() {
        let g = graph(&["A"], &[("1", "7")]);
        let err = TreeBuilder::new(&g).build("1").unwrap_err();
        assert_eq!(
            err,
            DomainError::DanglingReference {
                from: "1".into(),
                to: "7".into()
            }
        );
    }

    #[test]
    fn given_non_root_id_when_building_then_not_a_root() {
        let g = graph(&["A", "B"], &[("1", "2")]);
        let err = TreeBuilder::new(&g).build("2").unwrap_err();
        assert_eq!(err, DomainError::NotARoot("2".into()));
    }

    #[test]
    fn given_chain_longer_than_limit_when_building_then_depth_exceeded() {
        let g = graph(&["A", "B", "C"], &[("1", "2"), ("2", "3")]);
        let err = TreeBuilder::new(&g).with_max_depth(2).build("1").unwrap_err();
        assert_eq!(
            err,
            DomainError::DepthExceeded {
                node: "3".into(),
                limit: 2
            }
        );
    }
}
