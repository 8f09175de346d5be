//! Derived binary decision tree, built fresh on every export.

use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::graph::{EdgeRole, GraphEdge, GraphModel, GraphNode, NodeKind, Position};

/// One node of the exported tree. Children are owned by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Decision {
        feature: String,
        #[serde(with = "threshold")]
        threshold: f64,
        left: Option<Box<TreeNode>>,
        right: Option<Box<TreeNode>>,
    },
    Leaf {
        name: String,
        #[serde(with = "threshold")]
        threshold: f64,
    },
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>, threshold: f64) -> Self {
        TreeNode::Leaf {
            name: name.into(),
            threshold,
        }
    }

    pub fn decision(
        feature: impl Into<String>,
        threshold: f64,
        left: Option<TreeNode>,
        right: Option<TreeNode>,
    ) -> Self {
        TreeNode::Decision {
            feature: feature.into(),
            threshold,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// Feature name of a decision, name of a leaf.
    pub fn label(&self) -> &str {
        match self {
            TreeNode::Decision { feature, .. } => feature,
            TreeNode::Leaf { name, .. } => name,
        }
    }

    pub fn threshold(&self) -> f64 {
        match self {
            TreeNode::Decision { threshold, .. } | TreeNode::Leaf { threshold, .. } => *threshold,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Number of levels, a single node has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Decision { left, right, .. } => {
                1 + [left, right]
                    .iter()
                    .filter_map(|c| c.as_deref())
                    .map(TreeNode::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Total number of nodes.
    pub fn size(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Decision { left, right, .. } => {
                1 + [left, right]
                    .iter()
                    .filter_map(|c| c.as_deref())
                    .map(TreeNode::size)
                    .sum::<usize>()
            }
        }
    }

    /// Names of all leaves, left to right.
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        match self {
            TreeNode::Leaf { name, .. } => leaves.push(name),
            TreeNode::Decision { left, right, .. } => {
                for child in [left, right].into_iter().flatten() {
                    child.collect_leaves(leaves);
                }
            }
        }
    }
}

/// Top-level exported value: `{ root: TreeNode }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeDocument {
    pub root: TreeNode,
}

impl DecisionTreeDocument {
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    /// Rebuild an editable graph from the document.
    ///
    /// Ids are assigned in pre-order starting at "1"; every edge carries an
    /// explicit role so a lone right child keeps its position.
    pub fn to_graph(&self) -> GraphModel {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut stack = vec![(&self.root, None::<(String, EdgeRole)>)];

        while let Some((tree, parent)) = stack.pop() {
            let id = (nodes.len() + 1).to_string();
            nodes.push(GraphNode {
                id: id.clone(),
                kind: if parent.is_none() {
                    NodeKind::Root
                } else {
                    NodeKind::Internal
                },
                label: tree.label().to_string(),
                threshold: tree.threshold(),
                position: Position::random(),
            });
            if let Some((source, role)) = parent {
                edges.push(GraphEdge::new(source, id.clone()).with_role(role));
            }
            if let TreeNode::Decision { left, right, .. } = tree {
                // right first so left is popped (and numbered) first
                if let Some(right) = right {
                    stack.push((&**right, Some((id.clone(), EdgeRole::Right))));
                }
                if let Some(left) = left {
                    stack.push((&**left, Some((id.clone(), EdgeRole::Left))));
                }
            }
        }

        GraphModel::from_parts(nodes, edges)
    }
}

/// Conversion into a printable `termtree`.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        labelled_tree(self, None)
    }
}

fn labelled_tree(node: &TreeNode, role: Option<EdgeRole>) -> Tree<String> {
    let text = match node {
        TreeNode::Leaf { name, threshold } => format!("{} ({})", name, threshold),
        TreeNode::Decision {
            feature, threshold, ..
        } => format!("{} [{}]", feature, threshold),
    };
    let mut tree = match role {
        Some(role) => Tree::new(format!("{}: {}", role, text)),
        None => Tree::new(text),
    };
    if let TreeNode::Decision { left, right, .. } = node {
        for (role, child) in [(EdgeRole::Left, left), (EdgeRole::Right, right)] {
            match child {
                Some(child) => tree.push(labelled_tree(child, Some(role))),
                None => tree.push(Tree::new(format!("{}: -", role))),
            };
        }
    }
    tree
}

impl TreeNodeConvert for DecisionTreeDocument {
    fn to_tree_string(&self) -> Tree<String> {
        self.root.to_tree_string()
    }
}

/// Thresholds with no fractional part are written as integers (`1`, not `1.0`).
///
/// Negative zero keeps its sign (`-0.0`). Integral values beyond 2^53 go
/// through the float path and come out in exponent form (`1e20`), which
/// YAML 1.1 readers take as a string.
mod threshold {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Largest integer an f64 represents exactly.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let negative_zero = *value == 0.0 && value.is_sign_negative();
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT && !negative_zero
        {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}
